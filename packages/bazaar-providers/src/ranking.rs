use serde_json::Value;

use bazaar_config::RankingProviderConfig;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCatalog {
	pub catalog_id: String,
	pub pctr_score: f64,
}

/// Asks the ranking collaborator to order `catalog_ids` for `user_id`, most relevant first.
pub async fn rank(
	cfg: &RankingProviderConfig,
	catalog_ids: &[String],
	user_id: &str,
) -> Result<Vec<RankedCatalog>> {
	let client = crate::client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "catalog_ids": catalog_ids, "user_id": user_id });
	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let ranked = parse_rank_response(json)?;

	tracing::debug!(
		provider_id = %cfg.provider_id,
		requested = catalog_ids.len(),
		ranked = ranked.len(),
		"Ranking collaborator responded."
	);

	Ok(ranked)
}

fn parse_rank_response(json: Value) -> Result<Vec<RankedCatalog>> {
	let success = json.get("success").and_then(Value::as_bool).ok_or_else(|| {
		Error::InvalidResponse { message: "Ranking response is missing success flag.".to_string() }
	})?;

	if !success {
		let detail = json.get("message").and_then(Value::as_str).unwrap_or("no message");

		return Err(Error::InvalidResponse {
			message: format!("Ranking collaborator reported failure: {detail}."),
		});
	}

	let Some(items) = json.get("ranked_catalogs") else {
		return Ok(Vec::new());
	};

	if items.is_null() {
		return Ok(Vec::new());
	}

	let items = items.as_array().ok_or_else(|| Error::InvalidResponse {
		message: "Ranking response ranked_catalogs must be an array.".to_string(),
	})?;
	let mut ranked = Vec::with_capacity(items.len());

	for item in items {
		let catalog_id = match item.get("catalog_id") {
			Some(Value::String(id)) => id.clone(),
			Some(Value::Number(id)) => id.to_string(),
			_ =>
				return Err(Error::InvalidResponse {
					message: "Ranking result missing catalog_id.".to_string(),
				}),
		};
		let pctr_score = item.get("pctr_score").and_then(Value::as_f64).unwrap_or(0.0);

		ranked.push(RankedCatalog { catalog_id, pctr_score });
	}

	Ok(ranked)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_collaborator_order() {
		let json = serde_json::json!({
			"success": true,
			"ranked_catalogs": [
				{ "catalog_id": "108", "pctr_score": 0.9 },
				{ "catalog_id": "48", "pctr_score": 0.3 }
			],
			"total_catalogs": 2
		});
		let ranked = parse_rank_response(json).expect("parse failed");
		let ids = ranked.iter().map(|item| item.catalog_id.as_str()).collect::<Vec<_>>();

		assert_eq!(ids, vec!["108", "48"]);
		assert_eq!(ranked[0].pctr_score, 0.9);
	}

	#[test]
	fn numeric_ids_are_stringified() {
		let json = serde_json::json!({
			"success": true,
			"ranked_catalogs": [{ "catalog_id": 1119458, "pctr_score": 0.5 }]
		});
		let ranked = parse_rank_response(json).expect("parse failed");

		assert_eq!(ranked[0].catalog_id, "1119458");
	}

	#[test]
	fn explicit_failure_is_an_error() {
		let json = serde_json::json!({ "success": false, "ranked_catalogs": [] });

		assert!(matches!(parse_rank_response(json), Err(Error::InvalidResponse { .. })));
	}

	#[test]
	fn missing_success_flag_is_an_error() {
		let json = serde_json::json!({ "ranked_catalogs": [] });

		assert!(parse_rank_response(json).is_err());
	}

	#[test]
	fn null_list_is_empty() {
		let json = serde_json::json!({ "success": true, "ranked_catalogs": null });

		assert!(parse_rank_response(json).expect("parse failed").is_empty());
	}
}
