use std::collections::BTreeMap;

use reqwest::Url;
use serde::Deserialize;

use bazaar_config::ReturnsProviderConfig;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReturnEntry {
	pub catalog_id: i64,
	pub product_id: i64,
	#[serde(default)]
	pub order_date: String,
	#[serde(default)]
	pub rto_count: i64,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
	success: bool,
	#[serde(default)]
	code: String,
	/// Keyed map; a BTreeMap keeps iteration order stable across identical payloads.
	#[serde(default)]
	rto_list: Option<BTreeMap<String, ReturnEntry>>,
	#[serde(default)]
	total_items: i64,
}

/// Fetches the returns history associated with `code`, in key order.
pub async fn fetch_returns(cfg: &ReturnsProviderConfig, code: &str) -> Result<Vec<ReturnEntry>> {
	let client = crate::client(cfg.timeout_ms)?;
	let url = fetch_url(cfg, code)?;
	let res = client
		.get(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.send()
		.await?;
	let body = res.error_for_status()?.bytes().await?;
	let parsed: FetchResponse = serde_json::from_slice(&body)?;

	if !parsed.success {
		return Err(Error::InvalidResponse {
			message: format!("Returns collaborator reported failure for code {code:?}."),
		});
	}

	let entries = parsed.rto_list.unwrap_or_default().into_values().collect::<Vec<_>>();

	tracing::debug!(
		provider_id = %cfg.provider_id,
		code = %parsed.code,
		total_items = parsed.total_items,
		entries = entries.len(),
		"Returns collaborator responded."
	);

	Ok(entries)
}

/// Removes one product from the returns history of `code`.
pub async fn drop_product(
	cfg: &ReturnsProviderConfig,
	code: &str,
	product_id: i64,
	catalog_id: i64,
) -> Result<()> {
	let client = crate::client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.drop_path);
	let body = serde_json::json!({
		"code": code,
		"product_id": product_id,
		"catalog_id": catalog_id,
	});

	client
		.delete(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?
		.error_for_status()?;

	Ok(())
}

fn fetch_url(cfg: &ReturnsProviderConfig, code: &str) -> Result<Url> {
	let raw = format!("{}{}", cfg.api_base, cfg.fetch_path.trim_end_matches('/'));
	let mut url = Url::parse(&raw).map_err(|err| Error::InvalidConfig {
		message: format!("Invalid returns fetch URL {raw:?}: {err}."),
	})?;

	url.path_segments_mut()
		.map_err(|_| Error::InvalidConfig {
			message: format!("Returns fetch URL {raw:?} cannot carry a path."),
		})?
		.push(code);

	Ok(url)
}
