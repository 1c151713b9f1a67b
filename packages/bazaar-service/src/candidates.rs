use std::collections::HashSet;

use crate::{BazaarService, Error};

/// Served when no personalized source is available.
pub const FALLBACK_CATALOG_IDS: [&str; 100] = [
	"1119458", "3461848", "4663520", "1284242", "3582567", "5923065", "1822776", "6459587",
	"1485802", "2386881", "2392204", "3372467", "3372251", "6286760", "5476755", "2310673",
	"3467450", "1118824", "288006", "2384938", "702697", "1811163", "1117063", "3303733",
	"4814236", "6210856", "1356739", "2550124", "6007551", "948590", "3791774", "1207734",
	"1330589", "1409216", "1523870", "1604413", "1712958", "1835026", "1921584", "2043617",
	"2118250", "2236791", "2307443", "2419886", "2508132", "2631574", "2745019", "2810468",
	"2934702", "3015389", "3128843", "3241067", "3356610", "3429154", "3517798", "3640342",
	"3752886", "3865430", "3978974", "4051518", "4164062", "4277606", "4380150", "4492694",
	"4515238", "4628782", "4731326", "4844870", "4957414", "5060958", "5173502", "5286046",
	"5399590", "5412134", "5525678", "5638222", "5741766", "5854310", "5967854", "6070398",
	"6183942", "6296486", "6309030", "6412574", "6525118", "6638662", "6741206", "6854750",
	"6967294", "7070838", "7183382", "7296926", "7309470", "7412014", "7525558", "7638102",
	"7741646", "7854190", "7967734", "8070278",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
	/// Catalogs from the user's returns history.
	Returns,
	/// The static fallback list.
	Fallback,
	/// A caller-supplied list.
	Direct,
}
impl CandidateSource {
	pub fn label(self) -> &'static str {
		match self {
			Self::Returns => "rto_api_with_ranking",
			Self::Fallback => "fallback_catalog_ids_with_ranking",
			Self::Direct => "direct_request_with_ranking",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
	pub ids: Vec<String>,
	pub source: CandidateSource,
}

impl BazaarService {
	/// Picks the candidate catalogs for `user_id`. Never fails: every collaborator problem
	/// degrades to the fallback list.
	pub async fn select_candidates(&self, user_id: &str) -> Candidates {
		let code = match self.resolve_user_code(user_id).await {
			Ok(code) => code,
			Err(err @ Error::Storage { .. }) => {
				tracing::warn!(
					user_id,
					error = %err,
					"User code lookup failed; using fallback catalogs."
				);

				return self.fallback_candidates();
			},
			Err(err) => {
				tracing::info!(user_id, error = %err, "User code unresolved; using fallback catalogs.");

				return self.fallback_candidates();
			},
		};
		let result = self.providers.returns.fetch_returns(&self.cfg.providers.returns, &code).await;
		let entries = match result {
			Ok(entries) => entries,
			Err(err) => {
				tracing::warn!(
					user_id,
					code = %code,
					error = %err,
					"Returns collaborator failed; using fallback catalogs."
				);

				return self.fallback_candidates();
			},
		};

		if entries.is_empty() {
			tracing::info!(user_id, code = %code, "Returns history is empty; using fallback catalogs.");

			return self.fallback_candidates();
		}

		let ids = entries.into_iter().map(|entry| entry.catalog_id.to_string()).collect::<Vec<_>>();

		tracing::info!(user_id, candidates = ids.len(), "Using returns-driven catalogs.");

		Candidates { ids, source: CandidateSource::Returns }
	}

	pub fn fallback_catalog_ids(&self) -> Vec<String> {
		match self.cfg.catalog.fallback_catalog_ids.as_ref() {
			Some(ids) => ids.clone(),
			None => FALLBACK_CATALOG_IDS.iter().map(|id| id.to_string()).collect(),
		}
	}

	fn fallback_candidates(&self) -> Candidates {
		Candidates { ids: self.fallback_catalog_ids(), source: CandidateSource::Fallback }
	}
}

/// Keeps identifiers whose trimmed length lies in `min_len..=max_len`, in input order.
pub fn validate_catalog_ids(ids: &[String], min_len: usize, max_len: usize) -> Vec<String> {
	ids.iter()
		.map(|id| id.trim())
		.filter(|id| !id.is_empty())
		.filter(|id| (min_len..=max_len).contains(&id.chars().count()))
		.map(str::to_string)
		.collect()
}

pub(crate) fn distinct_count(ids: &[String]) -> usize {
	ids.iter().collect::<HashSet<_>>().len()
}
