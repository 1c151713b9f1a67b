use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	BazaarService, CandidateSource, Candidates, EnrichedCatalogItem, Error, Result,
	candidates::{self, validate_catalog_ids},
	ranking::resort_by_rank,
};

pub const DIRECT_REQUEST_USER: &str = "direct_request";

#[derive(Debug, Clone, Deserialize)]
pub struct DirectCatalogRequest {
	pub catalog_ids: Vec<String>,
	pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
	pub success: bool,
	pub message: String,
	pub data: Vec<EnrichedCatalogItem>,
	pub meta: CatalogMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogMeta {
	pub total_products: usize,
	pub user_id: String,
	#[serde(with = "crate::time_serde")]
	pub generated_at: OffsetDateTime,
	/// Which candidate path produced the data.
	pub source: String,
	pub ranking_applied: bool,
	pub candidate_count: usize,
}

impl BazaarService {
	/// Personalized catalog for a known user.
	pub async fn catalog(&self, user_id: &str) -> Result<CatalogResponse> {
		self.ensure_user_exists(user_id).await?;

		let candidates = self.select_candidates(user_id).await;

		self.assemble_catalog(user_id, candidates).await
	}

	/// Catalog for an explicit list of identifiers.
	pub async fn catalog_by_ids(&self, req: DirectCatalogRequest) -> Result<CatalogResponse> {
		let user_id = match req.user_id.as_deref().map(str::trim) {
			Some(user_id) if !user_id.is_empty() => {
				self.ensure_user_exists(user_id).await?;

				user_id.to_string()
			},
			_ => DIRECT_REQUEST_USER.to_string(),
		};
		let ids = validate_catalog_ids(
			&req.catalog_ids,
			self.cfg.catalog.min_catalog_id_len,
			self.cfg.catalog.max_catalog_id_len,
		);

		if ids.is_empty() {
			return Err(Error::InvalidRequest {
				message: format!(
					"catalog_ids must contain at least one identifier of {} to {} characters.",
					self.cfg.catalog.min_catalog_id_len, self.cfg.catalog.max_catalog_id_len
				),
			});
		}

		tracing::info!(
			user_id = %user_id,
			requested = req.catalog_ids.len(),
			accepted = ids.len(),
			"Direct catalog request validated."
		);

		self.assemble_catalog(&user_id, Candidates { ids, source: CandidateSource::Direct }).await
	}

	async fn assemble_catalog(
		&self,
		user_id: &str,
		candidates: Candidates,
	) -> Result<CatalogResponse> {
		let candidate_count = candidates.ids.len();

		tracing::debug!(
			user_id,
			source = candidates.source.label(),
			candidates = candidate_count,
			distinct = candidates::distinct_count(&candidates.ids),
			"Assembling catalog."
		);

		let ranked = self.rank_candidates(&candidates.ids, user_id).await;
		let enriched = self.enrich_catalog_ids(&ranked.ids).await?;
		let data = resort_by_rank(enriched, &ranked.ids, |item| item.catalog_id.as_str());

		tracing::info!(
			user_id,
			source = candidates.source.label(),
			ranking_applied = ranked.applied,
			products = data.len(),
			"Catalog assembled."
		);

		Ok(CatalogResponse {
			success: true,
			message: "Catalog data retrieved successfully".to_string(),
			meta: CatalogMeta {
				total_products: data.len(),
				user_id: user_id.to_string(),
				generated_at: OffsetDateTime::now_utc(),
				source: candidates.source.label().to_string(),
				ranking_applied: ranked.applied,
				candidate_count,
			},
			data,
		})
	}
}
