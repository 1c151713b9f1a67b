pub mod candidates;
pub mod catalog;
pub mod enrichment;
pub mod identity;
pub mod images;
pub mod order;
pub mod product;
pub mod ranking;
pub mod synthetic;
pub mod time_serde;

mod error;

pub use candidates::{CandidateSource, Candidates, FALLBACK_CATALOG_IDS, validate_catalog_ids};
pub use catalog::{CatalogMeta, CatalogResponse, DirectCatalogRequest};
pub use enrichment::{EnrichedCatalogItem, Pricing};
pub use error::{Error, Result};
pub use images::ImageProbeReport;
pub use order::{OrderRequest, OrderResponse, OrderResult};
pub use product::{
	ProductDetails, ProductDetailsRequest, ProductDetailsResponse, ProductMeta, ProductReview,
	ProductVariant, SimilarProduct,
};
pub use ranking::{RankOutcome, resort_by_rank};

use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex, MutexGuard},
};

use rand::{SeedableRng, rngs::StdRng};

use bazaar_config::{Cdn, Config, RankingProviderConfig, ReturnsProviderConfig};
use bazaar_providers::{cdn, ranking::RankedCatalog, returns::ReturnEntry};
use bazaar_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait RankingProvider
where
	Self: Send + Sync,
{
	fn rank<'a>(
		&'a self,
		cfg: &'a RankingProviderConfig,
		catalog_ids: &'a [String],
		user_id: &'a str,
	) -> BoxFuture<'a, bazaar_providers::Result<Vec<RankedCatalog>>>;
}

pub trait ReturnsProvider
where
	Self: Send + Sync,
{
	fn fetch_returns<'a>(
		&'a self,
		cfg: &'a ReturnsProviderConfig,
		code: &'a str,
	) -> BoxFuture<'a, bazaar_providers::Result<Vec<ReturnEntry>>>;

	fn drop_product<'a>(
		&'a self,
		cfg: &'a ReturnsProviderConfig,
		code: &'a str,
		product_id: i64,
		catalog_id: i64,
	) -> BoxFuture<'a, bazaar_providers::Result<()>>;
}

pub trait ImageProbe
where
	Self: Send + Sync,
{
	fn image_exists<'a>(
		&'a self,
		cfg: &'a Cdn,
		url: &'a str,
	) -> BoxFuture<'a, bazaar_providers::Result<bool>>;
}

#[derive(Clone)]
pub struct Providers {
	pub ranking: Arc<dyn RankingProvider>,
	pub returns: Arc<dyn ReturnsProvider>,
	pub images: Arc<dyn ImageProbe>,
}
impl Providers {
	pub fn new(
		ranking: Arc<dyn RankingProvider>,
		returns: Arc<dyn ReturnsProvider>,
		images: Arc<dyn ImageProbe>,
	) -> Self {
		Self { ranking, returns, images }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { ranking: provider.clone(), returns: provider.clone(), images: provider }
	}
}

pub struct BazaarService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	rng: Mutex<StdRng>,
}
impl BazaarService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let rng = match cfg.product.synthetic_seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};

		Self::with_rng(cfg, db, providers, rng)
	}

	/// Uses `rng` for every synthetic value the service produces.
	pub fn with_rng(cfg: Config, db: Db, providers: Providers, rng: StdRng) -> Self {
		Self { cfg, db, providers, rng: Mutex::new(rng) }
	}

	pub(crate) fn rng(&self) -> MutexGuard<'_, StdRng> {
		self.rng.lock().unwrap_or_else(|err| err.into_inner())
	}
}

struct DefaultProviders;
impl RankingProvider for DefaultProviders {
	fn rank<'a>(
		&'a self,
		cfg: &'a RankingProviderConfig,
		catalog_ids: &'a [String],
		user_id: &'a str,
	) -> BoxFuture<'a, bazaar_providers::Result<Vec<RankedCatalog>>> {
		Box::pin(bazaar_providers::ranking::rank(cfg, catalog_ids, user_id))
	}
}

impl ReturnsProvider for DefaultProviders {
	fn fetch_returns<'a>(
		&'a self,
		cfg: &'a ReturnsProviderConfig,
		code: &'a str,
	) -> BoxFuture<'a, bazaar_providers::Result<Vec<ReturnEntry>>> {
		Box::pin(bazaar_providers::returns::fetch_returns(cfg, code))
	}

	fn drop_product<'a>(
		&'a self,
		cfg: &'a ReturnsProviderConfig,
		code: &'a str,
		product_id: i64,
		catalog_id: i64,
	) -> BoxFuture<'a, bazaar_providers::Result<()>> {
		Box::pin(bazaar_providers::returns::drop_product(cfg, code, product_id, catalog_id))
	}
}

impl ImageProbe for DefaultProviders {
	fn image_exists<'a>(
		&'a self,
		cfg: &'a Cdn,
		url: &'a str,
	) -> BoxFuture<'a, bazaar_providers::Result<bool>> {
		Box::pin(cdn::image_exists(cfg, url))
	}
}

pub(crate) fn require_non_empty(label: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidRequest { message: format!("{label} is required.") });
	}

	Ok(())
}
