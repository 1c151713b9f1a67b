use std::sync::Arc;

use bazaar_service::BazaarService;
use bazaar_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<BazaarService>,
}
impl AppState {
	pub async fn new(config: bazaar_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(BazaarService::new(config, db)))
	}

	pub fn from_service(service: BazaarService) -> Self {
		Self { service: Arc::new(service) }
	}
}
