use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub cdn: Cdn,
	#[serde(default)]
	pub catalog: Catalog,
	#[serde(default)]
	pub product: Product,
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
	/// Server-side bound applied to every statement issued through the pool.
	#[serde(default = "default_statement_timeout_ms")]
	pub statement_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub ranking: RankingProviderConfig,
	pub returns: ReturnsProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub path: String,
	/// Optional. Sent as a bearer token when present.
	pub api_key: Option<String>,
	#[serde(default = "default_collaborator_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnsProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// The user's code is appended as the final path segment.
	pub fetch_path: String,
	pub drop_path: String,
	pub api_key: Option<String>,
	#[serde(default = "default_collaborator_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cdn {
	pub base_url: String,
	pub probe_timeout_ms: u64,
	pub batch_timeout_ms: u64,
	pub gallery_first_slot: u32,
	pub gallery_last_slot: u32,
	pub user_agent: String,
	/// Abort probes still running at the batch deadline instead of letting them finish detached.
	pub cancel_pending_probes: bool,
	pub default_image_path: String,
}
impl Default for Cdn {
	fn default() -> Self {
		Self {
			base_url: "https://images.meesho.com".to_string(),
			probe_timeout_ms: 5_000,
			batch_timeout_ms: 10_000,
			gallery_first_slot: 2,
			gallery_last_slot: 5,
			user_agent: "Mozilla/5.0 (compatible; bazaar-image-probe/0.1)".to_string(),
			cancel_pending_probes: false,
			default_image_path: "/images/products/default/1_256.jpg".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Catalog {
	/// Optional. Replaces the built-in fallback list when set.
	pub fallback_catalog_ids: Option<Vec<String>>,
	pub min_catalog_id_len: usize,
	pub max_catalog_id_len: usize,
	pub currency_symbol: String,
}
impl Default for Catalog {
	fn default() -> Self {
		Self {
			fallback_catalog_ids: None,
			min_catalog_id_len: 4,
			max_catalog_id_len: 20,
			currency_symbol: "₹".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Product {
	/// Optional. Seeds the synthetic data generator; OS entropy is used when absent.
	pub synthetic_seed: Option<u64>,
	/// When true, store failures during product lookup fall back to mock data.
	pub absorb_store_errors: bool,
	pub similar_limit: u32,
}
impl Default for Product {
	fn default() -> Self {
		Self { synthetic_seed: None, absorb_store_errors: true, similar_limit: 6 }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_statement_timeout_ms() -> u64 {
	5_000
}

fn default_collaborator_timeout_ms() -> u64 {
	10_000
}
