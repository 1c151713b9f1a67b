mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Cdn, Config, Postgres, Product, Providers, RankingProviderConfig,
	ReturnsProviderConfig, Security, Service, Storage,
};

use std::{fs, path::Path};

const MAX_GALLERY_SLOT: u32 = 32;
const MAX_SIMILAR_LIMIT: u32 = 50;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("storage.postgres.acquire_timeout_ms", cfg.storage.postgres.acquire_timeout_ms),
		("storage.postgres.statement_timeout_ms", cfg.storage.postgres.statement_timeout_ms),
		("providers.ranking.timeout_ms", cfg.providers.ranking.timeout_ms),
		("providers.returns.timeout_ms", cfg.providers.returns.timeout_ms),
		("cdn.probe_timeout_ms", cfg.cdn.probe_timeout_ms),
		("cdn.batch_timeout_ms", cfg.cdn.batch_timeout_ms),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}
	for (label, value) in [
		("providers.ranking.api_base", &cfg.providers.ranking.api_base),
		("providers.returns.api_base", &cfg.providers.returns.api_base),
		("cdn.base_url", &cfg.cdn.base_url),
	] {
		if !value.starts_with("http://") && !value.starts_with("https://") {
			return Err(Error::Validation {
				message: format!("{label} must be an http or https URL."),
			});
		}
	}
	for (label, value) in [
		("providers.ranking.path", &cfg.providers.ranking.path),
		("providers.returns.fetch_path", &cfg.providers.returns.fetch_path),
		("providers.returns.drop_path", &cfg.providers.returns.drop_path),
		("cdn.default_image_path", &cfg.cdn.default_image_path),
	] {
		if !value.starts_with('/') {
			return Err(Error::Validation { message: format!("{label} must start with '/'.") });
		}
	}

	for (label, headers) in [
		("providers.ranking.default_headers", &cfg.providers.ranking.default_headers),
		("providers.returns.default_headers", &cfg.providers.returns.default_headers),
	] {
		if headers.values().any(|value| !value.is_string()) {
			return Err(Error::Validation {
				message: format!("{label} values must be strings."),
			});
		}
	}

	// Slot 1 is the main image.
	if cfg.cdn.gallery_first_slot < 2 {
		return Err(Error::Validation {
			message: "cdn.gallery_first_slot must be 2 or greater.".to_string(),
		});
	}
	if cfg.cdn.gallery_first_slot > cfg.cdn.gallery_last_slot {
		return Err(Error::Validation {
			message: "cdn.gallery_first_slot must not exceed cdn.gallery_last_slot.".to_string(),
		});
	}
	if cfg.cdn.gallery_last_slot > MAX_GALLERY_SLOT {
		return Err(Error::Validation {
			message: format!("cdn.gallery_last_slot must be {MAX_GALLERY_SLOT} or less."),
		});
	}
	if cfg.cdn.user_agent.trim().is_empty() {
		return Err(Error::Validation { message: "cdn.user_agent must be non-empty.".to_string() });
	}
	if cfg.catalog.min_catalog_id_len == 0 {
		return Err(Error::Validation {
			message: "catalog.min_catalog_id_len must be greater than zero.".to_string(),
		});
	}
	if cfg.catalog.min_catalog_id_len > cfg.catalog.max_catalog_id_len {
		return Err(Error::Validation {
			message: "catalog.min_catalog_id_len must not exceed catalog.max_catalog_id_len."
				.to_string(),
		});
	}
	if cfg.catalog.currency_symbol.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.currency_symbol must be non-empty.".to_string(),
		});
	}
	if cfg.product.similar_limit > MAX_SIMILAR_LIMIT {
		return Err(Error::Validation {
			message: format!("product.similar_limit must be {MAX_SIMILAR_LIMIT} or less."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for key in [&mut cfg.providers.ranking.api_key, &mut cfg.providers.returns.api_key] {
		if key.as_deref().map(|value| value.trim().is_empty()).unwrap_or(false) {
			*key = None;
		}
	}
	for base in [
		&mut cfg.providers.ranking.api_base,
		&mut cfg.providers.returns.api_base,
		&mut cfg.cdn.base_url,
	] {
		let trimmed = base.trim().trim_end_matches('/').to_string();

		*base = trimmed;
	}

	if let Some(ids) = cfg.catalog.fallback_catalog_ids.take() {
		let ids = ids
			.into_iter()
			.map(|id| id.trim().to_string())
			.filter(|id| !id.is_empty())
			.collect::<Vec<_>>();

		if !ids.is_empty() {
			cfg.catalog.fallback_catalog_ids = Some(ids);
		}
	}
}
