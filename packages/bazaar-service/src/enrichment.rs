use serde::Serialize;

use bazaar_config::Config;
use bazaar_providers::cdn;
use bazaar_storage::{models::PriceProductInfo, queries};

use crate::{BazaarService, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCatalogItem {
	pub catalog_id: String,
	pub product_id: String,
	pub image_url: String,
	pub category: String,
	pub sub_category: String,
	pub title: String,
	pub price: String,
	pub original_price: String,
	pub discount: String,
	pub discount_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
	pub price: f64,
	pub original_price: f64,
	pub discount: f64,
	pub discount_percent: u32,
}
impl Pricing {
	pub fn new(price: f64, original_price: f64) -> Self {
		Self {
			price,
			original_price,
			discount: original_price - price,
			discount_percent: discount_percent(price, original_price),
		}
	}
}

/// Labels rendered with the currency symbol and no decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLabels {
	pub price: String,
	pub original_price: String,
	pub discount: String,
}
impl PriceLabels {
	pub fn new(symbol: &str, pricing: &Pricing) -> Self {
		Self {
			price: format_amount(symbol, pricing.price),
			original_price: format_amount(symbol, pricing.original_price),
			discount: format!("{} OFF", format_amount(symbol, pricing.discount)),
		}
	}
}

impl BazaarService {
	/// Loads and converts every stored row for `catalog_ids`. Row order follows the store, not
	/// the input; unknown identifiers are skipped.
	pub async fn enrich_catalog_ids(
		&self,
		catalog_ids: &[String],
	) -> Result<Vec<EnrichedCatalogItem>> {
		let rows = queries::price_info_by_catalog_ids(&self.db.pool, catalog_ids).await?;

		Ok(rows.iter().map(|row| enrich_row(&self.cfg, row)).collect())
	}
}

pub fn enrich_row(cfg: &Config, row: &PriceProductInfo) -> EnrichedCatalogItem {
	let pricing = Pricing::new(row.supplier_listed_price, row.price_with_shipping);
	let labels = PriceLabels::new(&cfg.catalog.currency_symbol, &pricing);

	EnrichedCatalogItem {
		catalog_id: row.catalog_id.clone(),
		product_id: row.product_id.clone(),
		image_url: resolve_image_url(&cfg.cdn.base_url, &row.images, &row.catalog_id),
		category: row.category.clone(),
		sub_category: row.sscat.clone(),
		title: display_title(&row.name, &row.category, &row.sscat),
		price: labels.price,
		original_price: labels.original_price,
		discount: labels.discount,
		discount_percent: pricing.discount_percent,
	}
}

/// Picks the first stored image, resolving relative paths against the CDN.
pub fn resolve_image_url(cdn_base: &str, images: &str, catalog_id: &str) -> String {
	let first = images.split(',').next().map(str::trim).filter(|path| !path.is_empty());

	match first {
		Some(path) if path.starts_with("http") => path.to_string(),
		Some(path) if path.starts_with('/') => format!("{cdn_base}{path}"),
		Some(path) => format!("{cdn_base}/{path}"),
		None => cdn::product_image_url(cdn_base, catalog_id, 1),
	}
}

pub fn display_title(name: &str, category: &str, sub_category: &str) -> String {
	if name.trim().is_empty() {
		return format!("{category} - {sub_category}");
	}

	name.to_string()
}

/// Whole percent off `original_price`, truncated and clamped to 0..=100.
pub fn discount_percent(price: f64, original_price: f64) -> u32 {
	if !price.is_finite() || !original_price.is_finite() || original_price <= 0.0 {
		return 0;
	}

	let percent = ((original_price - price) / original_price * 100.0).floor();

	percent.clamp(0.0, 100.0) as u32
}

pub fn format_amount(symbol: &str, amount: f64) -> String {
	format!("{symbol}{amount:.0}")
}
