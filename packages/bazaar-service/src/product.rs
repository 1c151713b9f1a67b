use std::{collections::BTreeMap, time::Instant};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use bazaar_providers::cdn;
use bazaar_storage::{models::PriceProductInfo, queries};

use crate::{
	BazaarService, Result,
	enrichment::{self, PriceLabels, Pricing},
	images::{self, ImageSlot},
	synthetic,
};

pub const SOURCE_PRODUCT_TABLE: &str = "product_info_table";
pub const SOURCE_MOCK: &str = "Mock Data";
/// Product whose CDN images stand in for mock products.
pub const MOCK_IMAGE_PRODUCT_ID: &str = "1234567";

const MAIN_IMAGE_SLOT: u32 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetailsRequest {
	pub product_id: String,
	pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailsResponse {
	pub success: bool,
	pub message: String,
	pub data: ProductDetails,
	pub meta: ProductMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
	pub product_id: String,
	pub catalog_id: String,
	pub title: String,
	pub description: String,
	pub category: String,
	pub sub_category: String,
	pub price: String,
	pub original_price: String,
	pub discount: String,
	pub discount_percent: u32,
	pub images: Vec<String>,
	pub main_image: String,
	pub rating: f64,
	pub reviews: u32,
	pub stock: u32,
	pub brand: String,
	pub seller: String,
	pub delivery_info: String,
	pub return_policy: String,
	pub warranty: String,
	pub specifications: BTreeMap<String, String>,
	pub variants: Vec<ProductVariant>,
	pub reviews_list: Vec<ProductReview>,
	pub similar_products: Vec<SimilarProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductVariant {
	pub id: String,
	pub name: String,
	pub value: String,
	pub price: String,
	pub stock: u32,
	pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductReview {
	pub id: String,
	pub user_id: String,
	pub user_name: String,
	pub rating: u8,
	pub title: String,
	pub comment: String,
	#[serde(with = "crate::time_serde")]
	pub date: OffsetDateTime,
	pub verified: bool,
	pub helpful: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarProduct {
	pub product_id: String,
	pub title: String,
	pub image: String,
	pub price: String,
	pub rating: f64,
	pub reviews: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductMeta {
	pub product_id: String,
	pub user_id: String,
	#[serde(with = "crate::time_serde")]
	pub generated_at: OffsetDateTime,
	/// `product_info_table` for stored products, `Mock Data` otherwise.
	pub source: String,
	pub cache_hit: bool,
	pub response_time_ms: u64,
}

impl BazaarService {
	/// Product page for `req.product_id`.
	///
	/// A missing product row yields a fabricated product rather than an error. Store failures do
	/// the same unless `product.absorb_store_errors` is off.
	pub async fn product_details(
		&self,
		req: ProductDetailsRequest,
	) -> Result<ProductDetailsResponse> {
		let started = Instant::now();

		crate::require_non_empty("product_id", &req.product_id)?;
		crate::require_non_empty("user_id", &req.user_id)?;

		self.ensure_user_exists(&req.user_id).await?;

		let product_id = req.product_id.trim();
		let row = match queries::price_info_by_product_id(&self.db.pool, product_id).await {
			Ok(row) => row,
			Err(err) if self.cfg.product.absorb_store_errors => {
				tracing::warn!(product_id, error = %err, "Product lookup failed; serving mock data.");

				None
			},
			Err(err) => return Err(err.into()),
		};
		let (mut details, source, gallery_id) = match row {
			Some(row) => {
				let details = self.details_from_row(&row).await;

				(details, SOURCE_PRODUCT_TABLE, row.product_id)
			},
			None => {
				tracing::info!(product_id, "Product not stored; serving mock data.");

				(self.mock_details(product_id), SOURCE_MOCK, MOCK_IMAGE_PRODUCT_ID.to_string())
			},
		};
		let (main_image, images) = self.collect_images(&details.main_image, &gallery_id).await;

		details.main_image = main_image;
		details.images = images;

		Ok(ProductDetailsResponse {
			success: true,
			message: details_message(source).to_string(),
			data: details,
			meta: ProductMeta {
				product_id: product_id.to_string(),
				user_id: req.user_id,
				generated_at: OffsetDateTime::now_utc(),
				source: source.to_string(),
				cache_hit: false,
				response_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
			},
		})
	}

	async fn details_from_row(&self, row: &PriceProductInfo) -> ProductDetails {
		let result = queries::similar_by_subcategory(
			&self.db.pool,
			&row.sscat,
			&row.product_id,
			self.cfg.product.similar_limit,
		)
		.await;
		let similar_rows = match result {
			Ok(rows) => rows,
			Err(err) => {
				tracing::warn!(
					product_id = %row.product_id,
					error = %err,
					"Similar product lookup failed."
				);

				Vec::new()
			},
		};
		let symbol = self.cfg.catalog.currency_symbol.as_str();
		let cdn_base = self.cfg.cdn.base_url.as_str();
		let pricing = Pricing::new(row.supplier_listed_price, row.price_with_shipping);
		let labels = PriceLabels::new(symbol, &pricing);
		let now = OffsetDateTime::now_utc();
		let mut rng = self.rng();
		let engagement = synthetic::engagement(&mut *rng);
		let reviews_list = synthetic::reviews(&mut *rng, &row.product_id, now);
		let similar_products = similar_rows
			.iter()
			.map(|similar| {
				let engagement = synthetic::engagement(&mut *rng);
				let similar_pricing =
					Pricing::new(similar.supplier_listed_price, similar.price_with_shipping);

				let title =
					enrichment::display_title(&similar.name, &similar.category, &similar.sscat);
				let image =
					enrichment::resolve_image_url(cdn_base, &similar.images, &similar.catalog_id);

				SimilarProduct {
					product_id: similar.product_id.clone(),
					title,
					image,
					price: enrichment::format_amount(symbol, similar_pricing.price),
					rating: engagement.rating,
					reviews: engagement.reviews,
				}
			})
			.collect();
		let brand = if row.brand_name.trim().is_empty() {
			synthetic::BRAND.to_string()
		} else {
			row.brand_name.clone()
		};

		ProductDetails {
			product_id: row.product_id.clone(),
			catalog_id: row.catalog_id.clone(),
			title: enrichment::display_title(&row.name, &row.category, &row.sscat),
			description: synthetic::description(&row.name, &row.category, &row.sscat),
			category: row.category.clone(),
			sub_category: row.sscat.clone(),
			variants: synthetic::size_variants(&labels.price),
			price: labels.price,
			original_price: labels.original_price,
			discount: labels.discount,
			discount_percent: pricing.discount_percent,
			images: Vec::new(),
			main_image: enrichment::resolve_image_url(cdn_base, &row.images, &row.catalog_id),
			rating: engagement.rating,
			reviews: engagement.reviews,
			stock: engagement.stock,
			brand,
			seller: synthetic::SELLER.to_string(),
			delivery_info: synthetic::DELIVERY_INFO.to_string(),
			return_policy: synthetic::RETURN_POLICY.to_string(),
			warranty: synthetic::WARRANTY.to_string(),
			specifications: synthetic::specifications(),
			reviews_list,
			similar_products,
		}
	}

	fn mock_details(&self, product_id: &str) -> ProductDetails {
		let symbol = self.cfg.catalog.currency_symbol.as_str();
		let now = OffsetDateTime::now_utc();
		let mut rng = self.rng();
		let listing = synthetic::mock_listing(&mut *rng);
		let engagement = synthetic::engagement(&mut *rng);
		let reviews_list = synthetic::reviews(&mut *rng, product_id, now);
		let pricing = Pricing::new(listing.price, listing.original_price);
		let labels = PriceLabels::new(symbol, &pricing);

		ProductDetails {
			product_id: product_id.to_string(),
			catalog_id: listing.catalog_id,
			description: listing.title.clone(),
			title: listing.title,
			category: listing.category,
			sub_category: listing.sub_category,
			variants: synthetic::size_variants(&labels.price),
			price: labels.price,
			original_price: labels.original_price,
			discount: labels.discount,
			discount_percent: pricing.discount_percent,
			images: Vec::new(),
			main_image: cdn::product_image_url(
				&self.cfg.cdn.base_url,
				MOCK_IMAGE_PRODUCT_ID,
				MAIN_IMAGE_SLOT,
			),
			rating: engagement.rating,
			reviews: engagement.reviews,
			stock: engagement.stock,
			brand: synthetic::BRAND.to_string(),
			seller: synthetic::SELLER.to_string(),
			delivery_info: synthetic::DELIVERY_INFO.to_string(),
			return_policy: synthetic::RETURN_POLICY.to_string(),
			warranty: synthetic::WARRANTY.to_string(),
			specifications: synthetic::specifications(),
			reviews_list,
			similar_products: Vec::new(),
		}
	}

	/// Validates the main image and discovers gallery images in one probe batch. Returns the main
	/// image to show and the full list, main image first.
	async fn collect_images(&self, main_image: &str, gallery_id: &str) -> (String, Vec<String>) {
		let cdn_cfg = &self.cfg.cdn;
		let mut slots = vec![ImageSlot { slot: MAIN_IMAGE_SLOT, url: main_image.to_string() }];

		slots.extend((cdn_cfg.gallery_first_slot..=cdn_cfg.gallery_last_slot).map(|slot| {
			ImageSlot { slot, url: cdn::product_image_url(&cdn_cfg.base_url, gallery_id, slot) }
		}));

		let report = images::probe_slots(self.providers.images.clone(), cdn_cfg, slots).await;
		let main = if report.contains_slot(MAIN_IMAGE_SLOT) {
			main_image.to_string()
		} else {
			tracing::info!(main_image, "Main image unavailable; using the default image.");

			cdn::default_image_url(cdn_cfg)
		};
		let mut images = vec![main.clone()];

		images.extend(
			report
				.found
				.into_iter()
				.filter(|image| image.slot != MAIN_IMAGE_SLOT)
				.map(|image| image.url),
		);

		(main, images)
	}
}

fn details_message(source: &str) -> &'static str {
	if source == SOURCE_MOCK {
		"Product details retrieved successfully (mock data)"
	} else {
		"Product details retrieved successfully"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn message_names_mock_source() {
		assert_eq!(
			details_message(SOURCE_MOCK),
			"Product details retrieved successfully (mock data)"
		);
		assert_eq!(details_message(SOURCE_PRODUCT_TABLE), "Product details retrieved successfully");
	}
}
