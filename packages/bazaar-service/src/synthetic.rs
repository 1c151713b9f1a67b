//! Placeholder presentation data for product pages.
//!
//! Every generator draws from the caller's random source, so a seeded source yields the same
//! output for the same inputs.

use std::collections::BTreeMap;

use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::product::{ProductReview, ProductVariant};

pub const BRAND: &str = "Meesho Brand";
pub const SELLER: &str = "Meesho Seller";
pub const DELIVERY_INFO: &str = "Free delivery by tomorrow";
pub const RETURN_POLICY: &str = "7 days return policy";
pub const WARRANTY: &str = "1 year warranty";
pub const REVIEW_COUNT: usize = 5;

const MOCK_CATEGORIES: [&str; 5] = ["Electronics", "Fashion", "Home", "Beauty", "Sports"];
const MOCK_SUB_CATEGORIES: [&str; 5] =
	["Smartphones", "Clothing", "Furniture", "Skincare", "Fitness"];
const REVIEWER_NAMES: [&str; 5] = ["Rahul K.", "Priya S.", "Amit M.", "Neha P.", "Vikram R."];
const REVIEW_TITLES: [&str; 5] = [
	"Great product!",
	"Excellent quality",
	"Worth the money",
	"Good value for money",
	"Happy with purchase",
];
const REVIEW_COMMENTS: [&str; 5] = [
	"Really happy with this purchase. Quality is excellent!",
	"Good product, fast delivery. Would recommend!",
	"Value for money. Meets all expectations.",
	"Great quality and perfect fit. Very satisfied!",
	"Excellent product with good features.",
];
const SIZE_VARIANTS: [(&str, u32); 3] = [("Small", 15), ("Medium", 20), ("Large", 10)];

/// Randomized figures shown alongside a product.
#[derive(Debug, Clone, PartialEq)]
pub struct Engagement {
	pub rating: f64,
	pub reviews: u32,
	pub stock: u32,
}

/// A fabricated product used when no stored row is available.
#[derive(Debug, Clone, PartialEq)]
pub struct MockListing {
	pub catalog_id: String,
	pub category: String,
	pub sub_category: String,
	pub title: String,
	pub price: f64,
	pub original_price: f64,
}

pub fn engagement(rng: &mut impl Rng) -> Engagement {
	let score = rating(rng);

	Engagement { rating: score, reviews: rng.gen_range(100..10_100), stock: rng.gen_range(10..60) }
}

/// Rating in 3.5..=5.0, one decimal place.
pub fn rating(rng: &mut impl Rng) -> f64 {
	let raw = 3.5 + rng.r#gen::<f64>() * 1.5;

	((raw * 10.0).round() / 10.0).clamp(3.5, 5.0)
}

pub fn mock_listing(rng: &mut impl Rng) -> MockListing {
	let price = f64::from(rng.gen_range(100_u32..1_100));
	let original_price = price + f64::from(rng.gen_range(100_u32..600));
	let category = MOCK_CATEGORIES[rng.gen_range(0..MOCK_CATEGORIES.len())];
	let sub_category = MOCK_SUB_CATEGORIES[rng.gen_range(0..MOCK_SUB_CATEGORIES.len())];

	MockListing {
		catalog_id: format!("CAT{}", rng.gen_range(0..1_000_000)),
		category: category.to_string(),
		sub_category: sub_category.to_string(),
		title: format!("Premium {category} {sub_category} with excellent features"),
		price,
		original_price,
	}
}

pub fn specifications() -> BTreeMap<String, String> {
	[
		("Material", "Premium Quality"),
		("Color", "Multiple Options"),
		("Size", "Standard"),
		("Weight", "Lightweight"),
		("Care", "Easy to maintain"),
	]
	.into_iter()
	.map(|(key, value)| (key.to_string(), value.to_string()))
	.collect()
}

/// Size variants priced like the product. The first one is preselected.
pub fn size_variants(price_label: &str) -> Vec<ProductVariant> {
	SIZE_VARIANTS
		.iter()
		.enumerate()
		.map(|(index, (value, stock))| ProductVariant {
			id: (index + 1).to_string(),
			name: "Size".to_string(),
			value: value.to_string(),
			price: price_label.to_string(),
			stock: *stock,
			selected: index == 0,
		})
		.collect()
}

pub fn reviews(rng: &mut impl Rng, product_id: &str, now: OffsetDateTime) -> Vec<ProductReview> {
	(1..=REVIEW_COUNT)
		.map(|index| ProductReview {
			id: format!("review_{product_id}_{index}"),
			user_id: format!("user_{}", rng.gen_range(0..1_000)),
			user_name: REVIEWER_NAMES[rng.gen_range(0..REVIEWER_NAMES.len())].to_string(),
			rating: rng.gen_range(3..=5),
			title: REVIEW_TITLES[rng.gen_range(0..REVIEW_TITLES.len())].to_string(),
			comment: REVIEW_COMMENTS[rng.gen_range(0..REVIEW_COMMENTS.len())].to_string(),
			date: now - Duration::days(rng.gen_range(0..30)),
			verified: rng.gen_bool(0.7),
			helpful: rng.gen_range(0..50),
		})
		.collect()
}

pub fn description(name: &str, category: &str, sub_category: &str) -> String {
	if !name.trim().is_empty() {
		return name.to_string();
	}

	format!(
		"High-quality {} {}. Perfect for your needs with excellent durability and style.",
		category.to_lowercase(),
		sub_category.to_lowercase()
	)
}
