use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceProductInfo {
	pub id: i64,
	pub product_id: String,
	pub catalog_id: String,
	pub sscat_id: String,
	pub category: String,
	pub sscat: String,
	pub name: String,
	/// Comma-separated image paths or absolute URLs.
	pub images: String,
	pub brand_name: String,
	pub supplier_id: String,
	pub supplier_listed_price: f64,
	pub shipping_revenue: f64,
	pub price_with_shipping: f64,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserMapping {
	pub id: i64,
	pub user_id: String,
	pub code: String,
	pub city: String,
	pub state: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewPriceProductInfo {
	pub product_id: String,
	pub catalog_id: String,
	pub sscat_id: String,
	pub category: String,
	pub sscat: String,
	pub name: String,
	pub images: String,
	pub brand_name: String,
	pub supplier_id: String,
	pub supplier_listed_price: f64,
	pub shipping_revenue: f64,
	pub price_with_shipping: f64,
}
