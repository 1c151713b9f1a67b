use sqlx::PgExecutor;

use crate::{
	Error, Result,
	models::{NewPriceProductInfo, PriceProductInfo, UserMapping},
};

const PRICE_INFO_COLUMNS: &str = "\
	id,
	product_id,
	catalog_id,
	sscat_id,
	category,
	sscat,
	name,
	images,
	brand_name,
	supplier_id,
	supplier_listed_price,
	shipping_revenue,
	price_with_shipping,
	created_at";

pub async fn user_exists<'e, E>(executor: E, user_id: &str) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)")
			.bind(user_id)
			.fetch_one(executor)
			.await?;

	Ok(exists)
}

/// Returns the oldest mapping row for the user; later rows are ignored.
pub async fn find_user_mapping<'e, E>(executor: E, user_id: &str) -> Result<Option<UserMapping>>
where
	E: PgExecutor<'e>,
{
	let mapping = sqlx::query_as::<_, UserMapping>(
		"\
SELECT id, user_id, code, city, state, created_at
FROM user_mapping
WHERE user_id = $1
ORDER BY id ASC
LIMIT 1",
	)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(mapping)
}

pub async fn price_info_by_catalog_ids<'e, E>(
	executor: E,
	catalog_ids: &[String],
) -> Result<Vec<PriceProductInfo>>
where
	E: PgExecutor<'e>,
{
	if catalog_ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!(
		"\
SELECT
{PRICE_INFO_COLUMNS}
FROM price_product_info
WHERE catalog_id = ANY($1)
ORDER BY id ASC"
	);
	let rows = sqlx::query_as::<_, PriceProductInfo>(&sql)
		.bind(catalog_ids)
		.fetch_all(executor)
		.await?;

	Ok(rows)
}

pub async fn price_info_by_product_id<'e, E>(
	executor: E,
	product_id: &str,
) -> Result<Option<PriceProductInfo>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
SELECT
{PRICE_INFO_COLUMNS}
FROM price_product_info
WHERE product_id = $1
ORDER BY id ASC
LIMIT 1"
	);
	let row = sqlx::query_as::<_, PriceProductInfo>(&sql)
		.bind(product_id)
		.fetch_optional(executor)
		.await?;

	Ok(row)
}

pub async fn similar_by_subcategory<'e, E>(
	executor: E,
	sscat: &str,
	exclude_product_id: &str,
	limit: u32,
) -> Result<Vec<PriceProductInfo>>
where
	E: PgExecutor<'e>,
{
	if sscat.trim().is_empty() || limit == 0 {
		return Ok(Vec::new());
	}

	let sql = format!(
		"\
SELECT
{PRICE_INFO_COLUMNS}
FROM price_product_info
WHERE sscat = $1
	AND product_id <> $2
ORDER BY id ASC
LIMIT $3"
	);
	let rows = sqlx::query_as::<_, PriceProductInfo>(&sql)
		.bind(sscat)
		.bind(exclude_product_id)
		.bind(i64::from(limit))
		.fetch_all(executor)
		.await?;

	Ok(rows)
}

pub async fn insert_user<'e, E>(
	executor: E,
	user_id: &str,
	phone_number: &str,
	name: &str,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	if user_id.trim().is_empty() {
		return Err(Error::InvalidArgument("user_id must be non-empty.".to_string()));
	}

	sqlx::query(
		"\
INSERT INTO users (user_id, phone_number, name)
VALUES ($1, $2, $3)",
	)
	.bind(user_id)
	.bind(phone_number)
	.bind(name)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn insert_user_mapping<'e, E>(
	executor: E,
	user_id: &str,
	code: &str,
	city: &str,
	state: &str,
) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let id: i64 = sqlx::query_scalar(
		"\
INSERT INTO user_mapping (user_id, code, city, state)
VALUES ($1, $2, $3, $4)
RETURNING id",
	)
	.bind(user_id)
	.bind(code)
	.bind(city)
	.bind(state)
	.fetch_one(executor)
	.await?;

	Ok(id)
}

pub async fn insert_price_info<'e, E>(executor: E, row: &NewPriceProductInfo) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	if row.catalog_id.trim().is_empty() || row.product_id.trim().is_empty() {
		return Err(Error::InvalidArgument(
			"catalog_id and product_id must be non-empty.".to_string(),
		));
	}

	let id: i64 = sqlx::query_scalar(
		"\
INSERT INTO price_product_info (
	product_id,
	catalog_id,
	sscat_id,
	category,
	sscat,
	name,
	images,
	brand_name,
	supplier_id,
	supplier_listed_price,
	shipping_revenue,
	price_with_shipping
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
RETURNING id",
	)
	.bind(row.product_id.as_str())
	.bind(row.catalog_id.as_str())
	.bind(row.sscat_id.as_str())
	.bind(row.category.as_str())
	.bind(row.sscat.as_str())
	.bind(row.name.as_str())
	.bind(row.images.as_str())
	.bind(row.brand_name.as_str())
	.bind(row.supplier_id.as_str())
	.bind(row.supplier_listed_price)
	.bind(row.shipping_revenue)
	.bind(row.price_with_shipping)
	.fetch_one(executor)
	.await?;

	Ok(id)
}
