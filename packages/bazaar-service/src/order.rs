use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BazaarService, Error, Result};

const SELLER_PRODUCT_PREFIX: &str = "s-";

#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
	pub user_id: String,
	pub product_id: String,
	pub catalog_id: String,
	pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
	pub success: bool,
	pub data: OrderResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
	pub success: bool,
	pub message: String,
	pub order_id: String,
	pub product_id: String,
	pub quantity: u32,
	/// Whether the ordered product was removed from the user's returns history.
	pub returns_synced: bool,
}

impl BazaarService {
	/// Accepts an order and, best effort, drops the product from the user's returns history.
	pub async fn place_order(&self, req: OrderRequest) -> Result<OrderResponse> {
		crate::require_non_empty("user_id", &req.user_id)?;
		crate::require_non_empty("product_id", &req.product_id)?;
		crate::require_non_empty("catalog_id", &req.catalog_id)?;

		if req.quantity == 0 {
			return Err(Error::InvalidRequest {
				message: "quantity must be at least 1.".to_string(),
			});
		}

		self.ensure_user_exists(&req.user_id).await?;

		let order_id = new_order_id();
		let returns_synced = match self.drop_ordered_product(&req).await {
			Ok(()) => true,
			Err(err) => {
				tracing::warn!(
					user_id = %req.user_id,
					product_id = %req.product_id,
					error = %err,
					"Returns history not updated after order."
				);

				false
			},
		};
		let message = if returns_synced {
			"Order placed successfully. Product removed from returns history."
		} else {
			"Order placed successfully. Returns history was not updated."
		};

		tracing::info!(order_id = %order_id, user_id = %req.user_id, returns_synced, "Order placed.");

		Ok(OrderResponse {
			success: true,
			data: OrderResult {
				success: true,
				message: message.to_string(),
				order_id,
				product_id: req.product_id,
				quantity: req.quantity,
				returns_synced,
			},
		})
	}

	async fn drop_ordered_product(&self, req: &OrderRequest) -> Result<()> {
		let code = self.resolve_user_code(&req.user_id).await?;
		let product_id = parse_numeric_id("product_id", &req.product_id)?;
		let catalog_id = parse_numeric_id("catalog_id", &req.catalog_id)?;

		self.providers
			.returns
			.drop_product(&self.cfg.providers.returns, &code, product_id, catalog_id)
			.await?;

		Ok(())
	}
}

/// `ORD-` followed by 12 upper-case hex digits.
pub fn new_order_id() -> String {
	let hex = Uuid::new_v4().simple().to_string().to_uppercase();

	format!("ORD-{}", &hex[..12])
}

/// Parses a numeric identifier, ignoring a leading seller prefix.
pub fn parse_numeric_id(label: &str, raw: &str) -> Result<i64> {
	let trimmed = raw.trim();
	let digits = trimmed.strip_prefix(SELLER_PRODUCT_PREFIX).unwrap_or(trimmed);

	digits.parse::<i64>().map_err(|_| Error::InvalidRequest {
		message: format!("{label} {raw:?} is not a numeric identifier."),
	})
}
