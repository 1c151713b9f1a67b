use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use bazaar_service::{
	CatalogResponse, DirectCatalogRequest, Error as ServiceError, OrderRequest, OrderResponse,
	ProductDetailsRequest, ProductDetailsResponse,
};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "bazaar-api";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/v1/catalog", get(catalog))
		.route("/api/v1/catalog/", get(catalog))
		.route("/api/v1/catalog/direct", post(catalog_direct))
		.route("/api/v1/product/details", get(product_details_by_query))
		.route("/api/v1/product/{product_id}", get(product_details))
		.route("/api/v1/order/place", post(place_order))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: &'static str,
	service: &'static str,
	version: &'static str,
}

#[derive(Debug, Deserialize)]
struct UserQuery {
	user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductQuery {
	product_id: Option<String>,
	user_id: Option<String>,
}

async fn health() -> Json<HealthBody> {
	Json(HealthBody { status: "ok", service: SERVICE_NAME, version: bazaar_cli::VERSION })
}

async fn catalog(
	State(state): State<AppState>,
	query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<CatalogResponse>, ApiError> {
	let Query(query) = query.map_err(query_rejection)?;
	let user_id = required("user_id", query.user_id)?;
	let response = state.service.catalog(&user_id).await?;

	Ok(Json(response))
}

async fn catalog_direct(
	State(state): State<AppState>,
	payload: Result<Json<DirectCatalogRequest>, JsonRejection>,
) -> Result<Json<CatalogResponse>, ApiError> {
	let Json(payload) = payload.map_err(json_rejection)?;
	let response = state.service.catalog_by_ids(payload).await?;

	Ok(Json(response))
}

async fn product_details(
	State(state): State<AppState>,
	Path(product_id): Path<String>,
	query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<ProductDetailsResponse>, ApiError> {
	let Query(query) = query.map_err(query_rejection)?;
	let user_id = required("user_id", query.user_id)?;
	let response =
		state.service.product_details(ProductDetailsRequest { product_id, user_id }).await?;

	Ok(Json(response))
}

async fn product_details_by_query(
	State(state): State<AppState>,
	query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ProductDetailsResponse>, ApiError> {
	let Query(query) = query.map_err(query_rejection)?;
	let product_id = required("product_id", query.product_id)?;
	let user_id = required("user_id", query.user_id)?;
	let response =
		state.service.product_details(ProductDetailsRequest { product_id, user_id }).await?;

	Ok(Json(response))
}

async fn place_order(
	State(state): State<AppState>,
	payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
	let Json(payload) = payload.map_err(json_rejection)?;
	let response = state.service.place_order(payload).await?;

	Ok(Json(response))
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
	match value {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(json_error(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			format!("{field} is required."),
			Some(vec![field.to_string()]),
		)),
	}
}

fn query_rejection(err: QueryRejection) -> ApiError {
	json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
}

fn json_rejection(err: JsonRejection) -> ApiError {
	json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	success: bool,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Collaborator error.");

				json_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message, None)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage error.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", message, None)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			success: false,
			error_code: self.error_code,
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
