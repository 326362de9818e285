use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use fieldstock_core::ProductId;
use fieldstock_infra::central_stock::CentralStockStore;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:product_id", get(get_level).put(set_level))
}

pub async fn get_level(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.stock().level(product_id) {
        Ok(level) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "product_id": product_id.to_string(),
                "quantity": level,
            })),
        )
            .into_response(),
        Err(e) => errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "stock_unavailable", e.to_string()),
    }
}

/// Seed or correct the warehouse quantity for a product.
pub async fn set_level(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
    Json(body): Json<dto::SetStockRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.stock().set_level(product_id, body.quantity) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "product_id": product_id.to_string(),
                "quantity": body.quantity,
            })),
        )
            .into_response(),
        Err(e) => errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "stock_unavailable", e.to_string()),
    }
}
