//! Seeding endpoints for the in-memory catalog/directory stubs.
//!
//! Products and vendors are owned by external services in a full
//! deployment; these routes exist so a dev/demo instance has names and
//! prices to decorate query output with.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::put,
};

use fieldstock_core::{ProductId, VendorId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/products/:id", put(put_product))
        .route("/vendors/:id", put(put_vendor))
}

pub async fn put_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProductStubRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    services.catalog().upsert(product_id, body.name, body.unit_price);
    (StatusCode::OK, Json(serde_json::json!({ "product_id": product_id.to_string() })))
        .into_response()
}

pub async fn put_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::VendorStubRequest>,
) -> axum::response::Response {
    let vendor_id: VendorId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid vendor id"),
    };

    services.directory().upsert(vendor_id, body.name);
    (StatusCode::OK, Json(serde_json::json!({ "vendor_id": vendor_id.to_string() })))
        .into_response()
}
