use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use fieldstock_core::{ProductId, VendorId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_movements))
        .route("/distribute", post(distribute))
        .route("/return", post(return_stock))
        .route("/transfer", post(transfer))
}

pub async fn distribute(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::DistributeRequest>,
) -> axum::response::Response {
    let vendor_id: VendorId = match body.vendor_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid vendor id"),
    };
    let product_id: ProductId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services
        .coordinator()
        .distribute(vendor_id, product_id, body.quantity, body.notes)
    {
        Ok(committed) => {
            (StatusCode::CREATED, Json(dto::committed_to_json(&committed))).into_response()
        }
        Err(e) => errors::movement_error_to_response(e),
    }
}

pub async fn return_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ReturnRequest>,
) -> axum::response::Response {
    let vendor_id: VendorId = match body.vendor_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid vendor id"),
    };
    let product_id: ProductId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services
        .coordinator()
        .return_stock(vendor_id, product_id, body.quantity, body.notes)
    {
        Ok(committed) => {
            (StatusCode::CREATED, Json(dto::committed_to_json(&committed))).into_response()
        }
        Err(e) => errors::movement_error_to_response(e),
    }
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::TransferRequest>,
) -> axum::response::Response {
    let from_vendor_id: VendorId = match body.from_vendor_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid source vendor id");
        }
    };
    let to_vendor_id: VendorId = match body.to_vendor_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid destination vendor id",
            );
        }
    };
    let product_id: ProductId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.coordinator().transfer(
        from_vendor_id,
        to_vendor_id,
        product_id,
        body.quantity,
        body.notes,
    ) {
        Ok(committed) => {
            (StatusCode::CREATED, Json(dto::committed_to_json(&committed))).into_response()
        }
        Err(e) => errors::movement_error_to_response(e),
    }
}

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.queries().movement_log() {
        Ok(log) => {
            let records: Vec<_> = log.iter().map(dto::movement_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "movements": records }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
