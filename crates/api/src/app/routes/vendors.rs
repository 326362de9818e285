use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use fieldstock_core::VendorId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:id/balances", get(get_balances))
}

pub async fn get_balances(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let vendor_id: VendorId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid vendor id"),
    };

    match services.queries().vendor_balances(vendor_id) {
        Ok(balances) => {
            let lines: Vec<_> = balances.iter().map(dto::balance_to_json).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "vendor_id": vendor_id.to_string(),
                    "balances": lines,
                })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
