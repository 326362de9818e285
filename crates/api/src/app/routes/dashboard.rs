use std::sync::Arc;

use axum::{
    Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/summary", get(get_summary))
}

pub async fn get_summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.queries().fleet_summary() {
        Ok(overview) => {
            (StatusCode::OK, Json(dto::fleet_overview_to_json(&overview))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
