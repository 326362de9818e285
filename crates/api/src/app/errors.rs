use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use fieldstock_infra::coordinator::MovementError;
use fieldstock_infra::event_store::EventStoreError;

/// Map a coordinator outcome to an HTTP response.
///
/// Business rejections (`insufficient_stock`, `exceeds_balance`) are 409:
/// an expected branch, not a server fault. Integrity failures are 500 and
/// non-retryable; infrastructure failures are 503 and retryable.
pub fn movement_error_to_response(err: MovementError) -> axum::response::Response {
    match &err {
        MovementError::InvalidOperation(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_operation", err.to_string())
        }
        MovementError::SameVendor => {
            json_error(StatusCode::BAD_REQUEST, "same_vendor", err.to_string())
        }
        MovementError::InsufficientStock { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_stock", err.to_string())
        }
        MovementError::ExceedsBalance { .. } => {
            json_error(StatusCode::CONFLICT, "exceeds_balance", err.to_string())
        }
        MovementError::Integrity { .. } => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "integrity_error",
            err.to_string(),
        ),
        MovementError::Store(_) | MovementError::Counter(_) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "store_unavailable",
            err.to_string(),
        ),
    }
}

pub fn store_error_to_response(err: EventStoreError) -> axum::response::Response {
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "store_unavailable",
        err.to_string(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
