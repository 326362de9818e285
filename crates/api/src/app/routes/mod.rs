use axum::Router;

pub mod dashboard;
pub mod movements;
pub mod reference;
pub mod stock;
pub mod system;
pub mod vendors;

/// Router for all ledger endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/movements", movements::router())
        .nest("/vendors", vendors::router())
        .nest("/dashboard", dashboard::router())
        .nest("/stock", stock::router())
        .nest("/reference", reference::router())
}
