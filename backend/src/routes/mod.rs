//! Route definitions

mod applications;
mod quote;

use axum::{routing::get, Router};

use crate::handlers::health_check;
use crate::middleware::request_tracing;
use crate::state::AppState;

pub use applications::application_routes;
pub use quote::quote_routes;

/// Full API router with request tracing
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(quote_routes())
        .merge(application_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(request_tracing))
}

async fn root() -> &'static str {
    "Loan Application API Server"
}
