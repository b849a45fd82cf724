//! Loan application route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/applications",
            post(create_application).get(list_applications),
        )
        .route("/api/applications/mine", get(list_my_applications))
        .route("/api/applications/:id", get(get_application))
        .route("/api/applications/:id/step", post(advance_step))
        .route("/api/applications/:id/lender", post(assign_lender))
        .route(
            "/api/applications/:id/lender-response",
            post(record_lender_response),
        )
        .route(
            "/api/applications/:id/account-number",
            post(set_account_number),
        )
        .route("/api/applications/:id/status", post(set_status))
}
