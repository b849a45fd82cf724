//! Quote route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn quote_routes() -> Router<AppState> {
    Router::new().route("/api/quote", get(get_quote).post(post_quote))
}
