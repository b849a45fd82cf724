//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::application::ApplicationService;
use crate::auth::AuthConfig;
use crate::quote::LoanCalculator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub application_service: Arc<ApplicationService>,
    pub auth: AuthConfig,
    /// Submissions must carry a valid bearer token
    pub require_auth: bool,
}

impl AppState {
    pub fn new(
        application_service: Arc<ApplicationService>,
        auth: AuthConfig,
        require_auth: bool,
    ) -> Self {
        Self {
            application_service,
            auth,
            require_auth,
        }
    }
}

impl FromRef<AppState> for Arc<ApplicationService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.application_service.clone()
    }
}

impl FromRef<AppState> for AuthConfig {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for LoanCalculator {
    fn from_ref(app_state: &AppState) -> Self {
        *app_state.application_service.calculator()
    }
}
