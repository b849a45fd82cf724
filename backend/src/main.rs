//! Loan Application Backend Server
//!
//! Serves the loan quote calculator, application intake and the admin
//! processing workflow.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use loanapp_backend::application::{
    ApplicationRepository, ApplicationService, InMemoryApplicationRepository,
    PgApplicationRepository,
};
use loanapp_backend::auth::AuthConfig;
use loanapp_backend::config::Config;
use loanapp_backend::db;
use loanapp_backend::quote::LoanCalculator;
use loanapp_backend::routes::app_router;
use loanapp_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting loan application server");

    let repository: Arc<dyn ApplicationRepository> = match &config.database_url {
        Some(database_url) => {
            tracing::info!(
                url = ?config.database_url_masked(),
                "Connecting to database..."
            );
            let pool = db::create_pool(database_url, config.db_max_connections)
                .await
                .context("Failed to connect to database")?;
            db::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            Arc::new(PgApplicationRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, applications are kept in memory only");
            Arc::new(InMemoryApplicationRepository::new())
        }
    };

    let calculator =
        LoanCalculator::new(config.annual_rate).context("Invalid loan annual rate")?;
    tracing::info!(annual_rate = %calculator.annual_rate(), "Loan calculator configured");

    let application_service = Arc::new(ApplicationService::new(repository, calculator));

    let app_state = AppState::new(
        application_service,
        AuthConfig::new(config.jwt_secret.clone()),
        config.require_auth,
    );

    let app = app_router(app_state).layer(configure_cors(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let Some(allowed_origins) = allowed_origins else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
