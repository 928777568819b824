//! `rates-gateway`: the small HTTP service that sits between the desktop UI and
//! the outside world.
//!
//! - `GET /api/dollar-rate` asks the exchange provider for USD → PKR and keeps
//!   the API key off the client.
//! - `DELETE /api/clear-database?province=` forwards a wipe to the rate backend.
//!
//! Errors always come back as `{"error": "..."}`.

use std::{io, sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get},
    Router,
};
use thiserror::Error;
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

pub mod error;
pub mod routes;
pub mod state;

use crate::config::{AppConfig, ConfigError};
use crate::infra::gateway::{CLEAR_DATABASE_PATH, DOLLAR_RATE_PATH};
use routes::{clear_database_handler, dollar_rate_handler};
use state::{GatewayState, StateError};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("state: {0}")]
    State(#[from] StateError),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

pub fn router(state: Arc<GatewayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(&format!("/{DOLLAR_RATE_PATH}"), get(dollar_rate_handler))
        .route(&format!("/{CLEAR_DATABASE_PATH}"), delete(clear_database_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), ServeError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading configuration...");
    let config = AppConfig::load()?;
    let port = config.gateway_port;

    info!("Initializing state...");
    let state = GatewayState::new(config)?;

    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Gateway running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
