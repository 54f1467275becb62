// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Router construction and the HTTP server loop
//!
//! Routes:
//! - `POST /commits`        - policy ref history of a remote repository
//! - `POST /metadata`       - decoded metadata file from a remote repository
//! - `POST /commits-local`  - HEAD history of a local checkout
//! - `POST /metadata-local` - decoded metadata file from a local checkout

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::handlers;

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Directory remote clones are created under
    pub workspace_root: PathBuf,
}

impl AppState {
    /// Build the state from validated configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            workspace_root: config.workspace_root(),
        }
    }
}

/// CORS policy for the visualizer frontends
///
/// # Errors
///
/// Returns `ConfigError::InvalidOrigin` if an origin is not a valid header
/// value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidOrigin(o.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]))
}

/// Build the axum [`Router`] with all routes and shared state
pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        // Remote repository endpoints
        .route("/commits", post(handlers::list_commits))
        .route("/metadata", post(handlers::get_metadata))
        // Local repository endpoints
        .route("/commits-local", post(handlers::list_commits_local))
        .route("/metadata-local", post(handlers::get_metadata_local))
        .with_state(state)
        .layer(cors)
}

/// Bind `addr` and serve `app` until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns the I/O error if the listener cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

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
            Ok(mut sig) => {
                sig.recv().await;
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
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
