// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! tufview: HTTP backend for the gittuf visualizer
//!
//! Serves commit listings and decoded gittuf metadata for remote repositories
//! and local checkouts.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tufview::config::Config;
use tufview::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    config.validate().context("invalid configuration")?;

    let addr = config.listen_addr()?;
    let cors = server::cors_layer(&config.origins())?;
    let state = Arc::new(AppState::from_config(&config));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        workspace_root = %state.workspace_root.display(),
        origins = ?config.origins(),
        "Starting tufview server"
    );

    let app = server::create_router(state, cors);
    server::serve(addr, app)
        .await
        .with_context(|| format!("server on {addr} failed"))?;

    info!("Server stopped");
    Ok(())
}
