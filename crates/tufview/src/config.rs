// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the tufview server
//!
//! Every option can be given as a flag or through the environment, so the
//! server can be started the same way from a shell or a container.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Port used when neither `--port` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 5000;

/// Host used when neither `--host` nor `TUFVIEW_HOST` is set
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Origins of the visualizer dev servers
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// tufview - HTTP backend for the gittuf visualizer
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tufview")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "TUFVIEW_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Origin allowed to call the API (repeatable, or comma-separated)
    ///
    /// Defaults to the local visualizer dev servers on ports 3000 and 5173.
    #[arg(long = "allowed-origin", env = "TUFVIEW_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Directory under which remote repositories are cloned
    ///
    /// Each request gets its own `gittuf-viz-*` directory, removed when the
    /// request finishes. Defaults to the system temp directory.
    #[arg(long, env = "TUFVIEW_WORKSPACE_ROOT")]
    pub workspace_root: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Config {
    /// The socket address to bind
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHost` if the host is not an IP address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(host.to_string()))?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Allowed CORS origins, falling back to the defaults when none are set
    #[must_use]
    pub fn origins(&self) -> Vec<String> {
        if self.allowed_origins.is_empty() {
            DEFAULT_ALLOWED_ORIGINS.iter().map(ToString::to_string).collect()
        } else {
            self.allowed_origins.clone()
        }
    }

    /// Directory remote clones are created under
    #[must_use]
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The listen address cannot be parsed
    /// - An allowed origin is not a valid header value
    /// - The workspace root is specified but doesn't exist or isn't a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;

        for origin in self.origins() {
            if origin.trim().is_empty() || axum::http::HeaderValue::from_str(&origin).is_err() {
                return Err(ConfigError::InvalidOrigin(origin));
            }
        }

        if let Some(ref root) = self.workspace_root {
            if !root.exists() {
                return Err(ConfigError::WorkspaceRootNotFound(root.clone()));
            }
            if !root.is_dir() {
                return Err(ConfigError::WorkspaceRootNotDirectory(root.clone()));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Host is not an IP address
    #[error("Invalid listen host: {0}")]
    InvalidHost(String),

    /// Origin cannot be used as a header value
    #[error("Invalid allowed origin: {0:?}")]
    InvalidOrigin(String),

    /// Workspace root not found
    #[error("Workspace root not found: {}", .0.display())]
    WorkspaceRootNotFound(PathBuf),

    /// Workspace root is not a directory
    #[error("Workspace root is not a directory: {}", .0.display())]
    WorkspaceRootNotDirectory(PathBuf),
}
