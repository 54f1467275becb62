// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! CLI tests for the tufview server flags
//!
//! These tests verify flag parsing, defaults and the resulting log level and
//! listen address.

use std::net::SocketAddr;

use clap::Parser;
use tracing::Level;
use tufview::config::{Config, ConfigError};

// ============================================================================
// Listen address
// ============================================================================

#[test]
fn test_port_long_flag() {
    let config = Config::try_parse_from(["tufview", "--port", "8080"]).expect("parse should succeed");
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.listen_addr().expect("addr").port(), 8080);
}

#[test]
fn test_port_short_flag() {
    let config = Config::try_parse_from(["tufview", "-p", "9000"]).expect("parse should succeed");
    assert_eq!(config.port, Some(9000));
}

#[test]
fn test_port_out_of_range_rejected() {
    let result = Config::try_parse_from(["tufview", "--port", "70000"]);
    assert!(result.is_err(), "port must fit in u16");
}

#[test]
fn test_host_and_port_combined() {
    let config = Config::try_parse_from(["tufview", "--host", "127.0.0.1", "--port", "5001"])
        .expect("parse should succeed");
    assert_eq!(
        config.listen_addr().expect("addr"),
        "127.0.0.1:5001".parse::<SocketAddr>().expect("socket addr")
    );
}

#[test]
fn test_ipv6_host() {
    let config =
        Config::try_parse_from(["tufview", "--host", "::1"]).expect("parse should succeed");
    assert!(config.listen_addr().expect("addr").is_ipv6());
}

#[test]
fn test_hostname_host_rejected_at_validation() {
    let config =
        Config::try_parse_from(["tufview", "--host", "example.com"]).expect("parse should succeed");
    assert!(matches!(config.validate(), Err(ConfigError::InvalidHost(_))));
}

// ============================================================================
// Allowed origins
// ============================================================================

#[test]
fn test_allowed_origin_repeated() {
    let config = Config::try_parse_from([
        "tufview",
        "--allowed-origin",
        "https://a.example.com",
        "--allowed-origin",
        "https://b.example.com",
    ])
    .expect("parse should succeed");
    assert_eq!(
        config.origins(),
        vec!["https://a.example.com", "https://b.example.com"]
    );
}

#[test]
fn test_allowed_origin_comma_separated() {
    let config = Config::try_parse_from([
        "tufview",
        "--allowed-origin",
        "https://a.example.com,https://b.example.com",
    ])
    .expect("parse should succeed");
    assert_eq!(config.allowed_origins.len(), 2);
}

#[test]
fn test_no_allowed_origin_uses_defaults() {
    let config = Config::try_parse_from(["tufview"]).expect("parse should succeed");
    assert_eq!(
        config.origins(),
        vec!["http://localhost:3000", "http://localhost:5173"]
    );
}

// ============================================================================
// Workspace root
// ============================================================================

#[test]
fn test_workspace_root_flag() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_str().expect("utf-8 path");
    let config = Config::try_parse_from(["tufview", "--workspace-root", path])
        .expect("parse should succeed");
    assert_eq!(config.workspace_root(), dir.path());
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_root_missing_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("gone");
    let config = Config::try_parse_from([
        "tufview",
        "--workspace-root",
        missing.to_str().expect("utf-8 path"),
    ])
    .expect("parse should succeed");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::WorkspaceRootNotFound(_))
    ));
}

// ============================================================================
// Logging flags
// ============================================================================

#[test]
fn test_verbose_short_flag_v() {
    let config = Config::try_parse_from(["tufview", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_quiet_short_flag_q() {
    let config = Config::try_parse_from(["tufview", "-q"]).expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_verbose_wins_over_quiet() {
    let config = Config::try_parse_from(["tufview", "-v", "-q"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_verbose_flag_value_syntax_not_supported() {
    // Boolean flags are toggled by presence only
    let result = Config::try_parse_from(["tufview", "--verbose=true"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_flag_rejected() {
    let result = Config::try_parse_from(["tufview", "--database", "x.db"]);
    assert!(result.is_err());
}
