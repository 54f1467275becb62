// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! tufview library
//!
//! This module exports the HTTP layer of tufview for use in integration
//! tests and by the `tufview` binary.

pub mod config;
pub mod handlers;
pub mod models;
pub mod server;
