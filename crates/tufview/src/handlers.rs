// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Request handlers
//!
//! Each handler validates its body, then runs the matching core operation on
//! the blocking pool, since clones and object reads block on I/O.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;
use tracing::info;
use tufview_git::{CommitSummary, RepoError};

use crate::models::{
    ApiError, CommitsLocalRequest, CommitsRequest, MetadataLocalRequest, MetadataRequest, present,
};
use crate::server::AppState;

const MISSING_URL: &str = "Missing 'url' in request body";
const MISSING_URL_FIELDS: &str = "Missing 'url', 'commit', or 'file' in request body";
const MISSING_PATH: &str = "Missing 'path' in request body";
const MISSING_PATH_FIELDS: &str = "Missing 'path', 'commit', or 'file' in request body";

/// Run a blocking core operation and convert its failure
async fn run_blocking<T, F>(route: &'static str, failure: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RepoError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ApiError::from_repo(route, failure, &err)),
        Err(join_err) => {
            tracing::error!(route, error = %join_err, "Blocking task failed");
            Err(ApiError::internal(join_err.to_string()))
        }
    }
}

/// `POST /commits`: list the policy ref history of a remote repository
pub async fn list_commits(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CommitsRequest>, JsonRejection>,
) -> Result<Json<Vec<CommitSummary>>, ApiError> {
    let Some(url) = payload.ok().and_then(|Json(req)| present(req.url)) else {
        return Err(ApiError::bad_request(MISSING_URL));
    };
    info!(route = "/commits", %url, "Request received");

    let root = state.workspace_root.clone();
    let commits = run_blocking("/commits", "Failed to retrieve commits", move || {
        tufview_git::list_remote_commits(&url, &root)
    })
    .await?;

    info!(route = "/commits", count = commits.len(), "Found commits");
    Ok(Json(commits))
}

/// `POST /metadata`: decode a metadata file from a remote repository
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetadataRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Some((url, commit, file)) = payload.ok().and_then(|Json(req)| {
        Some((present(req.url)?, present(req.commit)?, present(req.file)?))
    }) else {
        return Err(ApiError::bad_request(MISSING_URL_FIELDS));
    };
    info!(route = "/metadata", %url, %commit, %file, "Request received");

    let root = state.workspace_root.clone();
    let metadata = run_blocking("/metadata", "Failed to decode metadata", move || {
        tufview_git::remote_metadata(&url, &commit, &file, &root)
    })
    .await?;

    Ok(Json(metadata))
}

/// `POST /commits-local`: list the HEAD history of a local checkout
pub async fn list_commits_local(
    payload: Result<Json<CommitsLocalRequest>, JsonRejection>,
) -> Result<Json<Vec<CommitSummary>>, ApiError> {
    let Some(path) = payload.ok().and_then(|Json(req)| present(req.path)) else {
        return Err(ApiError::bad_request(MISSING_PATH));
    };
    info!(route = "/commits-local", %path, "Request received");

    let path = PathBuf::from(path);
    let commits = run_blocking("/commits-local", "Failed to load commits", move || {
        tufview_git::list_local_commits(&path)
    })
    .await?;

    Ok(Json(commits))
}

/// `POST /metadata-local`: decode a metadata file from a local checkout
pub async fn get_metadata_local(
    payload: Result<Json<MetadataLocalRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Some((path, commit, file)) = payload.ok().and_then(|Json(req)| {
        Some((present(req.path)?, present(req.commit)?, present(req.file)?))
    }) else {
        return Err(ApiError::bad_request(MISSING_PATH_FIELDS));
    };
    info!(route = "/metadata-local", %path, %commit, %file, "Request received");

    let path = PathBuf::from(path);
    let metadata = run_blocking("/metadata-local", "Failed to fetch metadata", move || {
        tufview_git::local_metadata(&path, &commit, &file)
    })
    .await?;

    Ok(Json(metadata))
}
