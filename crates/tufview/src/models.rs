// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Request bodies, error responses and the mapping from core errors

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use tufview_git::{ErrorKind, RepoError};

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /commits`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitsRequest {
    /// Remote repository URL
    pub url: Option<String>,
}

/// Body of `POST /metadata`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataRequest {
    /// Remote repository URL
    pub url: Option<String>,
    /// Commit hash on the policy ref
    pub commit: Option<String>,
    /// File name under `metadata/`
    pub file: Option<String>,
}

/// Body of `POST /commits-local`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitsLocalRequest {
    /// Filesystem path to a checkout
    pub path: Option<String>,
}

/// Body of `POST /metadata-local`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataLocalRequest {
    /// Filesystem path to a checkout
    pub path: Option<String>,
    /// Commit hash
    pub commit: Option<String>,
    /// File name under `metadata/`
    pub file: Option<String>,
}

/// Keep a field only if it holds something other than whitespace
pub(crate) fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

// ============================================================================
// Error Responses
// ============================================================================

/// JSON body returned with every failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable summary
    pub error: String,
    /// HTTP status code, repeated in the body
    pub code: u16,
    /// Underlying cause, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A failed request, ready to be rendered as an [`ErrorResponse`]
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    /// A 400 for a malformed or incomplete request body
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    /// A 500 with no core error behind it
    #[must_use]
    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
            details: Some(details.into()),
        }
    }

    /// Convert a core failure, logging it once
    ///
    /// `failure` is the summary for errors raised after the repository was
    /// acquired. Clone and fetch failures always use their own summary.
    #[must_use]
    pub fn from_repo(route: &str, failure: &str, err: &RepoError) -> Self {
        let kind = err.kind();
        let status = status_for(kind);
        let (message, details) = match err {
            RepoError::PathNotFound { path } | RepoError::NotARepository { path } => {
                (err.to_string(), Some(path.display().to_string()))
            }
            RepoError::PathInvalid { source, .. } => {
                ("Invalid path".to_string(), Some(source.to_string()))
            }
            RepoError::InvalidInput(msg) => (msg.clone(), None),
            _ if matches!(kind, ErrorKind::CloneFailure | ErrorKind::FetchFailure) => (
                "Failed to clone or fetch repository".to_string(),
                Some(err.to_string()),
            ),
            _ => (failure.to_string(), Some(err.to_string())),
        };

        if status.is_server_error() {
            error!(route, kind = ?kind, error = %err, "Request failed");
        } else {
            warn!(route, kind = ?kind, error = %err, "Request rejected");
        }

        Self {
            status,
            message,
            details,
        }
    }

    /// HTTP status of the response
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Summary message of the response
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// HTTP status for each failure category
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InputInvalid | ErrorKind::PathInvalid | ErrorKind::NotARepository => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::OpenFailure
        | ErrorKind::CloneFailure
        | ErrorKind::FetchFailure
        | ErrorKind::ResolveFailure
        | ErrorKind::TraversalFailure
        | ErrorKind::FormatFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.status.as_u16(),
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}
