// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for tufview-git

use std::path::PathBuf;

use thiserror::Error;

/// Coarse failure category, stable across error variants
///
/// The HTTP layer maps these to status codes; tests assert on them instead of
/// matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required request field was missing or empty
    InputInvalid,
    /// A local path could not be resolved or does not exist
    PathInvalid,
    /// A local path has no `.git` directory
    NotARepository,
    /// A repository passed the structural check but could not be opened
    OpenFailure,
    /// The workspace could not be created or the clone failed
    CloneFailure,
    /// Fetching the policy ref failed
    FetchFailure,
    /// The starting reference of a history walk is absent
    ResolveFailure,
    /// An I/O or object error occurred during a history walk
    TraversalFailure,
    /// A commit or a metadata file is absent
    NotFound,
    /// The envelope or its payload is malformed
    FormatFailure,
}

/// Stage of envelope decoding that rejected its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStage {
    /// The blob is not a JSON object
    Envelope,
    /// `payload` is absent or not a string
    Payload,
    /// `payload` is not valid padded base64
    Base64,
    /// The decoded payload is not JSON
    DecodedJson,
}

impl std::fmt::Display for FormatStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Envelope => "envelope JSON invalid",
            Self::Payload => "payload field missing or not a string",
            Self::Base64 => "base64 decode failed",
            Self::DecodedJson => "decoded payload is not valid JSON",
        };
        f.write_str(text)
    }
}

/// Errors that can occur while accessing repositories and decoding metadata
#[derive(Debug, Error)]
pub enum RepoError {
    /// A required input was missing
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The path could not be made absolute
    #[error("Invalid path {}: {source}", path.display())]
    PathInvalid {
        /// The path as supplied
        path: PathBuf,
        /// Underlying resolution error
        #[source]
        source: std::io::Error,
    },

    /// Nothing exists at the path
    #[error("Path does not exist: {}", path.display())]
    PathNotFound {
        /// The absolute path that was checked
        path: PathBuf,
    },

    /// The path exists but has no `.git` directory
    #[error("Not a valid Git repository: {}", path.display())]
    NotARepository {
        /// The absolute path that was checked
        path: PathBuf,
    },

    /// libgit2 refused to open the repository
    #[error("failed to open repository at {}: {source}", path.display())]
    Open {
        /// Repository location
        path: PathBuf,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// The temporary workspace could not be created
    #[error("failed to create temp directory: {0}")]
    WorkspaceCreate(#[source] std::io::Error),

    /// Cloning the remote failed
    #[error("failed to clone repository {url}: {source}")]
    Clone {
        /// Remote URL
        url: String,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// Fetching the policy ref failed
    #[error("failed to fetch {refspec}: {source}")]
    Fetch {
        /// The refspec that was requested
        refspec: String,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// The starting reference of a walk could not be resolved
    #[error("failed to resolve {reference}: {source}")]
    Resolve {
        /// The reference name
        reference: String,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// The walk failed after it started
    #[error("failed to iterate commits: {0}")]
    Traversal(#[source] git2::Error),

    /// The commit does not exist in the repository
    #[error("commit {commit} not found")]
    CommitNotFound {
        /// The commit hash as requested
        commit: String,
    },

    /// The commit's tree has no such metadata file
    #[error("file {path} not found in commit {commit}")]
    FileNotFound {
        /// Tree path that was looked up
        path: String,
        /// Commit whose tree was searched
        commit: String,
    },

    /// The commit tree or blob could not be read
    #[error("failed to read {path} in commit {commit}: {source}")]
    ReadBlob {
        /// Tree path that was read
        path: String,
        /// Commit whose tree was read
        commit: String,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// The envelope or its payload is malformed
    #[error("{stage}: {detail}")]
    Format {
        /// Decode stage that failed
        stage: FormatStage,
        /// Description of the underlying problem
        detail: String,
    },
}

impl RepoError {
    /// The category this error belongs to
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InputInvalid,
            Self::PathInvalid { .. } | Self::PathNotFound { .. } => ErrorKind::PathInvalid,
            Self::NotARepository { .. } => ErrorKind::NotARepository,
            Self::Open { .. } => ErrorKind::OpenFailure,
            Self::WorkspaceCreate(_) | Self::Clone { .. } => ErrorKind::CloneFailure,
            Self::Fetch { .. } => ErrorKind::FetchFailure,
            Self::Resolve { .. } => ErrorKind::ResolveFailure,
            Self::Traversal(_) | Self::ReadBlob { .. } => ErrorKind::TraversalFailure,
            Self::CommitNotFound { .. } | Self::FileNotFound { .. } => ErrorKind::NotFound,
            Self::Format { .. } => ErrorKind::FormatFailure,
        }
    }

    pub(crate) fn format(stage: FormatStage, detail: impl ToString) -> Self {
        Self::Format {
            stage,
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_names_stage() {
        let err = RepoError::format(FormatStage::Base64, "Invalid padding");
        assert_eq!(err.to_string(), "base64 decode failed: Invalid padding");
        assert_eq!(err.kind(), ErrorKind::FormatFailure);
    }

    #[test]
    fn test_not_found_variants_share_kind() {
        let commit = RepoError::CommitNotFound {
            commit: "abc123".to_string(),
        };
        let file = RepoError::FileNotFound {
            path: "metadata/root.json".to_string(),
            commit: "abc123".to_string(),
        };
        assert_eq!(commit.kind(), ErrorKind::NotFound);
        assert_eq!(file.kind(), ErrorKind::NotFound);
        assert!(commit.to_string().contains("abc123"));
        assert!(file.to_string().contains("metadata/root.json"));
    }

    #[test]
    fn test_workspace_failure_counts_as_clone_failure() {
        let err = RepoError::WorkspaceCreate(std::io::Error::other("disk full"));
        assert_eq!(err.kind(), ErrorKind::CloneFailure);
    }

    #[test]
    fn test_path_errors() {
        let missing = RepoError::PathNotFound {
            path: PathBuf::from("/tmp/nope"),
        };
        assert_eq!(missing.kind(), ErrorKind::PathInvalid);
        assert_eq!(missing.to_string(), "Path does not exist: /tmp/nope");

        let not_repo = RepoError::NotARepository {
            path: PathBuf::from("/tmp/not-a-repo"),
        };
        assert_eq!(not_repo.kind(), ErrorKind::NotARepository);
    }
}
