// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! The four operations exposed to the HTTP layer
//!
//! Remote operations clone into a workspace under `workspace_root` and remove
//! it before returning, whatever the outcome. Local operations validate the
//! path, then open the repository in place.

use std::path::Path;

use serde_json::Value;

use crate::error::RepoError;
use crate::history::{self, CommitSummary, StartRef};
use crate::metadata;
use crate::path;
use crate::repository::{ClonedRepository, RepoHandle};

/// List the commits of a remote repository's policy ref
///
/// # Errors
///
/// Clone, fetch, resolve or traversal failures.
pub fn list_remote_commits(
    url: &str,
    workspace_root: &Path,
) -> Result<Vec<CommitSummary>, RepoError> {
    require("url", url)?;
    with_clone(url, workspace_root, |handle| {
        history::walk(handle, StartRef::PolicyTracking)
    })
}

/// Decode `metadata/<file>` at `commit` in a remote repository
///
/// # Errors
///
/// Clone, fetch, not-found or format failures.
pub fn remote_metadata(
    url: &str,
    commit: &str,
    file: &str,
    workspace_root: &Path,
) -> Result<Value, RepoError> {
    require("url", url)?;
    require("commit", commit)?;
    require("file", file)?;
    with_clone(url, workspace_root, |handle| {
        metadata::decode(handle, commit, file)
    })
}

/// List the commits reachable from HEAD of a local repository
///
/// # Errors
///
/// Path, open, resolve or traversal failures.
pub fn list_local_commits(path: &Path) -> Result<Vec<CommitSummary>, RepoError> {
    let handle = open_validated(path)?;
    history::walk(&handle, StartRef::Head)
}

/// Decode `metadata/<file>` at `commit` in a local repository
///
/// # Errors
///
/// Path, open, not-found or format failures.
pub fn local_metadata(path: &Path, commit: &str, file: &str) -> Result<Value, RepoError> {
    require("commit", commit)?;
    require("file", file)?;
    let handle = open_validated(path)?;
    metadata::decode(&handle, commit, file)
}

fn require(field: &str, value: &str) -> Result<(), RepoError> {
    if value.trim().is_empty() {
        return Err(RepoError::InvalidInput(format!("'{field}' must not be empty")));
    }
    Ok(())
}

fn open_validated(path: &Path) -> Result<RepoHandle, RepoError> {
    if path.as_os_str().is_empty() {
        return Err(RepoError::InvalidInput("'path' must not be empty".to_string()));
    }
    let abs = path::validate_local(path)?;
    RepoHandle::open_local(abs)
}

/// Run `f` against a fresh clone of `url`, then release the clone
fn with_clone<T>(
    url: &str,
    workspace_root: &Path,
    f: impl FnOnce(&RepoHandle) -> Result<T, RepoError>,
) -> Result<T, RepoError> {
    let cloned = ClonedRepository::clone_and_fetch_policy_ref_in(url, workspace_root)?;
    let result = f(cloned.handle());
    cloned.release();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_inputs_rejected_before_io() {
        let root = Path::new("/nonexistent/workspace/root");
        let err = list_remote_commits("  ", root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);

        let err = remote_metadata("https://example.com/r.git", "", "root.json", root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
        assert!(err.to_string().contains("'commit'"));

        let err = list_local_commits(Path::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);

        let err = local_metadata(Path::new("."), "abc123", " ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
    }
}
