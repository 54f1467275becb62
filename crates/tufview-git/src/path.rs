// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Local path checks performed before a repository is opened

use std::path::{Path, PathBuf};

use crate::error::RepoError;

/// Resolve a possibly-relative path against the process working directory
///
/// # Errors
///
/// Returns `RepoError::PathInvalid` if the path is empty or the working
/// directory cannot be determined.
pub fn resolve_absolute(path: impl AsRef<Path>) -> Result<PathBuf, RepoError> {
    let path = path.as_ref();
    std::path::absolute(path).map_err(|source| RepoError::PathInvalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Check whether any filesystem entry exists at `path`
#[must_use]
pub fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}

/// Check whether `path` contains a `.git` directory
///
/// This is a structural heuristic. A directory whose `.git` is corrupt passes
/// here and fails later when the repository is opened.
#[must_use]
pub fn is_git_repository(path: &Path) -> bool {
    path.join(".git").is_dir()
}

/// Resolve `path` and run both local checks in order
///
/// # Errors
///
/// Returns `PathInvalid`, `PathNotFound` or `NotARepository`, in that order of
/// precedence.
pub fn validate_local(path: impl AsRef<Path>) -> Result<PathBuf, RepoError> {
    let abs = resolve_absolute(path)?;
    if !exists(&abs) {
        return Err(RepoError::PathNotFound { path: abs });
    }
    if !is_git_repository(&abs) {
        return Err(RepoError::NotARepository { path: abs });
    }
    Ok(abs)
}
