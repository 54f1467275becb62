// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Commit history traversal
//!
//! Walks the ancestry of a starting reference with `git2`'s revwalk and
//! projects each commit into a [`CommitSummary`].

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{Oid, Sort};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RepoError;
use crate::repository::{POLICY_TRACKING_REF, RepoHandle};

/// Minimal projection of a commit returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// The commit SHA (40 hex characters)
    pub hash: String,
    /// Commit message with surrounding whitespace removed
    pub message: String,
    /// Author name
    pub author: String,
    /// Author timestamp in the author's own UTC offset
    pub date: DateTime<FixedOffset>,
}

impl CommitSummary {
    fn from_git2(commit: &git2::Commit<'_>) -> Self {
        let author = commit.author();
        Self {
            hash: commit.id().to_string(),
            message: String::from_utf8_lossy(commit.message_bytes())
                .trim()
                .to_string(),
            author: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            date: signature_time(&author.when()),
        }
    }
}

/// Convert a git signature time, keeping its offset
fn signature_time(time: &git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or(Utc.fix());
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&offset)
}

/// Where a history walk begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRef {
    /// The fetched gittuf policy ref of a clone
    PolicyTracking,
    /// The repository's current HEAD
    Head,
}

impl StartRef {
    /// Display name used in errors and logs
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PolicyTracking => POLICY_TRACKING_REF,
            Self::Head => "HEAD",
        }
    }
}

/// Resolve `start` to the commit the walk begins at
fn resolve_start(handle: &RepoHandle, start: StartRef) -> Result<Oid, RepoError> {
    let repo = handle.repo();
    let reference = match start {
        StartRef::PolicyTracking => repo.find_reference(POLICY_TRACKING_REF),
        StartRef::Head => repo.head(),
    };
    reference
        .and_then(|r| r.peel_to_commit())
        .map(|c| c.id())
        .map_err(|source| RepoError::Resolve {
            reference: start.name().to_string(),
            source,
        })
}

/// Walk the full ancestry of `start`, newest first
///
/// Every reachable commit appears exactly once. The result is collected
/// eagerly: an error part-way through discards what was read so far.
///
/// # Errors
///
/// - `RepoError::Resolve` if the starting reference is absent
/// - `RepoError::Traversal` if an object cannot be read during the walk
pub fn walk(handle: &RepoHandle, start: StartRef) -> Result<Vec<CommitSummary>, RepoError> {
    let oid = resolve_start(handle, start)?;
    let repo = handle.repo();

    let mut revwalk = repo.revwalk().map_err(RepoError::Traversal)?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .map_err(RepoError::Traversal)?;
    revwalk.push(oid).map_err(RepoError::Traversal)?;

    let commits = revwalk
        .map(|oid| {
            let oid = oid.map_err(RepoError::Traversal)?;
            let commit = repo.find_commit(oid).map_err(RepoError::Traversal)?;
            Ok(CommitSummary::from_git2(&commit))
        })
        .collect::<Result<Vec<_>, RepoError>>()?;

    debug!(reference = start.name(), count = commits.len(), "Walked history");
    Ok(commits)
}
