// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! tufview-git: repository access and gittuf metadata decoding for tufview
//!
//! This library crate acquires repositories (opening a local checkout, or
//! cloning a remote into a disposable workspace and fetching its gittuf
//! policy ref), walks commit history into [`CommitSummary`] values, and
//! decodes the signing envelopes gittuf stores under `metadata/`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let commits = tufview_git::list_local_commits(Path::new(".")).expect("list commits");
//! for c in &commits {
//!     println!("{} {}", &c.hash[..7], c.message);
//! }
//!
//! let root = tufview_git::local_metadata(Path::new("."), &commits[0].hash, "root.json")
//!     .expect("decode root.json");
//! println!("{root:#}");
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod error;
pub mod history;
pub mod metadata;
pub mod path;
pub mod repository;
pub mod workspace;

pub use api::{list_local_commits, list_remote_commits, local_metadata, remote_metadata};
pub use error::{ErrorKind, FormatStage, RepoError};
pub use history::{CommitSummary, StartRef};
pub use repository::{ClonedRepository, POLICY_REF, POLICY_TRACKING_REF, RepoHandle};
pub use workspace::Workspace;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ErrorKind, RepoError};
    pub use crate::history::CommitSummary;
    pub use crate::repository::{ClonedRepository, RepoHandle};
}
