// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Repository acquisition
//!
//! Local repositories are opened in place. Remote repositories are cloned
//! into a [`Workspace`] and the gittuf policy ref, which a default clone does
//! not transfer, is fetched into a remote-tracking name.

use std::path::{Path, PathBuf};

use git2::Repository;
use git2::build::RepoBuilder;
use tracing::{debug, info};

use crate::error::RepoError;
use crate::workspace::Workspace;

/// The ref gittuf records policy history on
pub const POLICY_REF: &str = "refs/gittuf/policy";

/// Where the fetched policy ref lands in a clone
pub const POLICY_TRACKING_REF: &str = "refs/remotes/origin/gittuf/policy";

/// An opened repository and the location it was opened from
pub struct RepoHandle {
    repo: Repository,
    location: PathBuf,
}

impl std::fmt::Debug for RepoHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoHandle")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl RepoHandle {
    /// Open an existing repository at `path`
    ///
    /// The caller is expected to have run the structural checks in
    /// [`crate::path`]; this is the authoritative check.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Open` if libgit2 cannot open the repository.
    pub fn open_local(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|source| RepoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            repo,
            location: path.to_path_buf(),
        })
    }

    /// Location the repository was opened from
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub(crate) fn repo(&self) -> &Repository {
        &self.repo
    }
}

/// A freshly cloned repository together with the workspace that holds it
///
/// Field order matters: the handle is dropped before the workspace is
/// removed.
#[derive(Debug)]
pub struct ClonedRepository {
    handle: RepoHandle,
    workspace: Workspace,
}

impl ClonedRepository {
    /// Clone `url` into a new workspace under `root` and fetch the policy ref
    ///
    /// On any failure the workspace has already been removed when this
    /// returns.
    ///
    /// # Errors
    ///
    /// - `WorkspaceCreate` or `Clone` (both clone failures)
    /// - `Fetch` if the policy refspec cannot be fetched
    pub fn clone_and_fetch_policy_ref_in(
        url: &str,
        root: impl AsRef<Path>,
    ) -> Result<Self, RepoError> {
        Self::clone_then(url, root, fetch_policy_ref)
    }

    /// Clone `url` into a workspace, then run `fetch` against the clone
    fn clone_then(
        url: &str,
        root: impl AsRef<Path>,
        fetch: impl FnOnce(&Repository) -> Result<(), git2::Error>,
    ) -> Result<Self, RepoError> {
        let mut workspace = Workspace::create_in(root).map_err(RepoError::WorkspaceCreate)?;

        info!(url, path = %workspace.path().display(), "Cloning repository");
        let repo = match RepoBuilder::new().clone(url, workspace.path()) {
            Ok(repo) => repo,
            Err(source) => {
                workspace.release();
                return Err(RepoError::Clone {
                    url: url.to_string(),
                    source,
                });
            }
        };

        info!(refspec = POLICY_REF, "Clone complete, fetching policy ref");
        if let Err(source) = fetch(&repo) {
            drop(repo);
            workspace.release();
            return Err(RepoError::Fetch {
                refspec: policy_refspec(),
                source,
            });
        }

        let handle = RepoHandle {
            repo,
            location: workspace.path().to_path_buf(),
        };
        Ok(Self { handle, workspace })
    }

    /// The opened clone
    #[must_use]
    pub fn handle(&self) -> &RepoHandle {
        &self.handle
    }

    /// Directory the clone lives in
    #[must_use]
    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    /// Close the repository and remove the workspace
    pub fn release(self) {
        let Self {
            handle,
            mut workspace,
        } = self;
        drop(handle);
        workspace.release();
    }
}

fn policy_refspec() -> String {
    format!("{POLICY_REF}:{POLICY_TRACKING_REF}")
}

// A remote that does not advertise the policy ref fetches nothing and
// succeeds; the missing ref is reported when the walk resolves it.
fn fetch_policy_ref(repo: &Repository) -> Result<(), git2::Error> {
    let refspec = policy_refspec();
    let mut remote = repo.find_remote("origin")?;
    remote.fetch(&[refspec.as_str()], None, None)?;
    debug!(refspec = %refspec, "Fetched policy ref");
    Ok(())
}
