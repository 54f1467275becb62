// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Disposable clone workspaces
//!
//! Every remote request clones into its own directory named
//! `gittuf-viz-<uuid>` under a workspace root (the system temp directory by
//! default). The [`Workspace`] guard removes that directory exactly once,
//! either through an explicit [`Workspace::release`] or when it is dropped,
//! so early returns and panics that unwind cannot leak a clone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};
use uuid::Uuid;

/// Prefix shared by every workspace directory
pub const WORKSPACE_PREFIX: &str = "gittuf-viz-";

/// A uniquely-named temporary directory that is removed on release
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create a workspace under `root`
    ///
    /// `create_dir` (not `create_dir_all`) is used for the leaf so that an
    /// existing directory is never adopted.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if `root` is missing or not writable.
    pub fn create_in(root: impl AsRef<Path>) -> io::Result<Self> {
        let path = root
            .as_ref()
            .join(format!("{WORKSPACE_PREFIX}{}", Uuid::new_v4()));
        fs::create_dir(&path)?;
        info!(path = %path.display(), "Created workspace");
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Location of the workspace directory
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`release`](Self::release) has already run
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Remove the directory and everything in it
    ///
    /// Idempotent. A removal failure is logged and swallowed so it never
    /// masks the outcome of the request that owned the workspace.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        info!(path = %self.path.display(), "Cleaning up workspace");
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to remove workspace");
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_uses_prefix() {
        let root = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::create_in(root.path()).expect("create");

        assert!(ws.path().is_dir());
        assert_eq!(ws.path().parent(), Some(root.path()));
        let name = ws.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(WORKSPACE_PREFIX));
    }

    #[test]
    fn test_names_are_unique() {
        let root = tempfile::tempdir().expect("tempdir");
        let a = Workspace::create_in(root.path()).expect("create a");
        let b = Workspace::create_in(root.path()).expect("create b");
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_release_removes_contents() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut ws = Workspace::create_in(root.path()).expect("create");
        fs::create_dir_all(ws.path().join("nested/deeper")).expect("mkdir");
        fs::write(ws.path().join("nested/deeper/file"), "data").expect("write");

        let path = ws.path().to_path_buf();
        ws.release();
        assert!(ws.is_released());
        assert!(!path.exists());
    }

    #[test]
    fn test_release_is_idempotent() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut ws = Workspace::create_in(root.path()).expect("create");
        ws.release();
        ws.release();
        drop(ws);
        assert_eq!(fs::read_dir(root.path()).expect("read_dir").count(), 0);
    }

    #[test]
    fn test_drop_releases() {
        let root = tempfile::tempdir().expect("tempdir");
        let path = {
            let ws = Workspace::create_in(root.path()).expect("create");
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_release_tolerates_missing_directory() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut ws = Workspace::create_in(root.path()).expect("create");
        fs::remove_dir_all(ws.path()).expect("remove behind its back");
        ws.release();
        assert!(ws.is_released());
    }

    #[test]
    fn test_create_in_missing_root_fails() {
        let root = tempfile::tempdir().expect("tempdir");
        let result = Workspace::create_in(root.path().join("does-not-exist"));
        assert!(result.is_err());
    }
}
