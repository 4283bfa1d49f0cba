//! Deletion executor and file store abstraction.

use crate::Error;
use crate::models::DeletionOutcome;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// A path-addressable store files can be removed from.
///
/// `remove` is all-or-nothing per path.
pub trait FileStore: Send + Sync {
    /// Removes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error (not found, permission denied, ...).
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// The local (or mounted network) filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

impl<S: FileStore + ?Sized> FileStore for &S {
    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }
}

impl<S: FileStore + ?Sized> FileStore for Arc<S> {
    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }
}

/// Removes (or pretends to remove) eligible files.
#[derive(Debug, Clone)]
pub struct DeletionExecutor<S: FileStore> {
    store: S,
}

impl<S: FileStore> DeletionExecutor<S> {
    /// Creates an executor over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Deletes `path`, or only reports it when `dry_run` is set.
    ///
    /// Never fails: a removal error becomes an outcome with
    /// `succeeded == false` and the [`Error::FileOperation`] text in
    /// `error_detail`.
    pub fn execute(&self, path: &str, dry_run: bool) -> DeletionOutcome {
        if dry_run {
            info!(path, "Would delete file");
            return DeletionOutcome::simulated(path);
        }

        match self.store.remove(Path::new(path)) {
            Ok(()) => {
                info!(path, "Deleted file");
                DeletionOutcome::deleted(path)
            },
            Err(e) => {
                let error = Error::FileOperation {
                    path: path.to_string(),
                    cause: e.to_string(),
                };
                warn!(path, error = %error, "File deletion failed");
                DeletionOutcome::failed(path, error.to_string())
            },
        }
    }
}
