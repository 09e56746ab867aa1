//! Exclusive journal lock.
//!
//! Appends hold an OS file lock (`flock` on Unix, `LockFileEx` on Windows)
//! on the journal itself, so concurrent `quill` processes never interleave
//! lines. The lock is released when the guard drops.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{Result, StorageError};

/// Guard holding an exclusive lock on an open journal file.
#[derive(Debug)]
pub struct JournalLock {
    file: File,
    path: PathBuf,
}

impl JournalLock {
    /// Block until the exclusive lock on `file` is acquired.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Lock` if the lock call fails.
    pub fn acquire(file: File, path: &Path) -> Result<Self> {
        trace!(path = %path.display(), "waiting for journal lock");
        file.lock().map_err(|source| StorageError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        trace!(path = %path.display(), "journal lock acquired");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// The locked file.
    pub fn file(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for JournalLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        trace!(path = %self.path.display(), "journal lock released");
    }
}
