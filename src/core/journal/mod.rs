//! Append-only JSON-lines journal.
//!
//! Each append writes exactly one line under an exclusive lock and syncs
//! it to disk before returning. Complete lines are never rewritten.
//!
//! Crash safety:
//!
//! - a failed write or sync truncates the file back to its length before
//!   the append, so no partial record is ever reported or left behind;
//! - bytes after the final newline (a torn tail from a crash mid-append)
//!   are not a record: readers skip them and the next append cuts them off.

mod lock;

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, StorageError};

pub use lock::JournalLock;

const SCAN_CHUNK: u64 = 4096;

/// A JSON-lines journal file.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Append one record as a single line.
    ///
    /// Creates the file and its parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on any I/O, lock or serialization fault. On
    /// error the journal holds exactly the complete records it held before.
    pub fn append<T: Serialize>(&self, record: &T) -> Result<()> {
        let mut line = serde_json::to_string(record).map_err(StorageError::from)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        let mut lock = JournalLock::acquire(file, &self.path)?;
        let file = lock.file();

        let start = self.repair_tail(file)?;

        let written = file
            .seek(SeekFrom::Start(start))
            .and_then(|_| file.write_all(line.as_bytes()))
            .and_then(|_| file.sync_all());

        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "append failed, rolling back");
            self.roll_back(file, start);
            return Err(self.io_err(e).into());
        }

        debug!(
            path = %self.path.display(),
            offset = start,
            bytes = line.len(),
            "record appended"
        );
        Ok(())
    }

    /// Truncate to `len` after a failed append. Returns whether it worked.
    fn roll_back(&self, file: &File, len: u64) -> bool {
        match file.set_len(len).and_then(|_| file.sync_all()) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "rollback failed, journal may end in a partial line"
                );
                false
            }
        }
    }

    /// Cut a torn tail back to the last complete line.
    ///
    /// Returns the offset where the next line starts.
    fn repair_tail(&self, file: &mut File) -> Result<u64> {
        let len = file.metadata().map_err(|e| self.io_err(e))?.len();
        let end = complete_prefix_len(file, len).map_err(|e| self.io_err(e))?;

        if end != len {
            warn!(
                path = %self.path.display(),
                torn_bytes = len - end,
                "discarding incomplete trailing line"
            );
            file.set_len(end)
                .and_then(|_| file.sync_all())
                .map_err(|e| self.io_err(e))?;
        }

        Ok(end)
    }

    /// Read every complete record.
    ///
    /// A missing file reads as empty. Blank lines and a torn tail are
    /// skipped; unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` naming the first line that fails to
    /// parse, or `StorageError::Io` if the file cannot be read.
    pub fn read<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e).into()),
        };

        let mut records = Vec::new();
        for (index, line) in complete_lines(&contents).enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                line: index + 1,
                reason: e.to_string(),
            })?;
            records.push(record);
        }

        debug!(path = %self.path.display(), records = records.len(), "journal read");
        Ok(records)
    }

    /// Number of complete, non-blank lines.
    pub fn len(&self) -> Result<usize> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(complete_lines(&contents)
                .filter(|l| !l.trim().is_empty())
                .count()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(self.io_err(e).into()),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Lines terminated by `\n`; anything after the last newline is dropped.
fn complete_lines(contents: &str) -> impl Iterator<Item = &str> {
    let end = contents.rfind('\n').map(|i| i + 1).unwrap_or(0);
    contents[..end].lines()
}

/// Length of the file up to and including its last newline.
fn complete_prefix_len(file: &mut File, len: u64) -> std::io::Result<u64> {
    let mut end = len;
    let mut buf = vec![0u8; SCAN_CHUNK as usize];

    while end > 0 {
        let start = end.saturating_sub(SCAN_CHUNK);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;

        if let Some(pos) = chunk.iter().rposition(|&b| b == b'\n') {
            return Ok(start + pos as u64 + 1);
        }
        end = start;
    }

    Ok(0)
}
