//! Safety guard.
//!
//! The key file (and every other protected path) must never be tracked by
//! the repository that records the journal. [`check`] is a pure function
//! over an explicit [`TrackedPaths`] snapshot; [`inspect`] builds that
//! snapshot from a [`Vcs`].

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::vcs::Vcs;
use crate::error::{GuardError, Result};

/// Why a path is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Protection {
    /// The encryption key file.
    KeyFile,
    /// The local plaintext copy of the journal.
    PlaintextCopy,
    /// A secret path listed in config.
    Configured,
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyFile => write!(f, "key file"),
            Self::PlaintextCopy => write!(f, "plaintext journal"),
            Self::Configured => write!(f, "protected path"),
        }
    }
}

/// A path that must stay out of version control.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtectedPath {
    pub path: PathBuf,
    pub kind: Protection,
}

impl ProtectedPath {
    pub fn new(path: impl Into<PathBuf>, kind: Protection) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Snapshot of which protected paths version control tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedPaths {
    paths: BTreeSet<PathBuf>,
}

impl TrackedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(path.into());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for TrackedPaths {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Clear,
    Blocked {
        path: PathBuf,
        kind: Protection,
        reason: String,
    },
}

impl Verdict {
    /// Turn a block into `GuardError::Blocked`.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Clear => Ok(()),
            Self::Blocked { path, reason, .. } => Err(GuardError::Blocked {
                path: path.display().to_string(),
                reason,
            }
            .into()),
        }
    }
}

/// Decide whether the run may proceed.
///
/// Blocks on the first protected path found in `tracked`.
pub fn check(protected: &[ProtectedPath], tracked: &TrackedPaths) -> Verdict {
    for item in protected {
        if tracked.contains(&item.path) {
            return Verdict::Blocked {
                path: item.path.clone(),
                kind: item.kind,
                reason: format!(
                    "the {} must not be committed alongside the journal; run `git rm --cached {}` and add it to .gitignore",
                    item.kind,
                    item.path.display()
                ),
            };
        }
    }
    Verdict::Clear
}

/// Query `vcs` for each protected path and return the tracked ones.
///
/// # Errors
///
/// Propagates any failure to query version control.
pub fn inspect(vcs: &dyn Vcs, protected: &[ProtectedPath]) -> Result<TrackedPaths> {
    let mut tracked = TrackedPaths::new();
    for item in protected {
        if vcs.is_tracked(&item.path)? {
            warn!(path = %item.path.display(), kind = %item.kind, "protected path is tracked");
            tracked.insert(item.path.clone());
        }
    }
    debug!(checked = protected.len(), "guard inspection done");
    Ok(tracked)
}
