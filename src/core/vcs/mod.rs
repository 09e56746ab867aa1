//! Version-control collaborator.
//!
//! The pipeline needs four things from version control: whether a path is
//! tracked, staging, committing and pushing. `has_staged_changes` lets a
//! retried commit be a no-op, and `pull` backs `quill sync`.

mod git;

use std::path::Path;

use crate::error::Result;

pub use git::Git;

/// Remote and branch for a push or pull. `None` means git's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remote {
    pub name: Option<String>,
    pub branch: Option<String>,
}

/// Version-control operations used by the pipeline.
///
/// Paths are absolute or relative to the working directory; implementations
/// map them into the repository.
pub trait Vcs {
    /// Whether `path` is tracked or staged. Paths outside the repository
    /// are never tracked.
    fn is_tracked(&self, path: &Path) -> Result<bool>;

    /// Stage `paths`.
    fn stage(&self, paths: &[&Path]) -> Result<()>;

    /// Whether the index holds changes for any of `paths`.
    fn has_staged_changes(&self, paths: &[&Path]) -> Result<bool>;

    /// Commit the index with `message`.
    fn commit(&self, message: &str) -> Result<()>;

    /// Push to `remote`.
    fn push(&self, remote: &Remote) -> Result<()>;

    /// Fast-forward from `remote`, returning git's output.
    fn pull(&self, remote: &Remote) -> Result<String>;
}
