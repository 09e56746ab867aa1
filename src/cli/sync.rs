//! Sync command - fast-forward the journal from its remote.

use tracing::info;

use crate::cli::output;
use crate::core::vcs::{Git, Vcs};
use crate::error::Result;

/// Pull with `--ff-only`; never creates merge commits.
pub fn execute(branch: Option<String>) -> Result<()> {
    let settings = crate::cli::settings()?;
    let mut remote = settings.sync_remote();
    if branch.is_some() {
        remote.branch = branch;
    }

    let git = Git::new(&settings.repo_root);
    let summary = git.pull(&remote)?;
    info!(remote = ?remote.name, branch = ?remote.branch, "synced");

    if !summary.is_empty() {
        output::dimmed(&summary);
    }
    output::success("synced");
    Ok(())
}
