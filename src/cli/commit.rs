//! Commit command - stage, commit and optionally push the journal.
//!
//! Retries the history steps of a write whose commit or push failed. Safe
//! to run repeatedly.

use crate::cli::output;
use crate::core::cipher::AesGcm;
use crate::core::pipeline::{Pipeline, Stage};
use crate::core::vcs::Git;
use crate::error::{Error, Result};

const DEFAULT_MESSAGE: &str = "Record journal entries";

/// Record the journal in git history.
pub fn execute(message: Option<String>, push: bool) -> Result<()> {
    let settings = crate::cli::settings()?;
    let git = Git::new(&settings.repo_root);
    let pipeline = Pipeline::new(&settings, settings.key_provider(), &AesGcm, &git);

    pipeline
        .check_guard()
        .map_err(|e| Error::at(Stage::Guard, e))?;

    let message = message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let history = pipeline.record_history(&message, true, push, &settings.push_remote());

    if history.committed {
        output::success("committed");
    } else if history.nothing_to_commit {
        output::dimmed("nothing to commit");
    }
    if history.pushed {
        output::success("pushed");
    }

    match history.failure {
        Some(failure) => Err(Error::at(failure.stage, failure.error)),
        None => Ok(()),
    }
}
