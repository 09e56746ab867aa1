//! Encrypt-and-commit pipeline.
//!
//! ```text
//! GUARD ─▶ RESOLVE_KEY ─▶ ENCRYPT ─▶ APPEND ─▶ STAGE ─▶ COMMIT ─▶ PUSH
//!   │          │             │          │         └────────┴────────┴─▶ reported, record kept
//!   └──────────┴─────────────┴──────────┴─▶ abort, nothing written
//! ```
//!
//! Everything up to and including APPEND either completes or aborts with
//! no record written. Once the record is appended it is durable; the
//! history steps are best effort and their failures are reported in the
//! [`Outcome`], never rolled back. Dry runs stop after ENCRYPT.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::cipher::Cipher;
use crate::core::config::Settings;
use crate::core::constants::SCHEMA_VERSION;
use crate::core::domain::{format_timestamp, Entry, PlaintextRecord, Record};
use crate::core::guard;
use crate::core::journal::Journal;
use crate::core::key::KeyProvider;
use crate::core::vcs::{Remote, Vcs};
use crate::error::{Error, Result};

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Guard,
    ResolveKey,
    Encrypt,
    Append,
    LocalCopy,
    Stage,
    Commit,
    Push,
}

impl Stage {
    /// Whether the stage runs after the record is stored.
    pub fn is_history(self) -> bool {
        matches!(self, Self::Stage | Self::Commit | Self::Push)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Guard => "guard check",
            Self::ResolveKey => "key resolution",
            Self::Encrypt => "encryption",
            Self::Append => "append",
            Self::LocalCopy => "plaintext copy",
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::Push => "push",
        };
        f.write_str(name)
    }
}

/// Options for one `write`.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Stop after encryption; touch nothing.
    pub dry_run: bool,
    /// Skip COMMIT (and therefore PUSH). Staging still happens.
    pub no_commit: bool,
    /// Push after committing.
    pub push: bool,
    /// Commit message; defaults to `Encrypted entry <timestamp>`.
    pub message: Option<String>,
    /// Push target; defaults come from settings.
    pub remote: Option<Remote>,
    /// Explicit entry id; defaults to a random UUID.
    pub entry_id: Option<String>,
}

/// A best-effort step that failed after the record was stored.
#[derive(Debug)]
pub struct StepFailure {
    pub stage: Stage,
    pub error: Error,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// What happened to the history steps.
#[derive(Debug, Default)]
pub struct History {
    pub staged: bool,
    pub committed: bool,
    /// The index held no changes to the journal, so no commit was made.
    pub nothing_to_commit: bool,
    pub pushed: bool,
    pub failure: Option<StepFailure>,
}

impl History {
    fn failed(mut self, stage: Stage, error: Error) -> Self {
        warn!(%stage, error = %error, "history step failed, record kept");
        self.failure = Some(StepFailure { stage, error });
        self
    }
}

/// Result of a `write`.
#[derive(Debug)]
pub struct Outcome {
    /// The appended record, or the would-be record on a dry run.
    pub record: Record,
    pub dry_run: bool,
    /// Whether the plaintext copy was written.
    pub local_copy: bool,
    pub history: History,
    /// Failures of best-effort steps other than history.
    pub warnings: Vec<StepFailure>,
}

/// The encrypt-and-commit pipeline.
pub struct Pipeline<'a> {
    settings: &'a Settings,
    keys: KeyProvider,
    cipher: &'a dyn Cipher,
    vcs: &'a dyn Vcs,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        keys: KeyProvider,
        cipher: &'a dyn Cipher,
        vcs: &'a dyn Vcs,
    ) -> Self {
        Self {
            settings,
            keys,
            cipher,
            vcs,
        }
    }

    /// Run the guard alone.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Blocked` if a protected path is tracked, or the
    /// VCS error if tracking cannot be determined.
    pub fn check_guard(&self) -> Result<()> {
        let protected = self.settings.protected();
        let tracked = guard::inspect(self.vcs, &protected)?;
        guard::check(&protected, &tracked).into_result()
    }

    /// Encrypt `entry` and append it to the journal.
    ///
    /// # Errors
    ///
    /// Returns `Error::Aborted` naming the stage that stopped the run. No
    /// record is written when this returns an error.
    pub fn write(&self, entry: Entry, opts: &WriteOptions) -> Result<Outcome> {
        self.check_guard().map_err(|e| Error::at(Stage::Guard, e))?;
        debug!("guard clear");

        let record = {
            let key = self
                .keys
                .resolve_key()
                .map_err(|e| Error::at(Stage::ResolveKey, e))?;

            let sealed = self
                .cipher
                .encrypt(&key, entry.text().as_bytes())
                .map_err(|e| Error::at(Stage::Encrypt, e))?;

            let entry_id = opts
                .entry_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

            Record::seal(
                entry_id,
                format_timestamp(Utc::now()),
                &sealed,
                Some(self.settings.config.key_label.clone()),
                entry.metadata().clone(),
                entry.tags().to_vec(),
            )
        };
        debug!(cipher = self.cipher.name(), "entry encrypted");

        if opts.dry_run {
            info!("dry run, nothing written");
            return Ok(Outcome {
                record,
                dry_run: true,
                local_copy: false,
                history: History::default(),
                warnings: Vec::new(),
            });
        }

        Journal::new(&self.settings.data_path)
            .append(&record)
            .map_err(|e| Error::at(Stage::Append, e))?;
        info!(path = %self.settings.data_path.display(), "record appended");

        let mut warnings = Vec::new();
        let local_copy = match self.write_local_copy(&entry, &record) {
            Ok(written) => written,
            Err(error) => {
                warn!(error = %error, "plaintext copy failed, encrypted record kept");
                warnings.push(StepFailure {
                    stage: Stage::LocalCopy,
                    error,
                });
                false
            }
        };

        let history = if self.settings.config.git.enabled {
            let message = opts
                .message
                .clone()
                .unwrap_or_else(|| format!("Encrypted entry {}", record.timestamp));
            let remote = opts
                .remote
                .clone()
                .unwrap_or_else(|| self.settings.push_remote());
            self.record_history(&message, !opts.no_commit, opts.push, &remote)
        } else {
            debug!("git disabled, skipping history");
            History::default()
        };

        Ok(Outcome {
            record,
            dry_run: false,
            local_copy,
            history,
            warnings,
        })
    }

    fn write_local_copy(&self, entry: &Entry, record: &Record) -> Result<bool> {
        let Some(path) = &self.settings.plaintext_path else {
            return Ok(false);
        };
        let copy = PlaintextRecord {
            schema_version: SCHEMA_VERSION,
            entry_id: record.entry_id.clone().unwrap_or_default(),
            timestamp: record.timestamp.clone(),
            text: entry.text().to_string(),
            metadata: entry.metadata().clone(),
            tags: entry.tags().to_vec(),
        };
        Journal::new(path).append(&copy)?;
        debug!(path = %path.display(), "plaintext copy appended");
        Ok(true)
    }

    /// Stage the journal, then optionally commit and push.
    ///
    /// Safe to repeat: when the journal has no staged changes the commit is
    /// skipped and only the push (if requested) runs.
    pub fn record_history(
        &self,
        message: &str,
        commit: bool,
        push: bool,
        remote: &Remote,
    ) -> History {
        let mut history = History::default();
        let data: &Path = &self.settings.data_path;

        if let Err(e) = self.vcs.stage(&[data]) {
            return history.failed(Stage::Stage, e);
        }
        history.staged = true;
        debug!("journal staged");

        if !commit {
            if push {
                warn!("push requested without commit, skipping push");
            }
            return history;
        }

        match self.vcs.has_staged_changes(&[data]) {
            Ok(true) => {
                if let Err(e) = self.vcs.commit(message) {
                    return history.failed(Stage::Commit, e);
                }
                history.committed = true;
                info!("journal committed");
            }
            Ok(false) => {
                history.nothing_to_commit = true;
                debug!("nothing to commit");
            }
            Err(e) => return history.failed(Stage::Commit, e),
        }

        if push {
            if let Err(e) = self.vcs.push(remote) {
                return history.failed(Stage::Push, e);
            }
            history.pushed = true;
            info!("journal pushed");
        }

        history
    }
}
