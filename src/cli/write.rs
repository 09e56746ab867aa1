//! Write command.
//!
//! Gathers the entry text and metadata, then runs the encrypt-and-commit
//! pipeline.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use dialoguer::Editor;
use tracing::{debug, info};

use crate::cli::{output, WriteArgs};
use crate::core::cipher::AesGcm;
use crate::core::config::resolve_path;
use crate::core::domain::{parse_metadata, Entry, Metadata};
use crate::core::pipeline::{Outcome, Pipeline, WriteOptions};
use crate::core::vcs::Git;
use crate::error::{EntryError, Error, Result};

/// Encrypt an entry and append it to the journal.
pub fn execute(args: WriteArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let mut settings = crate::cli::settings()?;

    if let Some(path) = &args.key_path {
        settings.key_path = resolve_path(&cwd, path);
    }
    if let Some(name) = &args.key_env_var {
        settings.config.key_env_var = Some(name.clone());
    }
    if let Some(label) = &args.label {
        settings.config.key_label = label.clone();
    }

    let text = read_text(&args)?;
    let mut metadata = settings.config.default_metadata.clone();
    if let Some(raw) = &args.metadata {
        metadata.extend(load_metadata(raw)?);
    }
    let entry = Entry::new(text)?
        .with_metadata(metadata)
        .with_tags(args.tags.iter().cloned());

    let mut remote = settings.push_remote();
    if args.remote.is_some() {
        remote.name = args.remote.clone();
    }
    if args.branch.is_some() {
        remote.branch = args.branch.clone();
    }

    let opts = WriteOptions {
        dry_run: args.dry_run,
        no_commit: args.no_commit,
        push: args.push,
        message: args.message.clone(),
        remote: Some(remote),
        entry_id: args.entry_id.clone(),
    };

    let git = Git::new(&settings.repo_root);
    let pipeline = Pipeline::new(&settings, settings.key_provider(), &AesGcm, &git);
    let outcome = pipeline.write(entry, &opts)?;

    report(&settings.data_path, outcome)
}

fn report(data_path: &Path, outcome: Outcome) -> Result<()> {
    let id = outcome.record.entry_id.clone().unwrap_or_default();

    if outcome.dry_run {
        output::dimmed("dry run: nothing written");
        println!("{}", outcome.record.to_line()?);
        return Ok(());
    }

    output::success(&format!(
        "appended entry {} to {}",
        id,
        output::path(data_path.display())
    ));
    for warning in &outcome.warnings {
        output::warn(&warning.to_string());
    }
    if outcome.local_copy {
        debug!("plaintext copy updated");
    }

    let history = outcome.history;
    if history.committed {
        output::success("committed");
    } else if history.nothing_to_commit {
        output::dimmed("nothing to commit");
    } else if history.staged {
        output::dimmed("staged, not committed");
    }
    if history.pushed {
        output::success("pushed");
    }

    match history.failure {
        Some(failure) => {
            info!(stage = %failure.stage, "entry stored, history incomplete");
            Err(Error::at(failure.stage, failure.error))
        }
        None => Ok(()),
    }
}

/// Entry text from the argument, a file, piped stdin, or an editor.
fn read_text(args: &WriteArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    if let Some(path) = &args.from_file {
        debug!(path = %path.display(), "reading entry from file");
        return std::fs::read_to_string(path).map_err(|source| {
            EntryError::Read {
                path: path.clone(),
                source,
            }
            .into()
        });
    }

    if !io::stdin().is_terminal() {
        debug!("reading entry from stdin");
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let text = Editor::new().extension(".md").edit("")?;
    text.ok_or_else(|| EntryError::Empty.into())
}

/// Parse `--metadata`: an inline JSON object or a path to one.
fn load_metadata(raw: &str) -> Result<Metadata> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        return parse_metadata(trimmed);
    }

    let path = Path::new(raw);
    if path.is_file() {
        let contents = std::fs::read_to_string(path).map_err(|source| EntryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        return parse_metadata(&contents);
    }

    Err(EntryError::InvalidMetadata(format!(
        "expected a JSON object or a path to one, got {:?}",
        raw
    ))
    .into())
}
