//! Command-line interface.

pub mod commit;
pub mod completions;
pub mod init;
pub mod output;
pub mod read;
pub mod status;
pub mod sync;
pub mod verify;
pub mod write;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::Settings;
use crate::error::Result;

/// Quill - an encrypted, append-only journal kept in git.
#[derive(Parser)]
#[command(
    name = "quill",
    about = "An encrypted, append-only journal kept in git",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create .quill.toml and a key file in the current directory
    Init,

    /// Encrypt an entry and append it to the journal
    Write(WriteArgs),

    /// Decrypt and print journal entries
    Read {
        /// Only show the last N entries
        #[arg(long, value_name = "N")]
        last: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every record decrypts with the current key
    Verify,

    /// Stage and commit the journal (retries a failed write's history steps)
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
        /// Push after committing
        #[arg(long)]
        push: bool,
    },

    /// Fast-forward the journal from the remote
    Sync {
        /// Branch to pull
        #[arg(long)]
        branch: Option<String>,
    },

    /// Show paths, key source and guard status
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `quill write`.
#[derive(Args, Debug, Default)]
pub struct WriteArgs {
    /// Entry text (reads --from-file, stdin or an editor when omitted)
    pub text: Option<String>,

    /// Read the entry text from a file
    #[arg(long, value_name = "PATH", conflicts_with = "text")]
    pub from_file: Option<PathBuf>,

    /// Metadata as a JSON object, inline or a path to a JSON file
    #[arg(long, value_name = "JSON|PATH")]
    pub metadata: Option<String>,

    /// Key label written into the record
    #[arg(long)]
    pub label: Option<String>,

    /// Tag the entry (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Use this entry id instead of a random one
    #[arg(long)]
    pub entry_id: Option<String>,

    /// Key file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub key_path: Option<PathBuf>,

    /// Environment variable to read the key from
    #[arg(long, value_name = "NAME")]
    pub key_env_var: Option<String>,

    /// Encrypt and print the record without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Stage the journal but do not commit
    #[arg(long)]
    pub no_commit: bool,

    /// Push after committing
    #[arg(long, conflicts_with = "no_commit")]
    pub push: bool,

    /// Remote to push to
    #[arg(long)]
    pub remote: Option<String>,

    /// Branch to push
    #[arg(long)]
    pub branch: Option<String>,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a parsed command.
pub fn execute(command: Command) -> Result<()> {
    use Command::*;

    match command {
        Init => init::execute(),
        Write(args) => write::execute(args),
        Read { last, json } => read::execute(last, json),
        Verify => verify::execute(),
        Commit { message, push } => commit::execute(message, push),
        Sync { branch } => sync::execute(branch),
        Status => status::execute(),
        Completions { shell } => completions::execute(shell),
    }
}

/// Load settings from the current directory.
pub(crate) fn settings() -> Result<Settings> {
    let dir = std::env::current_dir()?;
    Settings::load(&dir)
}
