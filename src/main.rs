//! Quill - an encrypted, append-only journal kept in git.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quill::cli::output;
use quill::cli::{execute, Cli};
use quill::core::constants::ENV_LOG;
use quill::error::{Error, KeyError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("quill=debug")
        } else {
            EnvFilter::new("quill=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            _ if e.is_blocked() => Some("untrack the file with git rm --cached, then retry"),
            Error::Aborted { stage, .. } if stage.is_history() => {
                Some("the entry is saved; retry with: quill commit")
            }
            _ if matches!(e.root(), Error::Key(KeyError::NotFound { .. })) => {
                Some("run: quill init")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(e.exit_code());
    }
}
