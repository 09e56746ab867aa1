//! Init command - set up a journal in the current directory.

use tracing::info;

use crate::cli::output;
use crate::core::config::{self, Config, Settings};
use crate::core::constants::CONFIG_FILE;
use crate::core::key::create_key_file;
use crate::error::Result;

/// Write `.quill.toml` and a key file if absent, and keep secrets out of git.
pub fn execute() -> Result<()> {
    let dir = std::env::current_dir()?;

    if Config::exists(&dir) {
        output::dimmed(&format!("{} already exists", CONFIG_FILE));
    } else {
        Config::default().save(&dir)?;
        output::success(&format!("created {}", CONFIG_FILE));
    }

    let settings = Settings::load(&dir)?;

    if settings.key_path.exists() {
        output::dimmed(&format!(
            "key file {} already exists",
            settings.key_path.display()
        ));
    } else {
        let key = create_key_file(&settings.key_path)?;
        info!(fingerprint = %key.fingerprint(), "key created");
        output::success(&format!(
            "created key {} ({})",
            output::path(settings.key_path.display()),
            key.fingerprint()
        ));
        output::warn("back up this key; entries cannot be recovered without it");
    }

    let protected = settings.protected();
    let ignored: Vec<_> = protected.iter().map(|p| p.path.as_path()).collect();
    for entry in config::ensure_gitignore(&settings.repo_root, &ignored)? {
        output::success(&format!("added {} to .gitignore", entry));
    }

    println!();
    println!("Next: {} to add an entry", output::cmd("quill write \"...\""));
    Ok(())
}
