//! Status command - show quick status overview.

use crate::cli::output;
use crate::core::cipher::{AesGcm, Cipher};
use crate::core::config::Config;
use crate::core::journal::Journal;
use crate::core::pipeline::Pipeline;
use crate::core::vcs::Git;
use crate::error::Result;

/// Show paths, entry count, key source and guard verdict.
pub fn execute() -> Result<()> {
    let dir = std::env::current_dir()?;
    let settings = crate::cli::settings()?;

    let config_label = if Config::exists(&dir) {
        Config::config_path(&dir).display().to_string()
    } else {
        "defaults (no .quill.toml)".to_string()
    };
    output::kv("config", config_label);
    output::kv("repo", settings.repo_root.display());
    output::kv("journal", settings.data_path.display());

    let journal = Journal::new(&settings.data_path);
    match journal.len() {
        Ok(count) => output::kv("entries", count),
        Err(e) => output::kv("entries", format!("unreadable ({})", e)),
    }

    output::kv("cipher", AesGcm.name());
    let keys = settings.key_provider();
    match keys.resolve_with_source() {
        Ok((key, source)) => output::kv("key", format!("{} ({})", source, key.fingerprint())),
        Err(e) => output::kv("key", format!("unavailable ({})", e)),
    }
    output::kv("label", &settings.config.key_label);

    let git = Git::new(&settings.repo_root);
    let git_label = match (settings.config.git.enabled, git.is_repo()) {
        (false, _) => "disabled",
        (true, true) => "enabled",
        (true, false) => "enabled (not a repository)",
    };
    output::kv("git", git_label);

    let pipeline = Pipeline::new(&settings, keys, &AesGcm, &git);
    match pipeline.check_guard() {
        Ok(()) => output::kv("guard", "clear"),
        Err(e) if e.is_blocked() => {
            output::kv("guard", "blocked");
            output::warn(&e.to_string());
        }
        Err(e) => output::kv("guard", format!("unknown ({})", e)),
    }

    Ok(())
}
