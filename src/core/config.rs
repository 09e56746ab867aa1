//! Configuration file management.
//!
//! Handles reading, writing, and validating `.quill.toml`. Every field is
//! optional; a missing file means defaults.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::domain::Metadata;
use crate::core::guard::{ProtectedPath, Protection};
use crate::core::key::KeyProvider;
use crate::core::vcs::Remote;
use crate::error::{ConfigError, Result};

/// Project configuration stored in `.quill.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository root, relative to the config file's directory.
    pub repo_root: PathBuf,
    /// Encrypted journal.
    pub data_path: PathBuf,
    /// Key file.
    pub key_path: PathBuf,
    /// Environment variable checked for a base64 key before the key file.
    pub key_env_var: Option<String>,
    /// Label written into every record.
    pub key_label: String,
    /// Optional local plaintext journal, never committed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plaintext_path: Option<PathBuf>,
    /// Extra secret paths the guard keeps out of version control.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protected_paths: Vec<PathBuf>,
    /// Metadata merged into every entry before user-supplied metadata.
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub default_metadata: Metadata,
    /// Version-control settings.
    pub git: GitConfig,
}

/// `[git]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Stage and commit after each append.
    pub enabled: bool,
    /// Remote to push to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Branch to push.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Branch `quill sync` pulls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_branch: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: None,
            branch: None,
            sync_branch: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            data_path: PathBuf::from(constants::DEFAULT_DATA_PATH),
            key_path: PathBuf::from(constants::DEFAULT_KEY_PATH),
            key_env_var: Some(constants::DEFAULT_KEY_ENV_VAR.to_string()),
            key_label: constants::DEFAULT_KEY_LABEL.to_string(),
            plaintext_path: None,
            protected_paths: Vec::new(),
            default_metadata: Metadata::new(),
            git: GitConfig::default(),
        }
    }
}

/// A loaded config with every path resolved against the repo root.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub repo_root: PathBuf,
    pub data_path: PathBuf,
    pub key_path: PathBuf,
    pub plaintext_path: Option<PathBuf>,
    pub protected_paths: Vec<PathBuf>,
}

impl Config {
    /// Path to the configuration file in `dir`.
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(constants::CONFIG_FILE)
    }

    /// Check if a configuration file exists in `dir`.
    pub fn exists(dir: &Path) -> bool {
        Self::config_path(dir).exists()
    }

    /// Load `.quill.toml` from `dir`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` or `ConfigError::Parse` on unreadable or
    /// malformed files, and `ConfigError::InvalidValue` if validation fails.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::config_path(dir);
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(ConfigError::Read)?;
        let config = Self::parse(&contents)?;
        debug!(data_path = %config.data_path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Write `.quill.toml` into `dir`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the file write fails.
    pub fn save(&self, dir: &Path) -> Result<()> {
        debug!("saving config");
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(Self::config_path(dir), contents)?;
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on empty paths or an empty label.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("data_path", &self.data_path),
            ("key_path", &self.key_path),
            ("repo_root", &self.repo_root),
        ];
        for (field, path) in required {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
        }

        if self.key_label.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "key_label",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.data_path == self.key_path {
            return Err(ConfigError::InvalidValue {
                field: "data_path",
                reason: "journal and key file must differ".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Resolve every path against `dir` (the config file's directory).
    pub fn resolve(self, dir: &Path) -> Settings {
        let repo_root = resolve_path(dir, &self.repo_root);
        let data_path = resolve_path(&repo_root, &self.data_path);
        let key_path = resolve_path(&repo_root, &self.key_path);
        let plaintext_path = self
            .plaintext_path
            .as_deref()
            .map(|p| resolve_path(&repo_root, p));
        let protected_paths = self
            .protected_paths
            .iter()
            .map(|p| resolve_path(&repo_root, p))
            .collect();

        Settings {
            config: self,
            repo_root,
            data_path,
            key_path,
            plaintext_path,
            protected_paths,
        }
    }
}

impl Settings {
    /// Load and resolve the config in `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Config::load(dir)?.resolve(dir))
    }

    /// Paths the guard keeps out of version control.
    pub fn protected(&self) -> Vec<ProtectedPath> {
        let mut protected = vec![ProtectedPath::new(&self.key_path, Protection::KeyFile)];
        if let Some(plain) = &self.plaintext_path {
            protected.push(ProtectedPath::new(plain, Protection::PlaintextCopy));
        }
        protected.extend(
            self.protected_paths
                .iter()
                .map(|p| ProtectedPath::new(p, Protection::Configured)),
        );
        protected
    }

    /// Key provider in the configured order: env var, then key file.
    pub fn key_provider(&self) -> KeyProvider {
        KeyProvider::env_then_file(self.config.key_env_var.as_deref(), self.key_path.clone())
    }

    /// Push target: environment overrides config.
    pub fn push_remote(&self) -> Remote {
        Remote {
            name: env_or(constants::ENV_GIT_REMOTE, &self.config.git.remote),
            branch: env_or(constants::ENV_GIT_BRANCH, &self.config.git.branch),
        }
    }

    /// Pull target for `quill sync`.
    pub fn sync_remote(&self) -> Remote {
        Remote {
            name: env_or(constants::ENV_GIT_REMOTE, &self.config.git.remote),
            branch: env_or(constants::ENV_SYNC_BRANCH, &self.config.git.sync_branch),
        }
    }
}

fn env_or(var: &str, fallback: &Option<String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.clone())
}

/// Resolve `path` against `base`, expanding a leading `~/`.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path == Path::new(".") {
        return base.to_path_buf();
    }
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Ensure `.gitignore` in `repo_root` lists each of `paths`.
///
/// Paths outside the repo root are skipped. Returns the entries added.
///
/// # Errors
///
/// Returns error if file operations fail.
pub fn ensure_gitignore(repo_root: &Path, paths: &[&Path]) -> Result<Vec<String>> {
    let gitignore = repo_root.join(".gitignore");

    let existing = if gitignore.exists() {
        std::fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };

    let mut updated = existing.clone();
    let mut added = Vec::new();
    for path in paths {
        let Ok(rel) = path.strip_prefix(repo_root) else {
            continue;
        };
        if rel.components().any(|c| c == Component::ParentDir) {
            continue;
        }
        let entry = format!("/{}", rel.to_string_lossy().replace('\\', "/"));
        let present = existing
            .lines()
            .any(|l| l.trim() == entry || l.trim() == entry.trim_start_matches('/'));
        if !present && !added.contains(&entry) {
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(&entry);
            updated.push('\n');
            added.push(entry);
        }
    }

    if updated != existing {
        std::fs::write(&gitignore, updated)?;
    }

    Ok(added)
}
