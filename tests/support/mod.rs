//! Test support utilities for quill integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;
use std::process::Command as StdCommand;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own journal directory and home directory. Child
/// processes use `.current_dir()`, so tests can run in parallel.
pub struct Test {
    /// Temporary directory holding the journal
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");
        Self { dir, home }
    }

    /// Initialized journal with git history disabled.
    pub fn init() -> Self {
        let t = Self::new();
        std::fs::write(t.dir.path().join(".quill.toml"), NO_GIT_CONFIG)
            .expect("failed to write config");
        t.run_init();
        t
    }

    /// Initialized journal inside a fresh git repository.
    pub fn init_repo() -> Self {
        let t = Self::new();
        t.git_init();
        t.run_init();
        t
    }

    fn run_init(&self) {
        let output = self.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize journal: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// `git init` with a local identity and no signing.
    pub fn git_init(&self) {
        self.git(&["init", "-q"]);
        self.git(&["config", "user.email", "journal@example.com"]);
        self.git(&["config", "user.name", "Journal Test"]);
        self.git(&["config", "commit.gpgsign", "false"]);
    }

    /// Run git in the test directory and return stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .env("HOME", self.home.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.path("journal/entries.jsonl")
    }

    pub fn key_path(&self) -> PathBuf {
        self.path(".quill/key")
    }

    /// Raw journal bytes, or `None` if the journal does not exist.
    pub fn journal_bytes(&self) -> Option<Vec<u8>> {
        std::fs::read(self.journal_path()).ok()
    }

    /// Journal lines parsed as JSON.
    pub fn journal_lines(&self) -> Vec<serde_json::Value> {
        std::fs::read_to_string(self.journal_path())
            .unwrap_or_default()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("journal line is not JSON"))
            .collect()
    }
}
