//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables that would leak host configuration into a test run.
const SCRUBBED_ENV: &[&str] = &[
    "QUILL_KEY",
    "QUILL_LOG",
    "QUILL_GIT_REMOTE",
    "QUILL_GIT_BRANCH",
    "QUILL_SYNC_BRANCH",
    "GIT_DIR",
    "GIT_WORK_TREE",
];

impl Test {
    /// Create a quill command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test journal directory
    /// - host quill and git variables removed
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("quill").expect("failed to find quill binary");
        for var in SCRUBBED_ENV {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `quill init`.
    pub fn init_cmd(&self) -> Output {
        self.cmd()
            .arg("init")
            .output()
            .expect("failed to run quill init")
    }

    /// Shortcut for `quill write <text>`.
    pub fn write(&self, text: &str) -> Output {
        self.write_with(text, &[])
    }

    /// `quill write <text>` with extra arguments.
    pub fn write_with(&self, text: &str, args: &[&str]) -> Output {
        self.cmd()
            .arg("write")
            .arg(text)
            .args(args)
            .output()
            .expect("failed to run quill write")
    }

    /// Shortcut for `quill read --json`, parsed.
    pub fn read_json(&self) -> Vec<serde_json::Value> {
        let output = self
            .cmd()
            .args(["read", "--json"])
            .output()
            .expect("failed to run quill read");
        assert!(
            output.status.success(),
            "quill read failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("read --json is not JSON")
    }

    /// Shortcut for `quill verify`.
    pub fn verify(&self) -> Output {
        self.cmd()
            .arg("verify")
            .output()
            .expect("failed to run quill verify")
    }

    /// Shortcut for `quill status`.
    pub fn status(&self) -> Output {
        self.cmd()
            .arg("status")
            .output()
            .expect("failed to run quill status")
    }
}
