//! Tests for the safety guard through the CLI.

use crate::support::*;
use std::fs;

#[test]
fn test_tracked_key_blocks_write() {
    crate::skip_without_git!();
    let t = Test::init_repo();
    assert_success(&t.write("before"));
    t.git(&["add", "-f", ".quill/key"]);
    let before = t.journal_bytes().unwrap();

    let output = t.write("after");
    assert_exit_code(&output, EXIT_BLOCKED);
    assert_stderr_contains(&output, "guard check failed");
    assert_stderr_contains(&output, "git rm --cached");

    assert_eq!(t.journal_bytes().unwrap(), before);
}

#[test]
fn test_tracked_key_blocks_dry_run() {
    crate::skip_without_git!();
    let t = Test::init_repo();
    t.git(&["add", "-f", ".quill/key"]);

    let output = t.write_with("entry", &["--dry-run"]);
    assert_exit_code(&output, EXIT_BLOCKED);
    assert!(t.journal_bytes().is_none());
}

#[test]
fn test_tracked_protected_path_blocks_write() {
    crate::skip_without_git!();
    let t = Test::new();
    t.git_init();
    fs::write(t.path(".quill.toml"), "protected_paths = [\".env\"]\n").unwrap();
    assert_success(&t.init_cmd());
    fs::write(t.path(".env"), "TOKEN=abc").unwrap();
    t.git(&["add", "-f", ".env"]);

    let output = t.write("entry");
    assert_exit_code(&output, EXIT_BLOCKED);
    assert_stderr_contains(&output, ".env");
    assert!(t.journal_bytes().is_none());
}

#[test]
fn test_tracked_key_above_repo_root_blocks_write() {
    crate::skip_without_git!();
    let t = Test::new();
    t.git_init();
    fs::create_dir_all(t.path("journal_dir")).unwrap();
    fs::write(
        t.path(".quill.toml"),
        "repo_root = \"journal_dir\"\nkey_path = \"../secret.key\"\n",
    )
    .unwrap();
    assert_success(&t.init_cmd());
    assert!(t.path("secret.key").exists());
    t.git(&["add", "-f", "secret.key"]);

    let output = t.write("entry");
    assert_exit_code(&output, EXIT_BLOCKED);
    assert_stderr_contains(&output, "secret.key");
    assert!(!t.path("journal_dir/journal/entries.jsonl").exists());
    assert!(t.git(&["rev-list", "--all"]).trim().is_empty());
}

#[test]
fn test_untracked_key_passes() {
    crate::skip_without_git!();
    let t = Test::init_repo();

    let output = t.write("entry");
    assert_success(&output);
    assert!(!t.git(&["ls-files"]).contains(".quill/key"));
}

#[test]
fn test_commit_command_respects_guard() {
    crate::skip_without_git!();
    let t = Test::init_repo();
    assert_success(&t.write_with("entry", &["--no-commit"]));
    t.git(&["add", "-f", ".quill/key"]);

    let output = t.cmd().arg("commit").output().unwrap();
    assert_exit_code(&output, EXIT_BLOCKED);
}
