//! Error handling and exit codes.

use crate::support::*;
use std::fs;

#[test]
fn test_missing_key_aborts_without_write() {
    let t = Test::new();
    fs::write(t.path(".quill.toml"), NO_GIT_CONFIG).unwrap();

    let output = t.write("entry");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "key resolution failed");
    assert_stderr_contains(&output, "$QUILL_KEY");
    assert!(t.journal_bytes().is_none());
}

#[test]
fn test_malformed_env_key_does_not_fall_back() {
    let t = Test::init();

    let output = t
        .cmd()
        .env("QUILL_KEY", "not base64!")
        .args(["write", "entry"])
        .output()
        .unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "malformed key");
    assert!(t.journal_bytes().is_none());
}

#[test]
fn test_short_key_rejected() {
    let t = Test::init();
    fs::write(t.key_path(), "AAECAwQFBgcICQoLDA0ODw==\n").unwrap();

    let output = t.write("entry");
    assert_failure(&output);
    assert_stderr_contains(&output, "malformed key");
}

#[test]
fn test_invalid_config() {
    let t = Test::new();
    fs::write(t.path(".quill.toml"), "data_path = [").unwrap();

    let output = t.write("entry");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, ".quill.toml");
}

#[test]
fn test_usage_error_exit_code() {
    let t = Test::new();

    let output = t.cmd().args(["write", "--bogus"]).output().unwrap();
    assert_exit_code(&output, 2);
}

#[test]
fn test_errors_never_print_key() {
    let t = Test::init();
    let key = fs::read_to_string(t.key_path()).unwrap();

    let output = t
        .cmd()
        .env("QUILL_LOG", "trace")
        .args(["write", "secret words"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_excludes(&output, key.trim());
    assert!(!stderr(&output).contains(key.trim()));
    assert!(!stderr(&output).contains("secret words"));
}
