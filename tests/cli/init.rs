//! Tests for `quill init`.

use crate::support::*;
use std::fs;

#[test]
fn test_init_creates_config_and_key() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "created .quill.toml");

    assert!(t.path(".quill.toml").exists());
    let key = fs::read_to_string(t.key_path()).unwrap();
    assert_eq!(key.trim().len(), 44, "key file holds base64 of 32 bytes");

    let gitignore = fs::read_to_string(t.path(".gitignore")).unwrap();
    assert!(gitignore.lines().any(|l| l == "/.quill/key"));
}

#[cfg(unix)]
#[test]
fn test_init_key_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    assert_success(&t.init_cmd());

    let mode = fs::metadata(t.key_path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_init_twice_keeps_key() {
    let t = Test::init();
    let before = fs::read(t.key_path()).unwrap();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "already exists");

    assert_eq!(fs::read(t.key_path()).unwrap(), before);
    let gitignore = fs::read_to_string(t.path(".gitignore")).unwrap();
    assert_eq!(gitignore.matches("/.quill/key").count(), 1);
}

#[test]
fn test_init_ignores_plaintext_copy() {
    let t = Test::new();
    fs::write(
        t.path(".quill.toml"),
        "plaintext_path = \"private/plain.jsonl\"\n[git]\nenabled = false\n",
    )
    .unwrap();

    assert_success(&t.init_cmd());
    let gitignore = fs::read_to_string(t.path(".gitignore")).unwrap();
    assert!(gitignore.contains("/private/plain.jsonl"));
}
