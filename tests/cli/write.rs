//! Tests for `quill write`.

use crate::support::*;
use serde_json::json;
use std::fs;

#[test]
fn test_write_hello_world_scenario() {
    let t = Test::init();

    let output = t.write_with(
        "hello world",
        &["--metadata", r#"{"mood":"calm"}"#, "--tag", "foco"],
    );
    assert_success(&output);
    assert_stdout_contains(&output, "appended entry");

    let lines = t.journal_lines();
    assert_eq!(lines.len(), 1);
    let record = &lines[0];
    assert_eq!(record["schema_version"], json!(1));
    assert_eq!(record["metadata"], json!({"mood": "calm"}));
    assert_eq!(record["tags"], json!(["foco"]));
    assert_eq!(record["key_label"], json!("primary"));
    assert!(record["timestamp"].as_str().unwrap().ends_with('Z'));

    let raw = fs::read_to_string(t.journal_path()).unwrap();
    assert!(!raw.contains("hello world"), "plaintext leaked into the journal");

    let entries = t.read_json();
    assert_eq!(entries[0]["text"], json!("hello world"));
}

#[test]
fn test_write_is_append_only() {
    let t = Test::init();
    assert_success(&t.write("first"));
    let before = t.journal_bytes().unwrap();

    assert_success(&t.write("second"));
    let after = t.journal_bytes().unwrap();

    assert!(after.starts_with(&before), "existing bytes were modified");
    assert_eq!(t.journal_lines().len(), 2);
}

#[test]
fn test_write_from_stdin() {
    let t = Test::init();

    let output = t
        .cmd()
        .arg("write")
        .write_stdin("piped entry\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.read_json()[0]["text"], json!("piped entry"));
}

#[test]
fn test_write_from_file() {
    let t = Test::init();
    fs::write(t.path("draft.txt"), "drafted earlier").unwrap();

    let output = t
        .cmd()
        .args(["write", "--from-file", "draft.txt"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.read_json()[0]["text"], json!("drafted earlier"));
}

#[test]
fn test_write_rejects_empty_text() {
    let t = Test::init();

    let output = t.write("   ");
    assert_failure(&output);
    assert_stderr_contains(&output, "no entry text");
    assert!(t.journal_bytes().is_none());
}

#[test]
fn test_write_rejects_non_object_metadata() {
    let t = Test::init();

    let output = t.write_with("entry", &["--metadata", "[1,2]"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid metadata");
    assert!(t.journal_bytes().is_none());
}

#[test]
fn test_dry_run_writes_nothing() {
    let t = Test::init();
    assert_success(&t.write("kept"));
    let before = t.journal_bytes().unwrap();
    let mtime = fs::metadata(t.journal_path()).unwrap().modified().unwrap();

    let output = t.write_with("not kept", &["--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "\"ciphertext\"");
    assert_stdout_excludes(&output, "not kept");

    assert_eq!(t.journal_bytes().unwrap(), before);
    assert_eq!(
        fs::metadata(t.journal_path()).unwrap().modified().unwrap(),
        mtime
    );
}

#[test]
fn test_write_with_env_key_and_label() {
    let t = Test::new();
    fs::write(t.path(".quill.toml"), NO_GIT_CONFIG).unwrap();

    let output = t
        .cmd()
        .env("QUILL_KEY", TEST_KEY_B64)
        .args(["write", "from env", "--label", "travel", "--entry-id", "e-1"])
        .output()
        .unwrap();
    assert_success(&output);

    let record = &t.journal_lines()[0];
    assert_eq!(record["key_label"], json!("travel"));
    assert_eq!(record["entry_id"], json!("e-1"));
    assert!(!t.key_path().exists());
}

#[test]
fn test_default_metadata_merged() {
    let t = Test::new();
    fs::write(
        t.path(".quill.toml"),
        "[default_metadata]\nsource = \"cli\"\nmood = \"neutral\"\n\n[git]\nenabled = false\n",
    )
    .unwrap();
    assert_success(&t.init_cmd());

    assert_success(&t.write_with("entry", &["--metadata", r#"{"mood":"calm"}"#]));
    let record = &t.journal_lines()[0];
    assert_eq!(record["metadata"], json!({"source": "cli", "mood": "calm"}));
}
