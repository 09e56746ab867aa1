//! Tests for `quill read`.

use crate::support::*;
use serde_json::json;

#[test]
fn test_read_in_write_order() {
    let t = Test::init();
    for text in ["one", "two", "three"] {
        assert_success(&t.write(text));
    }

    let texts: Vec<_> = t.read_json().iter().map(|e| e["text"].clone()).collect();
    assert_eq!(texts, vec![json!("one"), json!("two"), json!("three")]);
}

#[test]
fn test_read_last() {
    let t = Test::init();
    for text in ["one", "two", "three"] {
        assert_success(&t.write(text));
    }

    let output = t
        .cmd()
        .args(["read", "--last", "2", "--json"])
        .output()
        .unwrap();
    assert_success(&output);
    let entries: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["text"], json!("two"));
}

#[test]
fn test_read_plain_output() {
    let t = Test::init();
    assert_success(&t.write_with("walked by the river", &["--tag", "outside"]));

    let output = t.cmd().arg("read").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "walked by the river");
    assert_stdout_contains(&output, "#outside");
}

#[test]
fn test_read_empty_journal() {
    let t = Test::init();

    let output = t.cmd().arg("read").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "no entries");
}

#[test]
fn test_read_skips_torn_tail() {
    let t = Test::init();
    assert_success(&t.write("complete"));

    let mut bytes = t.journal_bytes().unwrap();
    bytes.extend_from_slice(br#"{"schema_version":1,"times"#);
    std::fs::write(t.journal_path(), &bytes).unwrap();

    assert_eq!(t.read_json().len(), 1);

    assert_success(&t.write("after crash"));
    let texts: Vec<_> = t.read_json().iter().map(|e| e["text"].clone()).collect();
    assert_eq!(texts, vec![json!("complete"), json!("after crash")]);
}

#[test]
fn test_read_without_key_fails() {
    let t = Test::init();
    assert_success(&t.write("entry"));
    std::fs::remove_file(t.key_path()).unwrap();

    let output = t.cmd().arg("read").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "no encryption key found");
    assert_stderr_contains(&output, "quill init");
}
