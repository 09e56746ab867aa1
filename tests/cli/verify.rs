//! Tests for `quill verify`.

use crate::support::*;

#[test]
fn test_verify_clean_journal() {
    let t = Test::init();
    assert_success(&t.write("one"));
    assert_success(&t.write("two"));

    let output = t.verify();
    assert_success(&output);
    assert_stdout_contains(&output, "2 records verified");
}

#[test]
fn test_verify_detects_tampering() {
    let t = Test::init();
    assert_success(&t.write("one"));
    assert_success(&t.write("two"));

    let mut lines = t.journal_lines();
    let ciphertext = lines[1]["ciphertext"].as_str().unwrap().to_string();
    let first = if ciphertext.starts_with('A') { "B" } else { "A" };
    lines[1]["ciphertext"] = serde_json::Value::String(format!("{}{}", first, &ciphertext[1..]));

    let rewritten: String = lines.iter().map(|l| format!("{}\n", l)).collect();
    std::fs::write(t.journal_path(), rewritten).unwrap();

    let output = t.verify();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "record 2");
    assert_stderr_contains(&output, "authentication failed");
}

#[test]
fn test_verify_wrong_key() {
    let t = Test::init();
    assert_success(&t.write("entry"));

    let output = t
        .cmd()
        .env("QUILL_KEY", TEST_KEY_B64)
        .arg("verify")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "authentication failed");
}
