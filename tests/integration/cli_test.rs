//! Integration tests for the filter command (CLI)

use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixtures_dir, load_fixture, logsift, temp_fixture};

const SMALL_LOG: &str = "\
2024-01-15 10:23:45:000 - [debug] [XCUITest] Polling device state
2024-01-15 10:23:45:100 - [debug] [XCUITest] Polling device state
2024-01-15 10:23:45:200 - [debug] [XCUITest] Polling device state
2024-01-15 10:23:46:789 - [Error] NoSuchElementException: Unable to find element
";

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn filter_help_lists_toggles() {
    logsift()
        .args(["filter", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-truncation"))
        .stdout(predicate::str::contains("--no-grouping"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("[FILE]"));
}

#[test]
fn completions_are_generated() {
    logsift()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("logsift"));
}

// ============================================================================
// Filtering Tests
// ============================================================================

#[test]
fn filters_stdin() {
    let assert = logsift()
        .arg("filter")
        .write_stdin(SMALL_LOG)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    insta::assert_snapshot!(stdout.trim_end(), @r"
    2024-01-15 10:23:45:000 → 10:23:45:200 [debug] [REPEATED 3x] TIMESTAMP - [debug] [XCUITest] Polling device state
    2024-01-15 10:23:46:789 - [Error] NoSuchElementException: Unable to find element
    ");
}

#[test]
fn dash_reads_stdin() {
    logsift()
        .args(["filter", "-"])
        .write_stdin(SMALL_LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("[REPEATED 3x]"));
}

#[test]
fn filters_file_argument() {
    let (_dir, path) = temp_fixture("session.log");

    logsift()
        .arg("filter")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("NoSuchElementError"))
        .stdout(predicate::str::contains("[REPEATED 8x]"))
        .stdout(predicate::str::contains("Executing command").not());
}

#[test]
fn crlf_input_is_accepted() {
    let crlf = SMALL_LOG.replace('\n', "\r\n");

    logsift()
        .arg("filter")
        .write_stdin(crlf)
        .assert()
        .success()
        .stdout(predicate::str::contains("\r").not())
        .stdout(predicate::str::contains("[REPEATED 3x]"));
}

#[test]
fn nothing_meaningful_exits_1() {
    logsift()
        .arg("filter")
        .arg(fixtures_dir().join("routine.log"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "No meaningful logs found after filtering.",
        ));
}

#[test]
fn empty_stdin_is_nothing_meaningful() {
    logsift()
        .arg("filter")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No meaningful logs found"));
}

#[test]
fn missing_file_fails_with_path() {
    logsift()
        .args(["filter", "nonexistent.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"))
        .stderr(predicate::str::contains("nonexistent.log"));
}

#[test]
fn out_of_range_threshold_is_a_usage_error() {
    logsift()
        .args(["filter", "--threshold", "1.5"])
        .write_stdin(SMALL_LOG)
        .assert()
        .code(2);
}

#[test]
fn no_grouping_flag_prints_every_line() {
    logsift()
        .args(["filter", "--no-grouping"])
        .write_stdin(SMALL_LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("REPEATED").not())
        .stdout(predicate::str::contains("Polling device state").count(3));
}

#[test]
fn threshold_flag_changes_grouping() {
    let log = "\
2024-01-15 10:23:46:000 - [debug] [XCUITest] one two three alpha
2024-01-15 10:23:46:000 - [debug] [XCUITest] one two three beta
";

    logsift()
        .arg("filter")
        .write_stdin(log)
        .assert()
        .success()
        .stdout(predicate::str::contains("REPEATED").not());

    logsift()
        .args(["filter", "--threshold", "0.5"])
        .write_stdin(log)
        .assert()
        .success()
        .stdout(predicate::str::contains("[REPEATED 2x]"));
}

// ============================================================================
// Export Tests
// ============================================================================

#[test]
fn output_flag_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("digest.txt");

    logsift()
        .args(["filter", "-o"])
        .arg(&out)
        .write_stdin(SMALL_LOG)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Saved filtered logs to"));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("2024-01-15 10:23:45:000 → 10:23:45:200"));
    assert!(written.ends_with("Unable to find element"));
}

#[test]
fn save_uses_filtered_prefix() {
    let (dir, path) = temp_fixture("session.log");

    logsift()
        .current_dir(dir.path())
        .args(["filter", "--save"])
        .arg(&path)
        .assert()
        .success();

    let saved = dir.path().join("filtered_session.log");
    assert!(saved.exists());
    assert!(std::fs::read_to_string(saved).unwrap().contains("NoSuchElementError"));
}

#[test]
fn save_from_stdin_uses_default_name() {
    let temp_dir = TempDir::new().unwrap();

    logsift()
        .current_dir(temp_dir.path())
        .args(["filter", "--save"])
        .write_stdin(SMALL_LOG)
        .assert()
        .success();

    assert!(temp_dir.path().join("filtered_logs.txt").exists());
}

#[test]
fn copy_succeeds_or_fails_gracefully() {
    let output = logsift()
        .args(["filter", "--copy"])
        .write_stdin(SMALL_LOG)
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("[REPEATED 3x]"));
    if output.status.success() {
        assert!(stderr.contains("to clipboard"), "stderr: {stderr}");
    } else {
        assert!(
            stderr.contains("clipboard") || stderr.contains("Clipboard"),
            "stderr: {stderr}"
        );
    }
}

// ============================================================================
// Stats Tests
// ============================================================================

#[test]
fn stats_are_printed_to_stderr() {
    logsift()
        .args(["filter", "--stats"])
        .write_stdin(SMALL_LOG)
        .assert()
        .success()
        .stderr(predicate::str::contains("Original lines:  5"))
        .stderr(predicate::str::contains("Filtered lines:  2"))
        .stderr(predicate::str::contains("Reduction:       60.0%"))
        .stderr(predicate::str::contains("Input size:"));
}

#[test]
fn stats_json_is_machine_readable() {
    let content = load_fixture("session.log");

    let output = logsift()
        .args(["filter", "--stats-json"])
        .write_stdin(content.clone())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stats["original_lines"], content.split('\n').count());
    assert_eq!(stats["filtered_lines"], stdout.lines().count());
    assert_eq!(stats["input_bytes"], content.len());
    assert!(stats["output_bytes"].as_u64().unwrap() < content.len() as u64);
}

#[test]
fn stats_are_printed_even_when_nothing_survives() {
    logsift()
        .args(["filter", "--stats"])
        .arg(fixtures_dir().join("routine.log"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Filtered lines:  0"))
        .stderr(predicate::str::contains("Reduction:       100.0%"));
}
