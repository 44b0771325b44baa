//! Integration tests for config loading and the config subcommands.

use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixtures_dir, logsift};

fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
fn config_show_prints_defaults() {
    logsift()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[filter]"))
        .stdout(predicate::str::contains("response_truncation = true"))
        .stdout(predicate::str::contains("similarity_threshold = 0.85"));
}

#[test]
fn config_show_reads_explicit_file() {
    let (_dir, path) = write_config("[grouping]\nsimilarity_threshold = 0.5\n");

    logsift()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("similarity_threshold = 0.5"));
}

#[test]
fn config_path_uses_config_dir() {
    let temp_dir = TempDir::new().unwrap();

    let assert = logsift()
        .env("XDG_CONFIG_HOME", temp_dir.path())
        .args(["config", "path"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.trim_end().ends_with("config.toml"));
    assert!(stdout.contains("logsift"));
}

#[test]
fn missing_explicit_config_fails() {
    logsift()
        .args(["config", "show", "--config"])
        .arg(fixtures_dir().join("does-not-exist.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn invalid_threshold_in_config_fails() {
    let (_dir, path) = write_config("[grouping]\nsimilarity_threshold = 3.0\n");

    logsift()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("similarity_threshold must be between"));
}

#[test]
fn config_file_toggles_apply_to_filter() {
    let (_dir, path) = write_config("[filter]\nhttp_grouping = false\n");

    logsift()
        .args(["filter", "--config"])
        .arg(&path)
        .arg(fixtures_dir().join("session.log"))
        .assert()
        .success()
        .stdout(predicate::str::contains("REPEATED").not());
}

#[test]
fn cli_flag_overrides_config_file() {
    let (_dir, path) = write_config("[filter]\nsession_compression = true\n");

    logsift()
        .args(["filter", "--no-session-compression", "--config"])
        .arg(&path)
        .arg(fixtures_dir().join("session.log"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[SUMMARY]").not());
}
