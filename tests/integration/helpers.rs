//! Shared helpers for integration tests.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Directory holding the log fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Contents of a fixture file.
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

/// Copy a fixture into a fresh temp directory.
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, load_fixture(name)).unwrap();
    (temp_dir, path)
}

/// The binary, isolated from any user config file.
pub fn logsift() -> Command {
    let mut cmd = Command::cargo_bin("logsift").unwrap();
    cmd.env("XDG_CONFIG_HOME", fixtures_dir().join("no-config"))
        .env_remove("LOGSIFT_LOG");
    cmd
}
