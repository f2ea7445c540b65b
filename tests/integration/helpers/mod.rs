//! Helpers for running the gridperf binary

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

pub const REPORT_A: &str = "tests/fixtures/4134826_RNIV_BASEPV_performance.html";
pub const REPORT_B: &str = "tests/fixtures/4135001_RNIV_BASEPV_performance.html";
pub const REPORT_C: &str = "tests/fixtures/4140000_NO_TG_performance.html";
pub const REPORT_LIST: &str = "tests/fixtures/reports.txt";

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// gridperf command run from the crate root with an empty home directory,
/// so no user config is picked up, and without colors or log filters.
pub fn gridperf(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gridperf"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Run gridperf and capture (stdout, stderr, exit code)
pub fn run_gridperf(args: &[&str]) -> (String, String, i32) {
    let home = TempDir::new().expect("Failed to create temp home");
    let output = gridperf(&home)
        .args(args)
        .output()
        .expect("Failed to execute gridperf");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}
