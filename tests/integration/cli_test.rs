//! Command line behavior of the gridperf binary

use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{gridperf, REPORT_A, REPORT_B, REPORT_C, REPORT_LIST};

#[test]
fn summary_of_one_report() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["summary", REPORT_A])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Summary: 4134826_RNIV_BASEPV_performance",
        ))
        .stdout(predicate::str::contains("Number of tasks ST:MT is  1 : 2"));
}

#[test]
fn summary_of_a_list_file() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["summary", REPORT_LIST])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary: reports "))
        .stdout(predicate::str::contains("Number of tasks ST:MT is  2 : 4"))
        .stdout(predicate::str::contains("groups 2     tasks 4"));
}

#[test]
fn summary_in_seconds() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["summary", REPORT_A, "-s"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compute time ST:MT is            65 : 900"));
}

#[test]
fn summary_top_tasks_lists_completed_tasks() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["summary", REPORT_A, "--top-tasks", "2", "--pricer", "Credit.Cdx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ 02:40:00 - 02:50:00 ]"))
        .stdout(predicate::str::contains("[ 02:50:10 - 02:55:10 ]"))
        // the scan stops before the Fx.Swap task
        .stdout(predicate::str::contains("Number of tasks ST:MT is  0 : 2"));
}

#[test]
fn summary_json() {
    let home = TempDir::new().unwrap();
    let output = gridperf(&home)
        .args(["summary", REPORT_A, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["documents"], 1);
    assert_eq!(json["aggregate"]["num_st_tasks"], 1);
    assert_eq!(json["aggregate"]["pricers"]["Fx.Swap_1"]["num_tasks"], 1);
}

#[test]
fn report_without_trade_groups_warns() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["summary", REPORT_C])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Pricer"))
        .stderr(predicate::str::contains("Report has no trade group section"));
}

#[test]
fn missing_input_fails() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["summary", "tests/fixtures/missing_performance.html"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Input file does not exist"));
}

#[test]
fn compare_two_runs() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["compare", REPORT_B, REPORT_A])
        .assert()
        .success()
        .stdout(predicate::str::contains("reduction  33%"))
        .stdout(predicate::str::contains("TOTAL:"))
        .stdout(predicate::str::contains("ERROR").not());
}

#[test]
fn compare_against_run_with_unknown_pricers_flags_rows() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["compare", REPORT_A, REPORT_C])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Pricer"))
        .stdout(predicate::str::contains(
            "ERROR: tasks in perf reports don't match.",
        ));
}

#[test]
fn timeline_of_fixture_directory() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["timeline", "tests/fixtures", "--unit-minutes", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "4135001 RNIV_BASEPV     ...--.===================___",
        ))
        .stdout(predicate::str::contains("4140000 NO_TG Success"))
        .stdout(predicate::str::contains("provision:    [ - ]"));
}

#[test]
fn config_file_sets_defaults() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("gridperf");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[timeline]\nunit_minutes = 10\n").unwrap();

    gridperf(&home)
        .args(["timeline", REPORT_A])
        .assert()
        .success()
        .stdout(predicate::str::contains("one character is 10 minutes"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    gridperf(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_gridperf()"));
}
