//! Unit tests for input resolution and batch runs

use std::fs;

use gridperf::report::{
    resolve_inputs, resolve_timeline_inputs, run_batch, run_timeline_batch, ExtractOptions,
    Extractor, Scope,
};
use tempfile::TempDir;

use crate::helpers::{fixture_path, fixtures_dir, write_list, REPORT_A, REPORT_B, REPORT_C};

fn extractor() -> Extractor {
    Extractor::new(ExtractOptions::default()).unwrap()
}

#[test]
fn report_resolves_to_itself() {
    let inputs = resolve_inputs(&fixture_path(REPORT_A), ".html").unwrap();
    assert_eq!(inputs, vec![fixture_path(REPORT_A)]);
}

#[test]
fn missing_input_is_an_error() {
    let err = resolve_inputs(&fixture_path("nope.html"), ".html").unwrap_err();
    assert!(err.to_string().contains("Input file does not exist"));
}

#[test]
fn list_file_skips_blank_quoted_and_unusable_entries() {
    let temp_dir = TempDir::new().unwrap();
    let list = temp_dir.path().join("reports.txt");
    fs::write(
        &list,
        format!(
            "  {}  \n\n\"{}\"\n{}\n{}\n",
            fixture_path(REPORT_A).display(),
            fixture_path(REPORT_B).display(),
            fixture_path("reports.txt").display(),
            temp_dir.path().join("gone.html").display(),
        ),
    )
    .unwrap();

    let inputs = resolve_inputs(&list, ".html").unwrap();
    assert_eq!(inputs, vec![fixture_path(REPORT_A), fixture_path(REPORT_B)]);
}

#[test]
fn directory_resolves_to_sorted_reports() {
    let inputs = resolve_timeline_inputs(&fixtures_dir(), ".html").unwrap();
    assert_eq!(
        inputs,
        vec![
            fixture_path(REPORT_A),
            fixture_path(REPORT_B),
            fixture_path(REPORT_C)
        ]
    );
}

#[test]
fn batch_folds_every_report() {
    let outcome = run_batch(
        &[fixture_path(REPORT_A), fixture_path(REPORT_B), fixture_path(REPORT_C)],
        &mut extractor(),
        None,
    )
    .unwrap();
    assert_eq!(outcome.documents, 3);
    assert!(!outcome.stopped);
    assert!(outcome.shown.is_empty());
    assert_eq!(outcome.aggregate.total_tasks(), 8);
    assert!(outcome.aggregate.pricers.contains_key("Unknown Pricer_0"));
}

#[test]
fn trade_group_tasks_are_sorted_by_compute_time() {
    let outcome = run_batch(
        &[fixture_path(REPORT_A), fixture_path(REPORT_B)],
        &mut extractor(),
        Some("1089"),
    )
    .unwrap();
    let minutes: Vec<u64> = outcome
        .trade_group_tasks
        .iter()
        .map(|shown| shown.task.compute_time.to_seconds() / 60)
        .collect();
    assert_eq!(minutes, vec![10, 6, 5, 4]);
    assert!(outcome
        .trade_group_tasks
        .iter()
        .all(|shown| shown.pricer == "Credit.Cdx"));
}

#[test]
fn failing_report_keeps_what_came_before() {
    let temp_dir = TempDir::new().unwrap();
    let broken = temp_dir.path().join("broken_performance.html");
    fs::write(&broken, "<html><body><body></body></body></html>").unwrap();
    let list = write_list(
        &temp_dir,
        "reports.txt",
        &[fixture_path(REPORT_A), broken.clone(), fixture_path(REPORT_B)],
    );

    let inputs = resolve_inputs(&list, ".html").unwrap();
    let err = run_batch(&inputs, &mut extractor(), None).unwrap_err();
    assert_eq!(err.path, broken);
    assert!(err.source.is_structural());
    assert_eq!(err.partial.documents, 1);
    assert_eq!(err.partial.aggregate.total_tasks(), 3);
}

#[test]
fn timeline_batch_names_jobs_from_file_stems() {
    let mut extractor = Extractor::new(ExtractOptions::with_scope(Scope::Timeline)).unwrap();
    let timelines = run_timeline_batch(
        &[fixture_path(REPORT_A), fixture_path(REPORT_C)],
        &mut extractor,
    )
    .unwrap();

    assert_eq!(timelines[0].id, "4134826");
    assert_eq!(timelines[0].name, "RNIV_BASEPV");
    assert_eq!(timelines[1].name, "NO_TG");
    assert!(timelines[1].provisioning.is_none());
    assert_eq!(
        timelines[0].compute.unwrap().start.to_string(),
        "2019-08-07 02:36:56.572"
    );
}

#[test]
fn display_limit_stops_before_the_next_report_is_opened() {
    let temp_dir = TempDir::new().unwrap();
    // never read: opening it would fail the batch
    let broken = temp_dir.path().join("broken_performance.html");
    fs::write(&broken, "<!-- unterminated").unwrap();

    let mut extractor = Extractor::new(ExtractOptions {
        limit: Some(gridperf::report::TaskLimit::new(1, None)),
        ..ExtractOptions::default()
    })
    .unwrap();
    let outcome = run_batch(
        &[fixture_path(REPORT_A), broken, fixture_path(REPORT_B)],
        &mut extractor,
        None,
    )
    .unwrap();

    assert!(outcome.stopped);
    assert_eq!(outcome.documents, 1);
    assert_eq!(outcome.shown.len(), 1);
    assert_eq!(outcome.shown[0].task.paths, "0:10");
    assert_eq!(outcome.aggregate.total_tasks(), 1);
}
