//! Unit tests for job timelines and the sequence chart

use gridperf::report::timeline::chart;
use gridperf::report::{run_timeline_batch, ExtractOptions, Extractor, PatchedTimeline, Scope};

use crate::helpers::{fixture_path, REPORT_A, REPORT_B, REPORT_C};

fn patched(names: &[&str]) -> Vec<PatchedTimeline> {
    let paths: Vec<_> = names.iter().map(|name| fixture_path(name)).collect();
    let mut extractor = Extractor::new(ExtractOptions::with_scope(Scope::Timeline)).unwrap();
    run_timeline_batch(&paths, &mut extractor)
        .unwrap()
        .iter()
        .map(|timeline| timeline.patched().unwrap())
        .collect()
}

#[test]
fn missing_phases_are_patched_from_the_next_one() {
    let jobs = patched(&[REPORT_C]);
    let job = &jobs[0];
    assert_eq!(job.provisioning_start, job.compute_start);
    assert_eq!(job.provisioning_end, job.compute_start);
    assert_eq!(job.result_write_start, job.end);
    assert_eq!(job.compute_end.to_string(), "2019-08-07 03:50:00");
}

#[test]
fn chart_of_three_jobs_in_ten_minute_units() {
    // listed out of order; the chart sorts by start
    let jobs = patched(&[REPORT_C, REPORT_A, REPORT_B]);
    assert_eq!(
        chart(&jobs, 10),
        vec![
            "4134826 RNIV_BASEPV.............--===========================_",
            "4135001 RNIV_BASEPV     ...--.===================___",
            "      4140000 NO_TG                 .====_",
        ]
    );
}

#[test]
fn chart_of_three_jobs_in_five_minute_units() {
    let jobs = patched(&[REPORT_A, REPORT_B, REPORT_C]);
    let lines = chart(&jobs, 5);
    assert_eq!(
        lines[0],
        "4134826 RNIV_BASEPV..........................----======================================================__"
    );
    assert_eq!(
        lines[2],
        "      4140000 NO_TG                                  ..========__"
    );
}
