//! Unit tests for extracting and aggregating the fixture reports

use gridperf::report::model::{Phase, Record};
use gridperf::report::{
    compare, Aggregate, ExtractOptions, Extraction, Extractor, Scope, TaskLimit,
};

use crate::helpers::{fixture_path, load_fixture, temp_fixture, REPORT_A, REPORT_B, REPORT_C};

fn extract(name: &str) -> Extraction {
    Extractor::new(ExtractOptions::default())
        .unwrap()
        .extract_file(&fixture_path(name))
        .unwrap()
}

fn aggregate(names: &[&str]) -> Aggregate {
    let mut agg = Aggregate::new();
    for name in names {
        agg.fold(&extract(name));
    }
    agg
}

#[test]
fn job_header_and_summary_are_read() {
    let extraction = extract(REPORT_A);
    let job = extraction.job.as_ref().unwrap();
    assert_eq!(job.id, "4134826");
    assert_eq!(job.status, "Success");
    assert_eq!(
        extraction.summary.as_deref(),
        Some("Computational = [0.00:16:05.000]")
    );
}

#[test]
fn trade_groups_and_their_tasks() {
    let extraction = extract(REPORT_A);
    assert!(extraction.has_trade_group_section);
    assert_eq!(extraction.trade_groups.len(), 2);

    let cdx = &extraction.trade_groups["1089"];
    assert_eq!(cdx.pricer, "Credit.Cdx");
    assert_eq!(cdx.cap_threads, 8);
    assert_eq!(cdx.num_positions, 60);
    assert_eq!(cdx.tasks.len(), 2);
    assert_eq!(cdx.compute_time().to_string(), "[ 0.00:15:00]");
    assert_eq!(cdx.tasks[1].paths, "11:20");
    assert_eq!(cdx.tasks[1].start.as_deref(), Some("02:50:10"));
    assert_eq!(cdx.tasks[1].finish.as_deref(), Some("02:55:10"));

    let swap = &extraction.trade_groups["2001"];
    assert_eq!(swap.pricer, "Fx.Swap");
    assert!(!swap.is_multi_threaded());
    assert_eq!(swap.tasks.len(), 1);
}

#[test]
fn phase_spans_are_recorded() {
    let extraction = extract(REPORT_A);
    let job = extraction.span(Phase::Job).unwrap();
    assert_eq!(job.start.to_string(), "2019-08-07 00:10:57.417");
    assert_eq!(job.end.to_string(), "2019-08-07 07:20:12.247");
    assert!(extraction.span(Phase::Provisioning).is_some());
    assert!(extraction.span(Phase::Compute).is_some());
    assert!(extraction.span(Phase::ResultWrite).is_some());
}

#[test]
fn single_threaded_pricer_with_two_tasks() {
    let doc = "<html><body><ul><li><a>Job [500], Success,</a><ul>\
        <li><a>Job Details</a><ul><li><a>TradeGroup</a><ul>\
        <li>1#80012#TradeGroup#9#2019-04-11 00:00:00#2019-05-23 19:07:16#8#100#8000#100#False#1 No.Pos = 60 Pricing Credit.Cdx</li>\
        </ul></li></ul></li>\
        <li><a>Component [Grid],</a><ul>\
        <li><a>500#MFL9#0:10, Success,</a> Duration = [00:10:00.000], Start = [01:00:00.000], End = [01:10:00.000], Computational = [0.00:10:00.000]</li>\
        <li><a>500#MFL9#10:20, Success,</a> Duration = [00:05:00.000], Start = [01:10:00.000], End = [01:15:00.000], Computational = [0.00:05:00.000]</li>\
        </ul></li></ul></li></ul></body></html>";
    let extraction = Extractor::new(ExtractOptions::default())
        .unwrap()
        .extract(doc)
        .unwrap();
    let mut agg = Aggregate::new();
    agg.fold(&extraction);

    let result = &agg.pricers["Credit.Cdx_1"];
    assert_eq!(result.num_tasks, 2);
    assert_eq!(result.num_tradegroups, 1);
    assert_eq!(result.compute_time.to_string(), "[ 0.00:15:00]");
    assert_eq!(agg.num_st_tasks, 2);
    assert_eq!(agg.num_mt_tasks, 0);
}

#[test]
fn report_without_trade_groups_replays_omitted_entries() {
    let extraction = extract(REPORT_C);
    assert!(!extraction.has_trade_group_section);
    assert_eq!(extraction.omitted_declared, 1);
    assert_eq!(extraction.omitted_replayed, 1);

    let unknown = &extraction.trade_groups["77"];
    assert_eq!(unknown.pricer, "Unknown Pricer");
    assert_eq!(unknown.tasks.len(), 2);
    assert_eq!(unknown.compute_time().to_string(), "[ 0.00:05:00]");
}

#[test]
fn replayed_report_folds_one_task_per_duration_line() {
    for name in [REPORT_A, REPORT_B, REPORT_C] {
        let extraction = extract(name);
        let completions = extraction
            .records
            .iter()
            .filter(|r| matches!(r, Record::Completion(_)))
            .count();
        assert_eq!(extraction.task_count(), completions, "{}", name);

        let mut agg = Aggregate::new();
        agg.fold(&extraction);
        assert_eq!(agg.total_tasks() as usize, completions, "{}", name);
        for (id, tg) in &extraction.trade_groups {
            assert!(tg.tasks.iter().all(|task| &task.trade_group_id == id));
        }
    }
}

#[test]
fn alternate_report_supplies_trade_groups() {
    // job 4140000 with the tasks of trade group 1089 and no trade group section
    let text = load_fixture(REPORT_C).replace("MFL77", "MFL1089");
    let (_dir, path) = temp_fixture(REPORT_C);
    std::fs::write(&path, text).unwrap();

    let mut extractor = Extractor::new(ExtractOptions {
        alt_trade_groups: Some(fixture_path(REPORT_A)),
        ..ExtractOptions::default()
    })
    .unwrap();
    let extraction = extractor.extract_file(&path).unwrap();
    assert!(!extraction.has_trade_group_section);
    assert_eq!(extraction.trade_groups["1089"].pricer, "Credit.Cdx");
    assert_eq!(extraction.trade_groups["1089"].tasks.len(), 2);
    assert!(extraction.trade_groups["2001"].tasks.is_empty());
}

#[test]
fn timeline_scope_skips_tasks() {
    let mut extractor = Extractor::new(ExtractOptions::with_scope(Scope::Timeline)).unwrap();
    let extraction = extractor.extract_file(&fixture_path(REPORT_A)).unwrap();
    assert!(extraction.trade_groups.is_empty());
    assert_eq!(extraction.spans.len(), 4);
}

#[test]
fn limit_runs_across_documents() {
    let mut extractor = Extractor::new(ExtractOptions {
        limit: Some(TaskLimit::new(4, None)),
        ..ExtractOptions::default()
    })
    .unwrap();

    let first = extractor.extract_file(&fixture_path(REPORT_A)).unwrap();
    assert_eq!(first.shown.len(), 3);
    assert!(!first.stopped);

    let second = extractor.extract_file(&fixture_path(REPORT_B)).unwrap();
    assert_eq!(second.shown.len(), 1);
    assert!(second.stopped);
    assert_eq!(second.shown[0].trade_group_id, "1089");
    assert_eq!(extractor.limit().map(|l| l.remaining), Some(0));
}

#[test]
fn aggregate_splits_single_and_multi_threaded() {
    let agg = aggregate(&[REPORT_A]);
    assert_eq!(agg.num_mt_tasks, 2);
    assert_eq!(agg.num_st_tasks, 1);
    assert_eq!(agg.mt_duration.to_string(), "[ 0.00:15:00]");
    assert_eq!(agg.st_duration.to_string(), "[ 0.00:01:05]");

    let sorted: Vec<&str> = agg.sorted_pricers().iter().map(|r| r.pricer.as_str()).collect();
    assert_eq!(sorted, vec!["Credit.Cdx", "Fx.Swap"]);
}

#[test]
fn aggregate_folds_several_reports() {
    let agg = aggregate(&[REPORT_A, REPORT_B]);
    let cdx = &agg.pricers["Credit.Cdx_8"];
    assert_eq!(cdx.num_tradegroups, 2);
    assert_eq!(cdx.num_tasks, 4);
    assert_eq!(cdx.compute_time.to_string(), "[ 0.00:25:00]");
    assert_eq!(agg.total_tasks(), 6);
}

#[test]
fn later_run_is_compared_to_baseline() {
    let comparison = compare(&aggregate(&[REPORT_B]), &aggregate(&[REPORT_A])).unwrap();

    assert_eq!(comparison.rows.len(), 2);
    assert_eq!(comparison.rows[0].pricer, "Credit.Cdx");
    assert_eq!(comparison.rows[0].reduction, 33);
    assert!(comparison.rows[0].comparable);
    assert_eq!(comparison.rows[1].pricer, "Fx.Swap");
    assert_eq!(comparison.rows[1].reduction, 0);
    assert_eq!(comparison.total.reduction, 31);
}

#[test]
fn pricer_missing_from_current_run_counts_as_full_reduction() {
    let comparison = compare(&aggregate(&[REPORT_C]), &aggregate(&[REPORT_A])).unwrap();
    let cdx = comparison
        .rows
        .iter()
        .find(|row| row.pricer == "Credit.Cdx")
        .unwrap();
    assert_eq!(cdx.reduction, 100);
    assert!(!cdx.comparable);
    assert!(!comparison.total.comparable);
}
