//! Records and result types produced by the extraction engine.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::duration::Duration;

/// Pricer name given to trade groups that only appear in task lines.
pub const UNKNOWN_PRICER: &str = "Unknown Pricer";

/// A bundle of positions priced together, with the tasks that computed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeGroup {
    pub id: String,
    pub pricer: String,
    pub num_positions: u32,
    pub cap_threads: u32,
    pub tasks: Vec<Task>,
}

impl TradeGroup {
    /// Placeholder for a trade group referenced by a task but never declared.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pricer: UNKNOWN_PRICER.to_string(),
            num_positions: 0,
            cap_threads: 0,
            tasks: Vec::new(),
        }
    }

    pub fn is_multi_threaded(&self) -> bool {
        self.cap_threads > 1
    }

    /// `ST` or `MT`.
    pub fn threading(&self) -> &'static str {
        threading_label(self.cap_threads)
    }

    /// Aggregation key: pricer name and thread cap.
    pub fn key(&self) -> String {
        pricer_key(&self.pricer, self.cap_threads)
    }

    /// Total compute time of the tasks seen so far.
    pub fn compute_time(&self) -> Duration {
        self.tasks.iter().map(|t| t.compute_time).sum()
    }
}

pub(crate) fn threading_label(cap_threads: u32) -> &'static str {
    if cap_threads > 1 {
        "MT"
    } else {
        "ST"
    }
}

pub(crate) fn pricer_key(pricer: &str, cap_threads: u32) -> String {
    format!("{}_{}", pricer, cap_threads)
}

/// One unit of distributed compute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub trade_group_id: String,
    /// Path range such as `11:20`, empty for tasks without one.
    pub paths: String,
    pub status: String,
    pub compute_time: Duration,
    pub start: Option<String>,
    pub finish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_processors: Option<u32>,
}

impl Task {
    /// A task opened by its task line, still waiting for its duration.
    pub fn open(line: &TaskLine) -> Self {
        Self {
            trade_group_id: line.trade_group_id.clone(),
            paths: line.paths.clone(),
            status: line.status.clone(),
            compute_time: Duration::ZERO,
            start: None,
            finish: None,
            engine: None,
            num_processors: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "Success"
    }
}

/// Job id and status from the job header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobHeader {
    pub id: String,
    pub status: String,
}

/// Start and end of a phase.
///
/// Only the job span carries dates; the other phases carry a time of day on
/// the default date (1970-01-01) until their date is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Phases of a job that report a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Job,
    Provisioning,
    Compute,
    ResultWrite,
}

/// Parsed task line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskLine {
    pub trade_group_id: String,
    pub paths: String,
    pub status: String,
    /// Matched only through the any-status grammar.
    pub failed: bool,
}

/// Parsed trade group line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeGroupLine {
    pub id: String,
    pub pricer: String,
    pub num_positions: u32,
    pub cap_threads: u32,
}

impl From<&TradeGroupLine> for TradeGroup {
    fn from(line: &TradeGroupLine) -> Self {
        Self {
            id: line.id.clone(),
            pricer: line.pricer.clone(),
            num_positions: line.num_positions,
            cap_threads: line.cap_threads,
            tasks: Vec::new(),
        }
    }
}

/// Parsed computational duration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub start: String,
    pub finish: String,
    pub compute_time: Duration,
}

/// One recognized item of a report, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Record {
    Job(JobHeader),
    Summary(String),
    Phase(Phase, Span),
    TradeGroup(TradeGroupLine),
    TaskStart(TaskLine),
    Completion(Completion),
    Omitted(u32),
}

/// Everything extracted from one report document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub job: Option<JobHeader>,
    pub summary: Option<String>,
    pub spans: BTreeMap<String, Span>,
    pub trade_groups: BTreeMap<String, TradeGroup>,
    #[serde(skip)]
    pub records: Vec<Record>,
    /// Completed tasks picked for display, in completion order.
    pub shown: Vec<ShownTask>,
    /// Omitted entries the report declared.
    pub omitted_declared: u32,
    /// Commented entries that were replayed.
    pub omitted_replayed: u32,
    pub has_trade_group_section: bool,
    /// The run's display limit was reached in this document.
    pub stopped: bool,
}

impl Extraction {
    pub fn span(&self, phase: Phase) -> Option<Span> {
        self.spans.get(phase.key()).copied()
    }

    /// Number of completed tasks over all trade groups.
    pub fn task_count(&self) -> usize {
        self.trade_groups.values().map(|tg| tg.tasks.len()).sum()
    }
}

impl Phase {
    pub(crate) fn key(self) -> &'static str {
        match self {
            Phase::Job => "job",
            Phase::Provisioning => "provisioning",
            Phase::Compute => "compute",
            Phase::ResultWrite => "result_write",
        }
    }
}

/// A completed task together with the trade group attributes it is printed
/// with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShownTask {
    pub pricer: String,
    pub cap_threads: u32,
    pub trade_group_id: String,
    pub num_positions: u32,
    pub task: Task,
}

impl ShownTask {
    pub fn new(trade_group: &TradeGroup, task: &Task) -> Self {
        Self {
            pricer: trade_group.pricer.clone(),
            cap_threads: trade_group.cap_threads,
            trade_group_id: trade_group.id.clone(),
            num_positions: trade_group.num_positions,
            task: task.clone(),
        }
    }
}
