//! Line grammars of a performance report.
//!
//! Every record the extractor cares about is a single text fragment that
//! matches one of a fixed set of patterns. The patterns are compiled once per
//! [`Recognizer`] and searched (not anchored), since the fragments carry
//! surrounding noise.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use tracing::{debug, warn};

use super::duration::Duration;
use super::error::ReportError;
use super::model::{Completion, JobHeader, Span, TaskLine, TradeGroupLine};

/// Field layout of trade group lines, fixed per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeGroupGrammar {
    /// Ends with the multi-threading flag and the thread cap.
    Current,
    /// Older reports without threading fields; every group is single threaded.
    Legacy,
}

/// Success-first and any-status patterns of one task line shape.
#[derive(Debug)]
struct TaskGrammar {
    name: &'static str,
    success: Regex,
    any_status: Regex,
    has_paths: bool,
}

impl TaskGrammar {
    fn new(name: &'static str, prefix: &str, has_paths: bool) -> Result<Self, ReportError> {
        Ok(Self {
            name,
            success: Regex::new(&format!(r"{prefix},\s*(Success),"))?,
            any_status: Regex::new(&format!(r"{prefix},\s*([A-Za-z]+\s?[A-Za-z]*),"))?,
            has_paths,
        })
    }

    fn line(&self, caps: &Captures<'_>, failed: bool) -> TaskLine {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
        let (paths, status) = if self.has_paths {
            (group(2), group(3))
        } else {
            (String::new(), group(2))
        };
        TaskLine {
            trade_group_id: group(1),
            paths,
            status,
            failed,
        }
    }
}

/// Compiled record patterns plus the per-document trade group grammar latch.
#[derive(Debug)]
pub struct Recognizer {
    job: Regex,
    computational: Regex,
    trade_group_current: Regex,
    trade_group_legacy: Regex,
    positions: Regex,
    tasks: [TaskGrammar; 3],
    omitted: Regex,
    span: Regex,
    engine: Regex,
    processors: Regex,
    grammar: Option<TradeGroupGrammar>,
}

const TRADE_GROUP_PREFIX: &str =
    r"\d*#\d*_*\w*#TradeGroup#(\d*)#(?:\d|-|\s|:)*#(?:\d|-|\s|:)*#\d*#\d*#\d*#\d*";

impl Recognizer {
    pub fn new() -> Result<Self, ReportError> {
        Ok(Self {
            job: Regex::new(r"Job\s\[(\d*)\],\s*([A-Za-z]+\s?[A-Za-z]*),")?,
            computational: Regex::new(concat!(
                r",\s*Start\s*=\s*\[((?:\d|:)*).(?:\d*)\]\s*",
                r",\s*End\s*=\s*\[((?:\d|:)*).(?:\d*)\]\s*",
                r",\s*Computational\s*=\s*\[(\d*).(\d*):(\d*):(\d*).(?:\d*)\]",
            ))?,
            trade_group_current: Regex::new(&format!(
                r"{TRADE_GROUP_PREFIX}#(?:True|False)#(\d*)"
            ))?,
            trade_group_legacy: Regex::new(TRADE_GROUP_PREFIX)?,
            positions: Regex::new(r"No\.Pos\s*=\s*(\d+)\s+Pricing\s+(\S*)")?,
            tasks: [
                TaskGrammar::new("regular", r"\d*#MFL(\d*)#(-?\d*:-?\d*)", true)?,
                TaskGrammar::new("md", r"\d*#(\w*-\w*-\w*-\w*-\w*)#(-?\d*:-?\d*)", true)?,
                TaskGrammar::new("no path", r"\d*#MFL(\d*)", false)?,
            ],
            omitted: Regex::new(r"(\d+)\s+additional entries omitted")?,
            span: Regex::new(
                r",\s*Start\s*=\s*\[((?:\d|-|\s|:|\.)*)\]\s*,\s*End\s*=\s*\[((?:\d|-|\s|:|\.)*)\]",
            )?,
            engine: Regex::new(r"Engine\s*=\s*\[([^\]]+)\]")?,
            processors: Regex::new(r"Processors\s*=\s*\[(\d+)\]")?,
            grammar: None,
        })
    }

    /// Forget the trade group grammar of the previous document.
    pub fn reset(&mut self) {
        self.grammar = None;
    }

    /// The latched trade group grammar, once a trade group line was seen.
    pub fn grammar(&self) -> Option<TradeGroupGrammar> {
        self.grammar
    }

    /// `Job [4134826], Success,`
    pub fn job_header(&self, text: &str) -> Result<JobHeader, ReportError> {
        let caps = self
            .job
            .captures(text)
            .ok_or_else(|| ReportError::unrecognized("job header", text))?;
        Ok(JobHeader {
            id: caps[1].to_string(),
            status: caps[2].to_string(),
        })
    }

    /// `1#80012#TradeGroup#1089#...#False#8 ... No.Pos = 60 Pricing Credit.Cdx`
    ///
    /// The first line of a document decides the grammar for the rest of it.
    pub fn trade_group(&mut self, text: &str) -> Result<TradeGroupLine, ReportError> {
        let grammar = match self.grammar {
            Some(grammar) => grammar,
            None => {
                let grammar = if self.trade_group_current.is_match(text) {
                    TradeGroupGrammar::Current
                } else {
                    TradeGroupGrammar::Legacy
                };
                debug!(?grammar, "Latched trade group grammar");
                self.grammar = Some(grammar);
                grammar
            }
        };

        let (id, cap_threads) = match grammar {
            TradeGroupGrammar::Current => {
                let caps = self
                    .trade_group_current
                    .captures(text)
                    .ok_or_else(|| ReportError::unrecognized("trade group", text))?;
                let cap = caps[2]
                    .parse()
                    .map_err(|_| ReportError::unrecognized("trade group", text))?;
                (caps[1].to_string(), cap)
            }
            TradeGroupGrammar::Legacy => {
                let caps = self
                    .trade_group_legacy
                    .captures(text)
                    .ok_or_else(|| ReportError::unrecognized("trade group", text))?;
                (caps[1].to_string(), 1)
            }
        };

        let caps = self
            .positions
            .captures(text)
            .ok_or_else(|| ReportError::unrecognized("positions and pricer", text))?;
        let num_positions = caps[1]
            .parse()
            .map_err(|_| ReportError::unrecognized("positions and pricer", text))?;

        Ok(TradeGroupLine {
            id,
            pricer: caps[2].to_string(),
            num_positions,
            cap_threads,
        })
    }

    /// `4900235#MFL1088#11:20, Success,` and its md and path-less variants.
    ///
    /// Each shape is tried with a successful status first; a line only
    /// matched by the any-status pattern is a failed task.
    pub fn task(&self, text: &str) -> Result<TaskLine, ReportError> {
        for grammar in &self.tasks {
            if let Some(caps) = grammar.success.captures(text) {
                return Ok(grammar.line(&caps, false));
            }
            if let Some(caps) = grammar.any_status.captures(text) {
                let line = grammar.line(&caps, true);
                warn!(
                    grammar = grammar.name,
                    status = %line.status,
                    "Failed task: {}",
                    text.trim()
                );
                return Ok(line);
            }
        }
        Err(ReportError::unrecognized("task", text))
    }

    /// `, Start = [00:13:54.897], End = [00:13:58.056], Computational = [2.11:34:03.159]`
    pub fn completion(&self, text: &str) -> Result<Completion, ReportError> {
        let caps = self
            .computational
            .captures(text)
            .ok_or_else(|| ReportError::unrecognized("computational duration", text))?;
        let compute_time = Duration::parse_parts(&caps[3], &caps[4], &caps[5], &caps[6])
            .ok_or_else(|| ReportError::unrecognized("computational duration", text))?;
        Ok(Completion {
            start: caps[1].to_string(),
            finish: caps[2].to_string(),
            compute_time,
        })
    }

    /// Engine host and processor count some reports add to task lines.
    pub fn task_resources(&self, text: &str) -> (Option<String>, Option<u32>) {
        let engine = self
            .engine
            .captures(text)
            .map(|caps| caps[1].trim().to_string());
        let processors = self
            .processors
            .captures(text)
            .and_then(|caps| caps[1].parse().ok());
        (engine, processors)
    }

    /// `4006 additional entries omitted.`
    pub fn omitted(&self, text: &str) -> Option<u32> {
        self.omitted
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
    }

    /// `, Start = [2019-08-07 00:10:57.417], End = [2019-08-07 07:20:12.247]`
    ///
    /// Both ends carry either a full date and time or only a time of day.
    /// A time of day is placed on the default date until completed.
    pub fn span(&self, text: &str) -> Result<Span, ReportError> {
        let caps = self
            .span
            .captures(text)
            .ok_or_else(|| ReportError::unrecognized("span", text))?;
        let (start, end) = (caps[1].trim(), caps[2].trim());

        let dated = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f");
        if let (Ok(start), Ok(end)) = (dated(start), dated(end)) {
            return Ok(Span { start, end });
        }

        let timed = |s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                .map(|t| NaiveDateTime::new(NaiveDate::default(), t))
        };
        match (timed(start), timed(end)) {
            (Ok(start), Ok(end)) => Ok(Span { start, end }),
            _ => Err(ReportError::unrecognized("span", text)),
        }
    }
}
