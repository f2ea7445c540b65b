//! Phase timelines of jobs and the sequence chart of a day's runs.
//!
//! A job goes through these phases:
//!
//! ```text
//! [ job start          - provisioning start ]  provisioning queue
//! [ provisioning start - provisioning end   ]  provisioning
//! [ provisioning end   - compute start      ]  engine queue
//! [ compute start      - compute end        ]  grid compute
//! [ compute end        - job end            ]  result writing
//! ```
//!
//! Only the job span carries dates in a report; the other spans are times of
//! day that [`JobTimeline::fill_out_dates`] places inside the job span.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::error::ReportError;
use super::model::{Extraction, Phase, Span};

/// Phase spans of one job as found in its report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobTimeline {
    pub id: String,
    pub name: String,
    pub status: String,
    pub job: Option<Span>,
    pub provisioning: Option<Span>,
    pub compute: Option<Span>,
    pub result_write: Option<Span>,
}

/// A timeline with every phase boundary present and dated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchedTimeline {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    pub provisioning_start: NaiveDateTime,
    pub provisioning_end: NaiveDateTime,
    pub compute_start: NaiveDateTime,
    pub compute_end: NaiveDateTime,
    pub result_write_start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl JobTimeline {
    pub fn from_extraction(extraction: &Extraction, name: impl Into<String>) -> Self {
        let (id, status) = extraction
            .job
            .as_ref()
            .map(|job| (job.id.clone(), job.status.clone()))
            .unwrap_or_else(|| ("?".to_string(), "?".to_string()));
        Self {
            id,
            name: name.into(),
            status,
            job: extraction.span(Phase::Job),
            provisioning: extraction.span(Phase::Provisioning),
            compute: extraction.span(Phase::Compute),
            result_write: extraction.span(Phase::ResultWrite),
        }
    }

    /// Put every phase span on the job's start or end date.
    ///
    /// Jobs are assumed to last at most a day, so only one of the two dates
    /// can place a time of day inside the job span. Without a job span there
    /// is nothing to anchor to and the phases are left as they are.
    pub fn fill_out_dates(&mut self) -> Result<(), ReportError> {
        let Some(job) = self.job else {
            return Ok(());
        };
        for span in [
            &mut self.result_write,
            &mut self.compute,
            &mut self.provisioning,
        ]
        .into_iter()
        .flatten()
        {
            span.end = place_in(job, span.end.time())?;
            span.start = place_in(job, span.start.time())?;
        }
        Ok(())
    }

    pub fn is_patchable(&self) -> bool {
        self.job.is_some()
    }

    /// Copy each missing phase from the next phase that is present, ending
    /// at the job end.
    pub fn patched(&self) -> Result<PatchedTimeline, ReportError> {
        let job = self.job.ok_or_else(|| ReportError::Timeline {
            message: format!("cannot patch job {} {} without a job span", self.id, self.name),
        })?;
        let result_write = self.result_write.unwrap_or(Span {
            start: job.end,
            end: job.end,
        });
        let compute = self.compute.unwrap_or(Span {
            start: result_write.start,
            end: result_write.start,
        });
        let provisioning = self.provisioning.unwrap_or(Span {
            start: compute.start,
            end: compute.start,
        });

        Ok(PatchedTimeline {
            id: self.id.clone(),
            name: self.name.clone(),
            start: job.start,
            provisioning_start: provisioning.start,
            provisioning_end: provisioning.end,
            compute_start: compute.start,
            compute_end: compute.end,
            result_write_start: result_write.start,
            end: job.end,
        })
    }
}

fn place_in(job: Span, time: NaiveTime) -> Result<NaiveDateTime, ReportError> {
    [job.start.date(), job.end.date()]
        .into_iter()
        .map(|date| date.and_time(time))
        .find(|candidate| *candidate >= job.start && *candidate <= job.end)
        .ok_or_else(|| ReportError::Timeline {
            message: format!("cannot place {} inside [{} - {}]", time, job.start, job.end),
        })
}

/// Job name encoded in a report file stem: the text between the first and
/// the last underscore (`4149345_RNIV_BASEPV_performance` -> `RNIV_BASEPV`).
pub fn job_name(stem: &str) -> &str {
    match (stem.find('_'), stem.rfind('_')) {
        (Some(first), Some(last)) if first < last => &stem[first + 1..last],
        _ => stem,
    }
}

/// Character drawn for each phase of the chart.
const QUEUE: char = '.';
const PROVISIONING: char = '-';
const COMPUTE: char = '=';
const RESULT_WRITE: char = '_';

/// One chart line per job, ordered by start, offset from the earliest start.
///
/// Each character stands for `unit_minutes` minutes; segments are rounded to
/// whole units.
pub fn chart(jobs: &[PatchedTimeline], unit_minutes: u32) -> Vec<String> {
    let mut sorted: Vec<&PatchedTimeline> = jobs.iter().collect();
    sorted.sort_by_key(|job| job.start);
    let Some(origin) = sorted.first().map(|job| job.start) else {
        return Vec::new();
    };

    let labels: Vec<String> = sorted
        .iter()
        .map(|job| format!("{} {}", job.id, job.name))
        .collect();
    let margin = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let unit_ms = f64::from(unit_minutes.max(1)) * 60_000.0;
    let units = |from: NaiveDateTime, to: NaiveDateTime| -> usize {
        let n = ((to - from).num_milliseconds() as f64 / unit_ms).round();
        if n > 0.0 {
            n as usize
        } else {
            0
        }
    };

    sorted
        .iter()
        .zip(labels)
        .map(|(job, label)| {
            let mut line = format!("{:>margin$}", label);
            let segments = [
                (' ', units(origin, job.start)),
                (QUEUE, units(job.start, job.provisioning_start)),
                (PROVISIONING, units(job.provisioning_start, job.provisioning_end)),
                (QUEUE, units(job.provisioning_end, job.compute_start)),
                (COMPUTE, units(job.compute_start, job.compute_end)),
                (RESULT_WRITE, units(job.compute_end, job.end)),
            ];
            for (ch, count) in segments {
                line.extend(std::iter::repeat(ch).take(count));
            }
            line
        })
        .collect()
}
