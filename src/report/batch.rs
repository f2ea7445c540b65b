//! Input resolution and the document-at-a-time extraction loop.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::aggregate::Aggregate;
use super::engine::Extractor;
use super::error::ReportError;
use super::model::ShownTask;
use super::timeline::{job_name, JobTimeline};

/// File name without directories and without its last extension.
///
/// Both `/` and `\` separate directories, since list files are often written
/// on another platform.
pub fn file_stem(path: &str) -> &str {
    let begin = path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let name = &path[begin..];
    match name.rfind('.') {
        Some(end) if end > 0 => &name[..end],
        _ => name,
    }
}

fn has_extension(path: &str, extension: &str) -> bool {
    path.to_ascii_lowercase()
        .ends_with(&extension.to_ascii_lowercase())
}

/// Reports named by `path`: the document itself if it has the report
/// extension, otherwise the entries of the list file.
pub fn resolve_inputs(path: &Path, extension: &str) -> Result<Vec<PathBuf>, ReportError> {
    if !path.is_file() {
        return Err(ReportError::input(path, "Input file does not exist"));
    }
    if has_extension(&path.to_string_lossy(), extension) {
        return Ok(vec![path.to_path_buf()]);
    }
    read_list(path, extension)
}

/// Like [`resolve_inputs`], but a directory stands for all reports in it.
pub fn resolve_timeline_inputs(path: &Path, extension: &str) -> Result<Vec<PathBuf>, ReportError> {
    if !path.is_dir() {
        return resolve_inputs(path, extension);
    }

    let entries = fs::read_dir(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reports: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_extension(&p.to_string_lossy(), extension))
        .collect();
    reports.sort();
    Ok(reports)
}

/// One report path per line; surrounding whitespace and quotes are ignored.
fn read_list(path: &Path, extension: &str) -> Result<Vec<PathBuf>, ReportError> {
    let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reports = Vec::new();
    for line in content.lines() {
        let entry = line.trim().trim_matches('"').trim();
        if entry.is_empty() {
            continue;
        }
        if !has_extension(entry, extension) {
            warn!("Listed report does not have {} extension: {}", extension, entry);
            continue;
        }
        let report = PathBuf::from(entry);
        if !report.is_file() {
            warn!("Listed report does not exist: {}", entry);
            continue;
        }
        reports.push(report);
    }
    Ok(reports)
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub aggregate: Aggregate,
    /// Tasks picked by the display limit, in completion order.
    pub shown: Vec<ShownTask>,
    /// Tasks of the selected trade group, by descending compute time.
    pub trade_group_tasks: Vec<ShownTask>,
    /// Documents extracted, including the one that stopped the run.
    pub documents: usize,
    /// The display limit ended the run early.
    pub stopped: bool,
}

/// A document failed; what was folded before it is kept.
#[derive(Debug, thiserror::Error)]
#[error("Failed to extract {}: {source}", path.display())]
pub struct BatchError {
    pub path: PathBuf,
    #[source]
    pub source: ReportError,
    pub partial: Box<BatchOutcome>,
}

/// Extract and fold `paths` one document at a time.
///
/// Stops after the first document in which the display limit ran out, and at
/// the first failing document.
pub fn run_batch(
    paths: &[PathBuf],
    extractor: &mut Extractor,
    trade_group: Option<&str>,
) -> Result<BatchOutcome, BatchError> {
    let mut outcome = BatchOutcome::default();

    for path in paths {
        info!("Parsing performance report: {}", file_stem(&path.to_string_lossy()));
        let extraction = match extractor.extract_file(path) {
            Ok(extraction) => extraction,
            Err(source) => {
                return Err(BatchError {
                    path: path.clone(),
                    source,
                    partial: Box::new(outcome),
                })
            }
        };

        outcome.documents += 1;
        outcome.aggregate.fold(&extraction);
        outcome.shown.extend(extraction.shown.iter().cloned());
        if let Some(tg) = trade_group.and_then(|id| extraction.trade_groups.get(id)) {
            outcome
                .trade_group_tasks
                .extend(tg.tasks.iter().map(|task| ShownTask::new(tg, task)));
        }

        if extraction.stopped {
            outcome.stopped = true;
            break;
        }
    }

    outcome
        .trade_group_tasks
        .sort_by_key(|shown| std::cmp::Reverse(shown.task.compute_time.to_seconds()));
    Ok(outcome)
}

/// Extract the phase timeline of every report, with dates completed.
pub fn run_timeline_batch(
    paths: &[PathBuf],
    extractor: &mut Extractor,
) -> Result<Vec<JobTimeline>, BatchError> {
    let mut timelines = Vec::with_capacity(paths.len());
    for path in paths {
        let stem = file_stem(&path.to_string_lossy()).to_string();
        info!("Parsing performance report: {}", stem);
        let result = extractor.extract_file(path).and_then(|extraction| {
            let mut timeline = JobTimeline::from_extraction(&extraction, job_name(&stem));
            timeline.fill_out_dates()?;
            Ok(timeline)
        });
        match result {
            Ok(timeline) => timelines.push(timeline),
            Err(source) => {
                return Err(BatchError {
                    path: path.clone(),
                    source,
                    partial: Box::default(),
                })
            }
        }
    }
    Ok(timelines)
}
