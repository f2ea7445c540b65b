//! Compute time reduction between two runs of the same job.

use serde::Serialize;

use super::aggregate::{Aggregate, PricerResult};
use super::duration::Duration;
use super::error::ReportError;

/// Label of the row comparing whole runs.
pub const TOTAL_LABEL: &str = "TOTAL: ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub pricer: String,
    pub current: Duration,
    pub previous: Duration,
    /// Percentage of the baseline compute time saved, rounded half away
    /// from zero. Negative when the current run is slower.
    pub reduction: i64,
    /// Both runs computed the same number of trade groups and tasks.
    pub comparable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// One row per baseline pricer, by descending baseline compute time.
    pub rows: Vec<ComparisonRow>,
    pub total: ComparisonRow,
}

/// Compare `current` against the baseline `previous`.
///
/// Results are merged across thread caps first, since a run may have moved a
/// pricer between single and multi threaded execution.
pub fn compare(current: &Aggregate, previous: &Aggregate) -> Result<Comparison, ReportError> {
    let current_pricers = current.by_pricer()?;
    let mut previous_pricers: Vec<PricerResult> = previous.by_pricer()?.into_values().collect();
    previous_pricers.sort_by(|a, b| {
        b.compute_time
            .to_seconds()
            .cmp(&a.compute_time.to_seconds())
            .then_with(|| a.pricer.cmp(&b.pricer))
    });

    let rows = previous_pricers
        .iter()
        .map(|baseline| {
            let now = current_pricers
                .get(&baseline.pricer)
                .cloned()
                .unwrap_or_else(|| PricerResult::new(&baseline.pricer, 0));
            let comparable = now.num_tradegroups == baseline.num_tradegroups
                && now.num_tasks == baseline.num_tasks;
            row(
                &baseline.pricer,
                now.compute_time,
                baseline.compute_time,
                comparable,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total = row(
        TOTAL_LABEL,
        current.total_duration(),
        previous.total_duration(),
        current.total_tasks() == previous.total_tasks(),
    )?;

    Ok(Comparison { rows, total })
}

fn row(
    pricer: &str,
    current: Duration,
    previous: Duration,
    comparable: bool,
) -> Result<ComparisonRow, ReportError> {
    Ok(ComparisonRow {
        pricer: pricer.to_string(),
        current,
        previous,
        reduction: reduction_percent(current.to_seconds(), previous.to_seconds())
            .ok_or_else(|| ReportError::ZeroBaseline {
                pricer: pricer.trim().trim_end_matches(':').to_string(),
            })?,
        comparable,
    })
}

/// `round((previous - current) * 100 / previous)`, `None` for a zero baseline.
pub fn reduction_percent(current: u64, previous: u64) -> Option<i64> {
    if previous == 0 {
        return None;
    }
    let saved = previous as f64 - current as f64;
    Some((saved * 100.0 / previous as f64).round() as i64)
}
