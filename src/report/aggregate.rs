//! Running totals over the reports of one run.

use std::collections::BTreeMap;

use serde::Serialize;

use super::duration::Duration;
use super::error::ReportError;
use super::model::{pricer_key, threading_label, Extraction};

/// Totals for one pricer at one thread cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricerResult {
    pub pricer: String,
    pub cap_threads: u32,
    pub num_tradegroups: u32,
    pub num_tasks: u32,
    pub compute_time: Duration,
}

impl PricerResult {
    pub fn new(pricer: impl Into<String>, cap_threads: u32) -> Self {
        Self {
            pricer: pricer.into(),
            cap_threads,
            num_tradegroups: 0,
            num_tasks: 0,
            compute_time: Duration::ZERO,
        }
    }

    pub fn key(&self) -> String {
        pricer_key(&self.pricer, self.cap_threads)
    }

    pub fn threading(&self) -> &'static str {
        threading_label(self.cap_threads)
    }

    /// Sum two results of the same pricer, possibly at different thread caps.
    ///
    /// The merged result has a thread cap of zero.
    pub fn merge(&self, other: &PricerResult) -> Result<PricerResult, ReportError> {
        if self.pricer != other.pricer {
            return Err(ReportError::PricerMismatch {
                left: self.pricer.clone(),
                right: other.pricer.clone(),
            });
        }
        Ok(PricerResult {
            pricer: self.pricer.clone(),
            cap_threads: 0,
            num_tradegroups: self.num_tradegroups + other.num_tradegroups,
            num_tasks: self.num_tasks + other.num_tasks,
            compute_time: self.compute_time + other.compute_time,
        })
    }
}

/// Per-pricer results plus single and multi threaded totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// Keyed by `"{pricer}_{cap_threads}"`.
    pub pricers: BTreeMap<String, PricerResult>,
    pub mt_duration: Duration,
    pub st_duration: Duration,
    pub num_mt_tasks: u32,
    pub num_st_tasks: u32,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the trade groups and tasks of one report.
    pub fn fold(&mut self, extraction: &Extraction) {
        for trade_group in extraction.trade_groups.values() {
            let result = self
                .pricers
                .entry(trade_group.key())
                .or_insert_with(|| PricerResult::new(&trade_group.pricer, trade_group.cap_threads));
            result.num_tradegroups += 1;

            for task in &trade_group.tasks {
                result.num_tasks += 1;
                result.compute_time += task.compute_time;
                if trade_group.is_multi_threaded() {
                    self.num_mt_tasks += 1;
                    self.mt_duration += task.compute_time;
                } else {
                    self.num_st_tasks += 1;
                    self.st_duration += task.compute_time;
                }
            }
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.st_duration + self.mt_duration
    }

    pub fn total_tasks(&self) -> u32 {
        self.num_st_tasks + self.num_mt_tasks
    }

    /// Results by descending compute time, ties by key.
    pub fn sorted_pricers(&self) -> Vec<&PricerResult> {
        let mut sorted: Vec<&PricerResult> = self.pricers.values().collect();
        sorted.sort_by(|a, b| {
            b.compute_time
                .to_seconds()
                .cmp(&a.compute_time.to_seconds())
                .then_with(|| a.key().cmp(&b.key()))
        });
        sorted
    }

    /// Results merged across thread caps, keyed by pricer name.
    pub fn by_pricer(&self) -> Result<BTreeMap<String, PricerResult>, ReportError> {
        let mut merged: BTreeMap<String, PricerResult> = BTreeMap::new();
        for result in self.pricers.values() {
            let entry = match merged.remove(&result.pricer) {
                Some(existing) => existing.merge(result)?,
                None => result.clone(),
            };
            merged.insert(result.pricer.clone(), entry);
        }
        Ok(merged)
    }
}
