//! Text output of summaries, task listings, comparisons and timelines.
//!
//! Every function writes complete `\n`-terminated lines to `out`.

use std::io::{self, Write};

use super::aggregate::Aggregate;
use super::compare::{Comparison, ComparisonRow};
use super::duration::{group_thousands, Duration};
use super::model::{threading_label, ShownTask, Span};
use super::timeline::{chart, JobTimeline, PatchedTimeline};
use crate::theme::Theme;

/// Note appended to comparison rows whose task counts differ.
pub const MISMATCH_NOTE: &str = "ERROR: tasks in perf reports don't match.";

const RULE: &str = "-------------------------------------------------------------------";

fn grid_time(duration: Duration, seconds: bool, width: usize) -> String {
    if seconds {
        format!("{:>width$}", group_thousands(duration.to_seconds()))
    } else {
        duration.to_string()
    }
}

/// One completed task with its trade group attributes.
pub fn task_line(shown: &ShownTask, seconds: bool) -> String {
    let task = &shown.task;
    format!(
        "{:<40}  {:>2} grid {}    group {:<4}  positions {:<4}  paths {:^7}  {:<7}  [ {} - {} ]",
        shown.pricer,
        threading_label(shown.cap_threads),
        grid_time(task.compute_time, seconds, 7),
        shown.trade_group_id,
        shown.num_positions,
        task.paths,
        task.status,
        task.start.as_deref().unwrap_or(""),
        task.finish.as_deref().unwrap_or(""),
    )
}

/// Task lines preceded by a blank line.
pub fn task_listing(out: &mut impl Write, tasks: &[ShownTask], seconds: bool) -> io::Result<()> {
    writeln!(out)?;
    for shown in tasks {
        writeln!(out, "{}", task_line(shown, seconds))?;
    }
    Ok(())
}

/// Pricer table by descending compute time, then the ST/MT totals.
pub fn summary(
    out: &mut impl Write,
    aggregate: &Aggregate,
    input_stem: &str,
    seconds: bool,
    theme: &Theme,
) -> io::Result<()> {
    let sorted = aggregate.sorted_pricers();
    let width = sorted.iter().map(|r| r.pricer.chars().count()).max().unwrap_or(0) + 4;

    writeln!(out)?;
    for result in &sorted {
        writeln!(
            out,
            "{:<width$}  {:>2} grid {}   groups {:<4}  tasks {:<4}",
            result.pricer,
            result.threading(),
            grid_time(result.compute_time, seconds, 10),
            result.num_tradegroups,
            result.num_tasks,
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", theme.accent_text(&format!("Summary: {} ", input_stem)))?;
    writeln!(
        out,
        "Number of tasks ST:MT is  {} : {}",
        aggregate.num_st_tasks, aggregate.num_mt_tasks
    )?;
    if seconds {
        writeln!(
            out,
            "Compute time ST:MT is    {:>10} : {:<10}",
            group_thousands(aggregate.st_duration.to_seconds()),
            group_thousands(aggregate.mt_duration.to_seconds()),
        )
    } else {
        writeln!(
            out,
            "Compute time ST:MT is    {} : {}",
            aggregate.st_duration, aggregate.mt_duration
        )
    }
}

/// Reduction table of `current_stem` against the baseline `previous_stem`.
pub fn comparison(
    out: &mut impl Write,
    comparison: &Comparison,
    current_stem: &str,
    previous_stem: &str,
    seconds: bool,
    theme: &Theme,
) -> io::Result<()> {
    let width = comparison
        .rows
        .iter()
        .map(|r| r.pricer.chars().count())
        .max()
        .unwrap_or(0)
        + 4;

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        theme.accent_text(&format!(
            "Grid Compute time reduction for {} compared to {}",
            current_stem, previous_stem
        ))
    )?;
    writeln!(out)?;

    let line = |out: &mut dyn Write, row: &ComparisonRow| -> io::Result<()> {
        let note = if row.comparable {
            String::new()
        } else {
            theme.error_text(MISMATCH_NOTE)
        };
        writeln!(
            out,
            "{:<width$}  grid {} compared to {}   reduction {:>3}% {}",
            row.pricer,
            grid_time(row.current, seconds, 10),
            grid_time(row.previous, seconds, 10),
            row.reduction,
            note
        )
    };
    for row in &comparison.rows {
        line(&mut *out, row)?;
    }
    writeln!(out, "{}", RULE)?;
    line(&mut *out, &comparison.total)
}

fn span_text(span: Option<Span>) -> String {
    match span {
        Some(span) => format!("[ {} - {} ]", span.start, span.end),
        None => "[ - ]".to_string(),
    }
}

/// Sequence chart of the patched timelines, then every job's phases.
pub fn timeline(
    out: &mut impl Write,
    timelines: &[JobTimeline],
    patched: &[PatchedTimeline],
    unit_minutes: u32,
    theme: &Theme,
) -> io::Result<()> {
    for line in chart(patched, unit_minutes) {
        writeln!(out, "{}", line)?;
    }
    if !patched.is_empty() {
        writeln!(
            out,
            "{}",
            theme.secondary_text(&format!(
                "(one character is {} minutes: . queue  - provisioning  = compute  _ result write)",
                unit_minutes
            ))
        )?;
        writeln!(out)?;
    }

    for job in timelines {
        writeln!(out, "{}", theme.accent_text(&format!("{} {} {}", job.id, job.name, job.status)))?;
        writeln!(out, "job:          {}", span_text(job.job))?;
        writeln!(out, "provision:    {}", span_text(job.provisioning))?;
        writeln!(out, "compute:      {}", span_text(job.compute))?;
        writeln!(out, "resultwrite:  {}", span_text(job.result_write))?;
        writeln!(out)?;
    }
    Ok(())
}
