//! Summary command handler

use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use gridperf::cli::SummaryArgs;
use gridperf::report::render;
use gridperf::report::{
    resolve_inputs, run_batch, Aggregate, BatchOutcome, ExtractOptions, Extractor, Scope,
    ShownTask, TaskLimit,
};
use gridperf::theme::{current_theme, Theme};
use gridperf::Config;

use super::{alt_source, input_stem};

/// JSON form of a summary.
#[derive(Serialize)]
struct SummaryJson<'a> {
    input: &'a str,
    documents: usize,
    stopped: bool,
    aggregate: &'a Aggregate,
    tasks: &'a [ShownTask],
    trade_group_tasks: &'a [ShownTask],
}

/// Sum up the compute time of the reports named by `args.file`.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &SummaryArgs) -> Result<()> {
    let config = Config::load()?;
    let stdout = io::stdout();
    run(args, &config, &mut stdout.lock())
}

/// Summary with an explicit config and output (for testing).
pub(crate) fn run(args: &SummaryArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let theme = current_theme(config.display.color);
    let seconds = args.seconds || config.display.seconds;
    let stem = input_stem(&args.file);

    if args.finish_tasks.is_some() {
        warn!("--finish-tasks is not implemented; ignoring it");
    }

    let inputs = resolve_inputs(&args.file, &config.report_extension())?;
    if inputs.is_empty() {
        warn!("No performance reports found in {}", args.file.display());
    }

    let mut extractor = Extractor::new(ExtractOptions {
        scope: Scope::Tasks,
        alt_trade_groups: alt_source(args.alt_trade_groups.as_deref()),
        limit: args
            .top_tasks
            .map(|count| TaskLimit::new(count, args.pricer.clone())),
    })?;

    let outcome = match run_batch(&inputs, &mut extractor, args.trade_group.as_deref()) {
        Ok(outcome) => outcome,
        Err(err) => {
            if err.partial.documents > 0 {
                warn!(
                    "Printing the summary of the {} reports read before the failure",
                    err.partial.documents
                );
                write_summary(out, args, &stem, &err.partial, seconds, &theme)?;
            }
            return Err(err.into());
        }
    };

    if outcome.stopped {
        info!(
            "Read {} of {} reports before reaching the task limit",
            outcome.documents,
            inputs.len()
        );
    }
    write_summary(out, args, &stem, &outcome, seconds, &theme)
}

fn write_summary(
    out: &mut impl Write,
    args: &SummaryArgs,
    stem: &str,
    outcome: &BatchOutcome,
    seconds: bool,
    theme: &Theme,
) -> Result<()> {
    if args.json {
        let json = SummaryJson {
            input: stem,
            documents: outcome.documents,
            stopped: outcome.stopped,
            aggregate: &outcome.aggregate,
            tasks: &outcome.shown,
            trade_group_tasks: &outcome.trade_group_tasks,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        return Ok(());
    }

    if !outcome.shown.is_empty() {
        render::task_listing(out, &outcome.shown, seconds)?;
    }
    if let Some(id) = &args.trade_group {
        if outcome.trade_group_tasks.is_empty() {
            warn!("Trade group {} has no tasks in the reports read", id);
        } else {
            render::task_listing(out, &outcome.trade_group_tasks, seconds)?;
        }
    }
    render::summary(out, &outcome.aggregate, stem, seconds, theme)?;
    Ok(())
}
