//! Compare command handler

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use gridperf::cli::CompareArgs;
use gridperf::report::render;
use gridperf::report::{
    compare, resolve_inputs, run_batch, Aggregate, Comparison, ExtractOptions, Extractor,
};
use gridperf::theme::current_theme;
use gridperf::Config;

use super::{alt_source, input_stem};

#[derive(Serialize)]
struct ComparisonJson<'a> {
    current: &'a str,
    baseline: &'a str,
    #[serde(flatten)]
    comparison: &'a Comparison,
}

/// Compare the run named by `args.file` against `args.baseline`.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &CompareArgs) -> Result<()> {
    let config = Config::load()?;
    let stdout = io::stdout();
    run(args, &config, &mut stdout.lock())
}

/// Comparison with an explicit config and output (for testing).
pub(crate) fn run(args: &CompareArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let theme = current_theme(config.display.color);
    let seconds = args.seconds || config.display.seconds;

    let extension = config.report_extension();
    let current_inputs = resolve_inputs(&args.file, &extension)?;
    let baseline_inputs = resolve_inputs(&args.baseline, &extension)?;

    let current = aggregate(&current_inputs, args.alt_trade_groups.as_deref())?;
    let previous = aggregate(&baseline_inputs, args.baseline_alt_trade_groups.as_deref())?;
    let comparison = compare(&current, &previous).with_context(|| {
        format!(
            "Failed to compare {} against {}",
            args.file.display(),
            args.baseline.display()
        )
    })?;

    let current_stem = input_stem(&args.file);
    let baseline_stem = input_stem(&args.baseline);
    if args.json {
        let json = ComparisonJson {
            current: &current_stem,
            baseline: &baseline_stem,
            comparison: &comparison,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        render::comparison(
            out,
            &comparison,
            &current_stem,
            &baseline_stem,
            seconds,
            &theme,
        )?;
    }
    Ok(())
}

/// Totals of every report in `inputs`.
fn aggregate(inputs: &[PathBuf], alt_trade_groups: Option<&Path>) -> Result<Aggregate> {
    let mut extractor = Extractor::new(ExtractOptions {
        alt_trade_groups: alt_source(alt_trade_groups),
        ..ExtractOptions::default()
    })?;
    let outcome = run_batch(inputs, &mut extractor, None)?;
    Ok(outcome.aggregate)
}
