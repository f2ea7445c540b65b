//! Timeline command handler

use std::io::{self, Write};

use anyhow::Result;
use tracing::warn;

use gridperf::cli::TimelineArgs;
use gridperf::report::render;
use gridperf::report::{
    resolve_timeline_inputs, run_timeline_batch, ExtractOptions, Extractor, PatchedTimeline,
    Scope,
};
use gridperf::theme::current_theme;
use gridperf::Config;

/// Chart the phases of the jobs named by `args.path`.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &TimelineArgs) -> Result<()> {
    let config = Config::load()?;
    let stdout = io::stdout();
    run(args, &config, &mut stdout.lock())
}

/// Timeline with an explicit config and output (for testing).
pub(crate) fn run(args: &TimelineArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let theme = current_theme(config.display.color);
    let unit_minutes = args
        .unit_minutes
        .unwrap_or(config.timeline.unit_minutes)
        .max(1);

    let inputs = resolve_timeline_inputs(&args.path, &config.report_extension())?;
    let mut extractor = Extractor::new(ExtractOptions::with_scope(Scope::Timeline))?;
    let timelines = run_timeline_batch(&inputs, &mut extractor)?;

    let mut patched: Vec<PatchedTimeline> = Vec::with_capacity(timelines.len());
    for timeline in &timelines {
        if timeline.is_patchable() {
            patched.push(timeline.patched()?);
        } else {
            warn!(
                "Job {} {} has no job span; leaving it out of the chart",
                timeline.id, timeline.name
            );
        }
    }

    render::timeline(out, &timelines, &patched, unit_minutes, &theme)?;
    Ok(())
}
