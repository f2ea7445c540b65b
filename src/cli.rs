//! CLI definitions for gridperf
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so the command tree can be used for completions and tests.

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Build clap styles using our theme colors.
///
/// - Green: headers, usage, command names (accent color)
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "gridperf")]
#[command(about = "Sum up grid compute time of performance reports by pricer")]
#[command(
    long_about = "gridperf - grid performance report analysis.

Reads the HTML performance reports of distributed compute jobs, extracts
their trade groups and grid tasks, and sums up compute time by pricer.
Runs of the same job can be compared, and the phases of a day's jobs can be
drawn as a timeline.

QUICK START:
    gridperf summary 4134826_performance.html      Compute time by pricer
    gridperf summary reports.txt                   Sum up a list of reports
    gridperf compare today.txt yesterday.txt       Reduction against a baseline
    gridperf timeline reports/                     Phases of a day's jobs

Defaults are read from ~/.config/gridperf/config.toml."
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Print debug trace to stderr
    #[arg(short, long, global = true, help = "Print debug trace to stderr")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sum up grid compute time by pricer
    #[command(long_about = "Sum up the grid compute time of one or more reports by pricer.

FILE is either a performance report (ending in the configured extension,
html by default) or a text file listing one report path per line.

Pricers are printed by descending compute time, split into single threaded
(ST) and multi threaded (MT) trade groups, followed by the totals.

EXAMPLES:
    gridperf summary 4134826_performance.html
    gridperf summary reports.txt -s               Compute time in seconds
    gridperf summary run.html --top-tasks 20      First 20 completed tasks
    gridperf summary run.html --top-tasks 5 --pricer Credit.Cdx
    gridperf summary run.html --trade-group 1089  Tasks of one trade group
    gridperf summary run.html --alt-trade-groups basepv.html")]
    Summary(SummaryArgs),

    /// Compare grid compute time against a baseline run
    #[command(long_about = "Compare the grid compute time of a run against a baseline run.

Both FILE and BASELINE may be single reports or lists of reports. Results
are merged across thread caps, so a pricer that moved between single and
multi threaded execution is still compared. Rows whose trade group or task
counts differ are flagged.

EXAMPLES:
    gridperf compare today.html yesterday.html
    gridperf compare today.txt yesterday.txt --json
    gridperf compare today.html yesterday.html --baseline-alt-trade-groups basepv.html")]
    Compare(CompareArgs),

    /// Chart the phases of a day's jobs
    #[command(long_about = "Draw the phases of a set of jobs as a sequence chart.

PATH is a report, a list of reports or a directory of reports. Each job is
drawn on its own line, offset from the earliest start:

    .  queue
    -  provisioning
    =  grid compute
    _  result writing

followed by the phase spans of every job.

EXAMPLES:
    gridperf timeline reports/
    gridperf timeline reports/ --unit-minutes 10")]
    Timeline(TimelineArgs),

    /// Generate shell completions
    #[command(long_about = "Generate a shell completion script on stdout.

EXAMPLES:
    gridperf completions bash > ~/.local/share/bash-completion/completions/gridperf
    gridperf completions zsh > ~/.zfunc/_gridperf")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: CompletionShell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    /// Report or list of reports
    #[arg(help = "Performance report, or a file listing one report per line")]
    pub file: PathBuf,

    /// Print compute time in seconds
    #[arg(short, long, help = "Print compute time in seconds")]
    pub seconds: bool,

    /// Print JSON instead of text
    #[arg(long, help = "Print the results as JSON")]
    pub json: bool,

    /// Print the first N completed tasks, then stop reading reports
    #[arg(
        long,
        value_name = "N",
        help = "Print the first N completed tasks and stop reading reports"
    )]
    pub top_tasks: Option<usize>,

    /// Print the N tasks that finished last
    #[arg(
        long,
        value_name = "N",
        help = "Print the N tasks that finished last (not implemented)"
    )]
    pub finish_tasks: Option<usize>,

    /// Print the tasks of one trade group
    #[arg(long, value_name = "ID", help = "Print the tasks of this trade group")]
    pub trade_group: Option<String>,

    /// Only count tasks of this pricer towards --top-tasks
    #[arg(
        long,
        value_name = "NAME",
        requires = "top_tasks",
        help = "Only count tasks of this pricer towards --top-tasks"
    )]
    pub pricer: Option<String>,

    /// Report to take trade groups from when a report has none
    #[arg(
        long,
        value_name = "PATH",
        help = "Report to take trade groups from when a report has none"
    )]
    pub alt_trade_groups: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompareArgs {
    /// Current run
    #[arg(help = "Current run: a report or a list of reports")]
    pub file: PathBuf,

    /// Baseline run
    #[arg(help = "Baseline run: a report or a list of reports")]
    pub baseline: PathBuf,

    /// Trade group source for the current run
    #[arg(
        long,
        value_name = "PATH",
        help = "Report to take trade groups from for the current run"
    )]
    pub alt_trade_groups: Option<PathBuf>,

    /// Trade group source for the baseline run
    #[arg(
        long,
        value_name = "PATH",
        help = "Report to take trade groups from for the baseline run"
    )]
    pub baseline_alt_trade_groups: Option<PathBuf>,

    /// Print compute time in seconds
    #[arg(short, long, help = "Print compute time in seconds")]
    pub seconds: bool,

    /// Print JSON instead of text
    #[arg(long, help = "Print the comparison as JSON")]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TimelineArgs {
    /// Report, list of reports or directory
    #[arg(help = "Performance report, list of reports, or directory of reports")]
    pub path: PathBuf,

    /// Minutes per chart character
    #[arg(long, value_name = "N", help = "Minutes per chart character")]
    pub unit_minutes: Option<u32>,
}
