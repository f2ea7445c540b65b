//! gridperf - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use gridperf::cli::{Cli, Commands};

/// Log to stderr, `warn` and above unless RUST_LOG says otherwise.
///
/// `--debug` raises gridperf's own events to `debug`.
fn init_logging(debug: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();
    if debug {
        if let Ok(directive) = "gridperf=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::Summary(args) => commands::summary::handle(&args),
        Commands::Compare(args) => commands::compare::handle(&args),
        Commands::Timeline(args) => commands::timeline::handle(&args),
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}
