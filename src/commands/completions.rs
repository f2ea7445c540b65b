//! Completions command handler

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io::{self, Write};

/// Write the completion script for `shell` to stdout.
#[cfg(not(tarpaulin_include))]
pub fn handle<C: CommandFactory>(shell: CompletionShell) -> Result<()> {
    let stdout = io::stdout();
    generate_completions::<C>(shell, &mut stdout.lock())
}

/// Generate shell completion script.
pub(crate) fn generate_completions<C: CommandFactory>(
    shell: CompletionShell,
    out: &mut impl Write,
) -> Result<()> {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "gridperf", out);
    Ok(())
}
