//! Command handlers for the gridperf CLI.
//!
//! Each submodule handles one subcommand. The main dispatch logic remains in
//! main.rs.

pub mod compare;
pub mod completions;
pub mod summary;
pub mod timeline;

use std::path::{Path, PathBuf};

use tracing::warn;

use gridperf::report::file_stem;

/// The alternate trade group report, dropped with a warning if it does not
/// exist.
pub fn alt_source(path: Option<&Path>) -> Option<PathBuf> {
    let path = path?;
    if path.is_file() {
        Some(path.to_path_buf())
    } else {
        warn!(
            "The alternate file for trade groups does not exist: {}",
            path.display()
        );
        None
    }
}

/// File stem of an input path, as printed in headers.
pub fn input_stem(path: &Path) -> String {
    file_stem(&path.to_string_lossy()).to_string()
}
