//! Configuration management for gridperf

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

impl Config {
    /// Get the config file path (~/.config/gridperf/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from a specific file, or return defaults if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Report extension with a leading dot (`.html`)
    pub fn report_extension(&self) -> String {
        let ext = self.report.extension.trim().trim_start_matches('.');
        format!(".{}", ext)
    }
}
