//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print compute times as seconds instead of `[dd.hh:mm:ss]`
    #[serde(default)]
    pub seconds: bool,
    /// Color headers and warnings (also off when NO_COLOR is set)
    #[serde(default = "default_color")]
    pub color: bool,
}

pub fn default_color() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            seconds: false,
            color: default_color(),
        }
    }
}

/// Report input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Extension that marks a path as a report rather than a list of reports
    #[serde(default = "default_extension")]
    pub extension: String,
}

pub fn default_extension() -> String {
    "html".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

/// Timeline chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Minutes per chart character
    #[serde(default = "default_unit_minutes")]
    pub unit_minutes: u32,
}

pub fn default_unit_minutes() -> u32 {
    5
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            unit_minutes: default_unit_minutes(),
        }
    }
}
