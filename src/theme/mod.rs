//! Colors for CLI output.
//!
//! Report output is plain text; the theme only wraps headers and warnings in
//! ANSI color codes. Color is off when disabled in the config or when the
//! `NO_COLOR` environment variable is set.

pub mod cli;

pub use cli::ansi;
pub use cli::ANSI_RESET;

/// Theme configuration for CLI output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Secondary/dimmed text color
    pub text_secondary: &'static str,
    /// Accent color for headers and totals
    pub accent: &'static str,
    /// Error/warning color
    pub error: &'static str,
    /// Whether any color codes are emitted
    pub enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

impl Theme {
    /// Green headers, red warnings.
    pub fn standard() -> Self {
        Self {
            text_secondary: ansi::DARK_GRAY,
            accent: ansi::GREEN,
            error: ansi::RED,
            enabled: true,
        }
    }

    /// No color at all.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::standard()
        }
    }
}

/// Theme for this process: standard unless `color` is off or `NO_COLOR` is set.
pub fn current_theme(color: bool) -> Theme {
    if color && std::env::var_os("NO_COLOR").is_none() {
        Theme::standard()
    } else {
        Theme::plain()
    }
}
