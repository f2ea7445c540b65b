//! Errors raised while extracting, aggregating or comparing reports.

use std::path::PathBuf;

/// Maximum number of characters of offending text kept in an error message.
const MAX_FRAGMENT_LEN: usize = 160;

/// Errors that can occur while processing performance reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The document's list nesting diverged from the report grammar.
    #[error("Structural error at {path}: {message}")]
    Structure { path: String, message: String },

    /// A mandatory record did not match any of its grammars.
    #[error("Unrecognized {kind}: {text}")]
    Unrecognized { kind: &'static str, text: String },

    /// The markup itself could not be scanned.
    #[error("Malformed markup at byte {offset}: {message}")]
    Markup { offset: usize, message: String },

    /// A document or list file cannot be used as input.
    #[error("{message}: {}", path.display())]
    Input { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The baseline of a comparison row took no time at all.
    #[error("Cannot compare {pricer}: baseline compute time is zero")]
    ZeroBaseline { pricer: String },

    #[error("Cannot merge results of different pricers ({left} and {right})")]
    PricerMismatch { left: String, right: String },

    #[error("Timeline error: {message}")]
    Timeline { message: String },

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl ReportError {
    pub(crate) fn structure(path: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::Structure {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn unrecognized(kind: &'static str, text: &str) -> Self {
        ReportError::Unrecognized {
            kind,
            text: truncate_fragment(text),
        }
    }

    pub(crate) fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ReportError::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the document being extracted.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ReportError::Structure { .. }
                | ReportError::Unrecognized { .. }
                | ReportError::Markup { .. }
        )
    }
}

/// Trim and shorten a text fragment for display.
pub(crate) fn truncate_fragment(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_FRAGMENT_LEN {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX_FRAGMENT_LEN).collect();
        format!("{}...", head)
    }
}
