//! Grid performance report tools.
//!
//! Extracts trade group and task records from grid performance reports and
//! summarises compute time per pricer, compares runs and charts job phases.

pub mod cli;
pub mod config;
pub mod report;
pub mod theme;

pub use config::Config;
pub use report::{Aggregate, Extractor, ReportError};
