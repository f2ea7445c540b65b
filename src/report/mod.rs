//! Extraction and aggregation of grid performance reports.
//!
//! A performance report is an HTML document of nested unordered lists that
//! describes one distributed compute job: the job header, its trade groups
//! and the grid tasks that computed them. The pipeline reads it in a single
//! streaming pass:
//!
//! - [`scanner`] - element, text and comment events without a parse tree
//! - [`path`] - which section of the list hierarchy the scanner is in
//! - [`recognizer`] - the patterns for every record line
//! - [`engine`] - drives the above and produces one [`Extraction`] per document
//! - [`aggregate`] and [`compare`] - per-pricer totals and run comparison
//! - [`timeline`] - job phase spans and the sequence chart
//! - [`batch`] - input resolution and the document loop
//! - [`render`] - text output

pub mod aggregate;
pub mod batch;
pub mod compare;
pub mod duration;
pub mod engine;
pub mod error;
pub mod model;
pub mod path;
pub mod recognizer;
pub mod render;
pub mod scanner;
pub mod timeline;

pub use aggregate::{Aggregate, PricerResult};
pub use batch::{
    file_stem, resolve_inputs, resolve_timeline_inputs, run_batch, run_timeline_batch, BatchError,
    BatchOutcome,
};
pub use compare::{compare, Comparison, ComparisonRow};
pub use duration::Duration;
pub use engine::{ExtractOptions, Extractor, Scope, TaskLimit};
pub use error::ReportError;
pub use model::{Extraction, Record, ShownTask, Task, TradeGroup};
pub use timeline::{JobTimeline, PatchedTimeline};
