//! Declarative data-quality checks over Arrow record batches.
//!
//! An [`ExpectationConfig`] describes a check on one or more columns; compiling
//! it yields an [`Expectation`] that evaluates every row of a [`Batch`] in
//! parallel and reports per-expectation results with unexpected-value samples
//! and counts. [`Checkpoint`] runs a whole [`ExpectationSuite`] against a batch
//! and dispatches results to [`Action`]s.

pub mod batch;
pub mod checkpoint;
pub mod config;
pub mod engine;
pub mod errors;
pub mod expectations;
pub mod render;
pub mod report;
pub mod results;
pub mod suite;
pub mod utils;

pub use batch::Batch;
pub use checkpoint::{Action, Checkpoint, CheckpointResult, MemoryValidationStore, RunId};
pub use config::{ExpectationConfig, ExpectationKind};
pub use errors::ExpectationError;
pub use expectations::{Expectation, IgnoreRowIf};
pub use render::RenderedContent;
pub use results::{
    CellValue, ResultSummary, UnexpectedCount, UnexpectedValue, ValidationResult,
    PARTIAL_UNEXPECTED_LIMIT,
};
pub use suite::ExpectationSuite;
