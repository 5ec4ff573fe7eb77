//! Chunked, parallel expectation evaluation and result aggregation.

pub(crate) mod aggregator;
pub(crate) mod evaluation;

pub use evaluation::evaluate;
