use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};

use crate::errors::ExpectationError;

/// An immutable, read-only tabular dataset evaluated as a unit.
///
/// Wraps an Arrow `RecordBatch` and exposes only named-column lookup and the
/// row count. The engine never mutates a batch; evaluation over independent
/// row chunks shares it freely across threads.
#[derive(Debug, Clone)]
pub struct Batch {
    inner: Arc<RecordBatch>,
}

impl Batch {
    pub fn new(batch: RecordBatch) -> Self {
        Self {
            inner: Arc::new(batch),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.inner.num_rows()
    }

    /// Look up a column by name.
    ///
    /// Returns `ExpectationError::ColumnNotFound` when the batch schema has
    /// no such column. This is the structural check evaluators rely on:
    /// past this point, per-row nullness is predicate logic, never an error.
    pub fn column(&self, name: &str) -> Result<&ArrayRef, ExpectationError> {
        let index = self
            .inner
            .schema()
            .index_of(name)
            .map_err(|_| ExpectationError::ColumnNotFound(name.to_string()))?;
        Ok(self.inner.column(index))
    }
}

impl From<RecordBatch> for Batch {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}
