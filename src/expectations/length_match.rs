use std::ops::Range;

use arrow::array::{Array, StringArray};

use crate::config::ExpectationConfig;
use crate::errors::ExpectationError;
use crate::expectations::Verdict;
use crate::results::{CellValue, UnexpectedValue};

/// Column-map condition: a value is satisfied iff it is non-null and its
/// length equals the `length` parameter.
#[derive(Debug)]
pub struct LengthMatch {
    pub(crate) column: String,
    pub(crate) length: usize,
}

impl LengthMatch {
    pub(crate) fn from_config(config: &ExpectationConfig) -> Result<Self, ExpectationError> {
        let length = config
            .integer_kwarg("length")?
            .ok_or_else(|| config.config_error("length parameter must be set"))?;
        if length < 0 {
            return Err(config.config_error("length must be a non-negative integer"));
        }
        Ok(Self {
            column: config.columns[0].clone(),
            length: length as usize,
        })
    }

    /// Evaluate one row chunk. Length is the character count, not the byte
    /// count, so multi-byte values judge the same as their ASCII peers.
    pub(crate) fn evaluate_rows(&self, values: &StringArray, rows: Range<usize>) -> Vec<Verdict> {
        rows.map(|i| {
            if values.is_null(i) {
                Verdict::Unsatisfied(UnexpectedValue::Single(CellValue::Null))
            } else {
                let value = values.value(i);
                if value.chars().count() == self.length {
                    Verdict::Satisfied
                } else {
                    Verdict::Unsatisfied(UnexpectedValue::Single(CellValue::Str(
                        value.to_string(),
                    )))
                }
            }
        })
        .collect()
    }
}
