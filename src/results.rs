use serde::Serialize;

use crate::errors::ExpectationError;

/// Maximum number of entries kept in `partial_unexpected_list` and
/// `partial_unexpected_counts`.
pub const PARTIAL_UNEXPECTED_LIMIT: usize = 20;

/// A single raw value taken verbatim from the batch.
///
/// Empty string and null are distinct categories and stay distinct through
/// grouping and display (`"EMPTY"` vs `"null"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
}

impl CellValue {
    /// Display form used in diagnostic tables.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => "null".to_string(),
            CellValue::Str(s) if s.is_empty() => "EMPTY".to_string(),
            CellValue::Str(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
        }
    }

    /// Collision-free grouping key. Tagged per variant so the string "null"
    /// never collides with an actual null cell.
    pub(crate) fn group_key(&self) -> String {
        match self {
            CellValue::Null => "n:".to_string(),
            CellValue::Str(s) => format!("s:{}", s),
            CellValue::Int(i) => format!("i:{}", i),
            CellValue::Float(f) => format!("f:{}", f),
        }
    }
}

/// Conversion from an Arrow native value into a `CellValue`.
pub(crate) trait IntoCell {
    fn into_cell(self) -> CellValue;
}

impl IntoCell for i64 {
    fn into_cell(self) -> CellValue {
        CellValue::Int(self)
    }
}

impl IntoCell for f64 {
    fn into_cell(self) -> CellValue {
        CellValue::Float(self)
    }
}

/// The value(s) a row contributed when it failed its predicate.
///
/// `Single` and `Pair` values can be grouped and counted; `Row` values
/// (multicolumn composites) are reported sample-only. This is the
/// well-typed "not groupable" outcome: the aggregator degrades explicitly
/// instead of sniffing error messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnexpectedValue {
    Single(CellValue),
    Pair(CellValue, CellValue),
    Row(Vec<CellValue>),
}

impl UnexpectedValue {
    pub(crate) fn groupable(&self) -> bool {
        !matches!(self, UnexpectedValue::Row(_))
    }

    pub(crate) fn group_key(&self) -> String {
        match self {
            UnexpectedValue::Single(value) => value.group_key(),
            UnexpectedValue::Pair(a, b) => format!("{}|{}", a.group_key(), b.group_key()),
            UnexpectedValue::Row(values) => values
                .iter()
                .map(|v| v.group_key())
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

/// One distinct unexpected value and its occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnexpectedCount {
    pub value: UnexpectedValue,
    pub count: usize,
}

/// The aggregated outcome of evaluating one expectation over one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ResultSummary {
    pub element_count: usize,
    pub unexpected_count: usize,
    pub unexpected_percent: Option<f64>,
    /// First `PARTIAL_UNEXPECTED_LIMIT` unsatisfied values in row order,
    /// duplicates kept.
    pub partial_unexpected_list: Vec<UnexpectedValue>,
    /// Grouped occurrence counts, ordered by count descending (ties keep
    /// first-seen order). `None` when the values are not groupable.
    pub partial_unexpected_counts: Option<Vec<UnexpectedCount>>,
}

impl ResultSummary {
    /// Whether the grouped counts account for the full unexpected
    /// population. When true the renderer shows counts; otherwise only a
    /// deduplicated sample is shown.
    pub fn counted_mode(&self) -> bool {
        match &self.partial_unexpected_counts {
            Some(counts) => {
                counts.iter().map(|c| c.count).sum::<usize>() == self.unexpected_count
            }
            None => false,
        }
    }
}

/// Recorded evaluation error when an expectation runs with
/// `catch_exceptions=true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionInfo {
    pub raised_exception: bool,
    pub exception_message: String,
}

/// Result of evaluating one expectation against one batch.
///
/// Immutable once produced; evaluating the same expectation on the same
/// batch twice yields identical results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub success: bool,
    pub expectation: String,
    pub result: ResultSummary,
    pub exception_info: Option<ExceptionInfo>,
}

impl ValidationResult {
    /// Build a result from an aggregated summary, applying the `mostly`
    /// tolerance: an empty batch always succeeds, otherwise the satisfied
    /// fraction must reach `mostly`.
    pub fn from_summary(expectation: String, summary: ResultSummary, mostly: f64) -> Self {
        let success = summary.element_count == 0
            || (summary.element_count - summary.unexpected_count) as f64
                / summary.element_count as f64
                >= mostly;
        Self {
            success,
            expectation,
            result: summary,
            exception_info: None,
        }
    }

    /// Build a failed result carrying a recorded evaluation error.
    pub fn from_error(expectation: String, error: &ExpectationError) -> Self {
        Self {
            success: false,
            expectation,
            result: ResultSummary::default(),
            exception_info: Some(ExceptionInfo {
                raised_exception: true,
                exception_message: error.to_string(),
            }),
        }
    }
}
