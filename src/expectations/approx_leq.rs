use std::ops::Range;

use arrow_array::{Array, ArrowNumericType, PrimitiveArray};
use num_traits::{NumCast, Zero};

use crate::config::ExpectationConfig;
use crate::errors::ExpectationError;
use crate::expectations::Verdict;
use crate::results::{CellValue, IntoCell, UnexpectedValue};

/// Which missing-value condition excludes a row pair from evaluation.
/// Excluded rows still count toward `element_count` and fold into the
/// satisfied side of the accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IgnoreRowIf {
    BothValuesAreMissing,
    EitherValueIsMissing,
    #[default]
    Neither,
}

impl IgnoreRowIf {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "both_values_are_missing" => Some(IgnoreRowIf::BothValuesAreMissing),
            "either_value_is_missing" => Some(IgnoreRowIf::EitherValueIsMissing),
            "neither" => Some(IgnoreRowIf::Neither),
            _ => None,
        }
    }
}

/// Comparison against a bound widened by an additive margin, safe at the
/// numeric extremes.
pub(crate) trait MarginOrd: Sized {
    fn within_margin(self, bound: Self, margin: Self) -> bool;
}

impl MarginOrd for i64 {
    fn within_margin(self, bound: i64, margin: i64) -> bool {
        match bound.checked_add(margin) {
            Some(limit) => self <= limit,
            // the true limit is out of i64 range on the margin's side
            None => margin > 0,
        }
    }
}

impl MarginOrd for f64 {
    fn within_margin(self, bound: f64, margin: f64) -> bool {
        self <= bound + margin
    }
}

/// Column-pair condition: satisfied iff `a <= b + n_approximate`.
#[derive(Debug)]
pub struct ApproxLeq {
    pub(crate) column_a: String,
    pub(crate) column_b: String,
    pub(crate) n_approximate: i64,
    pub(crate) ignore_row_if: IgnoreRowIf,
}

impl ApproxLeq {
    pub(crate) fn from_config(config: &ExpectationConfig) -> Result<Self, ExpectationError> {
        // n_approximate defaults to 0 when absent
        let n_approximate = config.integer_kwarg("n_approximate")?.unwrap_or(0);
        let ignore_row_if = match config.string_kwarg("ignore_row_if")? {
            None => IgnoreRowIf::default(),
            Some(raw) => IgnoreRowIf::parse(raw).ok_or_else(|| {
                config.config_error(format!("unknown ignore_row_if policy '{}'", raw))
            })?,
        };
        Ok(Self {
            column_a: config.columns[0].clone(),
            column_b: config.columns[1].clone(),
            n_approximate,
            ignore_row_if,
        })
    }

    /// Evaluate one row chunk, generic over the numeric column type.
    pub(crate) fn evaluate_rows<T>(
        &self,
        a: &PrimitiveArray<T>,
        b: &PrimitiveArray<T>,
        rows: Range<usize>,
    ) -> Vec<Verdict>
    where
        T: ArrowNumericType,
        T::Native: NumCast + Zero + MarginOrd + Copy + IntoCell,
    {
        let approx: T::Native = NumCast::from(self.n_approximate).unwrap_or_else(T::Native::zero);
        rows.map(|i| {
            let lhs = (!a.is_null(i)).then(|| a.value(i));
            let rhs = (!b.is_null(i)).then(|| b.value(i));
            match (lhs, rhs) {
                (Some(x), Some(y)) => {
                    if x.within_margin(y, approx) {
                        Verdict::Satisfied
                    } else {
                        Verdict::Unsatisfied(UnexpectedValue::Pair(x.into_cell(), y.into_cell()))
                    }
                }
                (None, None) => match self.ignore_row_if {
                    IgnoreRowIf::Neither => Verdict::Unsatisfied(UnexpectedValue::Pair(
                        CellValue::Null,
                        CellValue::Null,
                    )),
                    _ => Verdict::Ignored,
                },
                (lhs, rhs) => match self.ignore_row_if {
                    IgnoreRowIf::EitherValueIsMissing => Verdict::Ignored,
                    _ => Verdict::Unsatisfied(UnexpectedValue::Pair(
                        cell_or_null(lhs),
                        cell_or_null(rhs),
                    )),
                },
            }
        })
        .collect()
    }
}

fn cell_or_null<N: IntoCell>(value: Option<N>) -> CellValue {
    value.map(IntoCell::into_cell).unwrap_or(CellValue::Null)
}
