//! Binds an expectation's columns to a batch and evaluates row chunks in
//! parallel.
//!
//! Binding resolves and type-checks every column once, before any chunk is
//! scheduled, so the parallel phase cannot fail: conditions are pure and
//! chunks share nothing mutable.

use std::ops::Range;

use arrow::array::{Float64Array, Int64Array, StringArray};
use rayon::prelude::*;

use crate::batch::Batch;
use crate::engine::aggregator::{PartitionOutcome, merge_partitions};
use crate::errors::ExpectationError;
use crate::expectations::{ApproxLeq, Condition, Expectation, IdentityRule, LengthMatch, Verdict};
use crate::results::ResultSummary;

/// Rows per evaluation partition. Partition boundaries define the
/// deterministic sample merge order: (partition index, in-partition offset).
pub(crate) const CHUNK_SIZE: usize = 8192;

/// An expectation with its columns resolved and type-checked against one
/// batch.
enum BoundCondition<'a> {
    LengthMatch {
        rule: &'a LengthMatch,
        values: &'a StringArray,
    },
    ApproxLeqInt {
        rule: &'a ApproxLeq,
        a: &'a Int64Array,
        b: &'a Int64Array,
    },
    ApproxLeqFloat {
        rule: &'a ApproxLeq,
        a: &'a Float64Array,
        b: &'a Float64Array,
    },
    Identity {
        rule: &'a IdentityRule,
        customer: &'a StringArray,
        user: &'a StringArray,
        device: &'a StringArray,
    },
}

impl BoundCondition<'_> {
    fn evaluate_rows(&self, rows: Range<usize>) -> Vec<Verdict> {
        match self {
            BoundCondition::LengthMatch { rule, values } => rule.evaluate_rows(values, rows),
            BoundCondition::ApproxLeqInt { rule, a, b } => rule.evaluate_rows(*a, *b, rows),
            BoundCondition::ApproxLeqFloat { rule, a, b } => rule.evaluate_rows(*a, *b, rows),
            BoundCondition::Identity {
                rule,
                customer,
                user,
                device,
            } => rule.evaluate_rows(customer, user, device, rows),
        }
    }
}

fn string_column<'a>(batch: &'a Batch, name: &str) -> Result<&'a StringArray, ExpectationError> {
    batch
        .column(name)?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| ExpectationError::TypeCastError(name.to_string(), "Utf8".to_string()))
}

fn bind<'a>(
    expectation: &'a Expectation,
    batch: &'a Batch,
) -> Result<BoundCondition<'a>, ExpectationError> {
    match &expectation.condition {
        Condition::LengthMatch(rule) => Ok(BoundCondition::LengthMatch {
            rule,
            values: string_column(batch, &rule.column)?,
        }),
        Condition::ApproxLeq(rule) => {
            let a = batch.column(&rule.column_a)?;
            let b = batch.column(&rule.column_b)?;
            if let (Some(a), Some(b)) = (
                a.as_any().downcast_ref::<Int64Array>(),
                b.as_any().downcast_ref::<Int64Array>(),
            ) {
                Ok(BoundCondition::ApproxLeqInt { rule, a, b })
            } else if let (Some(a), Some(b)) = (
                a.as_any().downcast_ref::<Float64Array>(),
                b.as_any().downcast_ref::<Float64Array>(),
            ) {
                Ok(BoundCondition::ApproxLeqFloat { rule, a, b })
            } else {
                Err(ExpectationError::TypeCastError(
                    format!("{} | {}", rule.column_a, rule.column_b),
                    "Int64 or Float64".to_string(),
                ))
            }
        }
        Condition::Identity(rule) => Ok(BoundCondition::Identity {
            rule,
            customer: string_column(batch, &rule.columns[0])?,
            user: string_column(batch, &rule.columns[1])?,
            device: string_column(batch, &rule.columns[2])?,
        }),
    }
}

fn row_chunks(num_rows: usize, chunk_size: usize) -> Vec<Range<usize>> {
    (0..num_rows)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(num_rows))
        .collect()
}

/// Evaluate one expectation against one batch.
///
/// Structural problems (missing column, wrong column type) surface as
/// errors here, before any row is read; per-row outcomes are aggregated
/// into a `ResultSummary` with a deterministic partition merge.
pub fn evaluate(
    expectation: &Expectation,
    batch: &Batch,
) -> Result<ResultSummary, ExpectationError> {
    let bound = bind(expectation, batch)?;
    let partitions: Vec<PartitionOutcome> = row_chunks(batch.num_rows(), CHUNK_SIZE)
        .into_par_iter()
        .enumerate()
        .map(|(index, rows)| PartitionOutcome::collect(index, bound.evaluate_rows(rows)))
        .collect();
    Ok(merge_partitions(partitions))
}
