//! Reduces per-row verdicts into a `ResultSummary`.
//!
//! Each evaluation partition produces a `PartitionOutcome`; the merge is
//! commutative and associative over counts and runs in ascending partition
//! index, so the first-K sample is deterministic regardless of how chunks
//! were scheduled.

use std::collections::HashMap;

use crate::expectations::Verdict;
use crate::results::{
    PARTIAL_UNEXPECTED_LIMIT, ResultSummary, UnexpectedCount, UnexpectedValue,
};
use crate::utils::hasher::Xxh3Builder;

/// Grouped occurrence counts in first-seen order, or an explicit
/// "not groupable" outcome (composite row values).
#[derive(Debug)]
pub(crate) enum GroupedCounts {
    Grouped(Vec<GroupEntry>),
    NotGroupable,
}

#[derive(Debug)]
pub(crate) struct GroupEntry {
    pub(crate) value: UnexpectedValue,
    pub(crate) count: usize,
}

/// Aggregation of one evaluation partition.
#[derive(Debug)]
pub(crate) struct PartitionOutcome {
    pub(crate) index: usize,
    pub(crate) element_count: usize,
    pub(crate) unexpected_count: usize,
    /// First `PARTIAL_UNEXPECTED_LIMIT` unsatisfied values, in row order
    pub(crate) samples: Vec<UnexpectedValue>,
    pub(crate) counts: GroupedCounts,
}

impl PartitionOutcome {
    pub(crate) fn collect(index: usize, verdicts: Vec<Verdict>) -> Self {
        let element_count = verdicts.len();
        let mut unexpected_count = 0;
        let mut samples = Vec::new();
        let mut entries: Vec<GroupEntry> = Vec::new();
        let mut keys: HashMap<String, usize, Xxh3Builder> = HashMap::with_hasher(Xxh3Builder);
        let mut groupable = true;

        for verdict in verdicts {
            let value = match verdict {
                Verdict::Satisfied | Verdict::Ignored => continue,
                Verdict::Unsatisfied(value) => value,
            };
            unexpected_count += 1;
            if samples.len() < PARTIAL_UNEXPECTED_LIMIT {
                samples.push(value.clone());
            }
            if !groupable {
                continue;
            }
            if !value.groupable() {
                // Composite values degrade the whole partition to
                // sample-only reporting, explicitly, never by dropping data
                groupable = false;
                entries.clear();
                keys.clear();
                continue;
            }
            match keys.get(&value.group_key()) {
                Some(&at) => entries[at].count += 1,
                None => {
                    keys.insert(value.group_key(), entries.len());
                    entries.push(GroupEntry { value, count: 1 });
                }
            }
        }

        let counts = if groupable {
            GroupedCounts::Grouped(entries)
        } else {
            GroupedCounts::NotGroupable
        };
        Self {
            index,
            element_count,
            unexpected_count,
            samples,
            counts,
        }
    }
}

/// Merge partition outcomes into the final summary.
///
/// Counts add per key; the sample keeps the first
/// `PARTIAL_UNEXPECTED_LIMIT` values in (partition index, row offset)
/// order. When the distinct-value count exceeds the limit, only the most
/// frequent entries are kept (ties keep first-seen order) and the result
/// drops out of counted mode.
pub(crate) fn merge_partitions(mut partitions: Vec<PartitionOutcome>) -> ResultSummary {
    partitions.sort_by_key(|p| p.index);

    let mut element_count = 0;
    let mut unexpected_count = 0;
    let mut samples = Vec::new();
    let mut entries: Vec<GroupEntry> = Vec::new();
    let mut keys: HashMap<String, usize, Xxh3Builder> = HashMap::with_hasher(Xxh3Builder);
    let mut groupable = true;

    for partition in partitions {
        element_count += partition.element_count;
        unexpected_count += partition.unexpected_count;
        for value in partition.samples {
            if samples.len() < PARTIAL_UNEXPECTED_LIMIT {
                samples.push(value);
            }
        }
        if !groupable {
            continue;
        }
        match partition.counts {
            GroupedCounts::NotGroupable => {
                groupable = false;
                entries.clear();
                keys.clear();
            }
            GroupedCounts::Grouped(partial) => {
                for entry in partial {
                    match keys.get(&entry.value.group_key()) {
                        Some(&at) => entries[at].count += entry.count,
                        None => {
                            keys.insert(entry.value.group_key(), entries.len());
                            entries.push(entry);
                        }
                    }
                }
            }
        }
    }

    let partial_unexpected_counts = if groupable {
        // Most frequent first; sort is stable so ties keep first-seen order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(PARTIAL_UNEXPECTED_LIMIT);
        Some(
            entries
                .into_iter()
                .map(|e| UnexpectedCount {
                    value: e.value,
                    count: e.count,
                })
                .collect(),
        )
    } else {
        None
    };

    let unexpected_percent = if element_count == 0 {
        None
    } else {
        Some(unexpected_count as f64 / element_count as f64 * 100.0)
    };

    ResultSummary {
        element_count,
        unexpected_count,
        unexpected_percent,
        partial_unexpected_list: samples,
        partial_unexpected_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::CellValue;

    fn unsat(s: &str) -> Verdict {
        Verdict::Unsatisfied(UnexpectedValue::Single(CellValue::Str(s.to_string())))
    }

    #[test]
    fn test_collect_counts_and_samples() {
        let verdicts = vec![unsat("x"), Verdict::Satisfied, unsat("x"), unsat("y")];
        let outcome = PartitionOutcome::collect(0, verdicts);
        assert_eq!(outcome.element_count, 4);
        assert_eq!(outcome.unexpected_count, 3);
        assert_eq!(outcome.samples.len(), 3);
        match &outcome.counts {
            GroupedCounts::Grouped(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].count, 2);
            }
            GroupedCounts::NotGroupable => panic!("strings are groupable"),
        }
    }

    #[test]
    fn test_ignored_rows_count_as_elements_only() {
        let verdicts = vec![Verdict::Ignored, Verdict::Satisfied, unsat("x")];
        let summary = merge_partitions(vec![PartitionOutcome::collect(0, verdicts)]);
        assert_eq!(summary.element_count, 3);
        assert_eq!(summary.unexpected_count, 1);
    }

    #[test]
    fn test_composite_values_degrade_to_sample_only() {
        let row = Verdict::Unsatisfied(UnexpectedValue::Row(vec![
            CellValue::Str("a".to_string()),
            CellValue::Null,
            CellValue::Str("b".to_string()),
        ]));
        let summary = merge_partitions(vec![PartitionOutcome::collect(0, vec![row.clone(), row])]);
        assert_eq!(summary.unexpected_count, 2);
        assert!(summary.partial_unexpected_counts.is_none());
        assert!(!summary.counted_mode());
        assert_eq!(summary.partial_unexpected_list.len(), 2);
    }

    #[test]
    fn test_merge_order_is_partition_then_offset() {
        // Partitions arrive out of order; the merged sample must follow
        // (partition index, row offset)
        let p1 = PartitionOutcome::collect(1, vec![unsat("c"), unsat("d")]);
        let p0 = PartitionOutcome::collect(0, vec![unsat("a"), unsat("b")]);
        let summary = merge_partitions(vec![p1, p0]);
        let sampled: Vec<String> = summary
            .partial_unexpected_list
            .iter()
            .map(|v| match v {
                UnexpectedValue::Single(CellValue::Str(s)) => s.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(sampled, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_counts_merge_across_partitions() {
        let p0 = PartitionOutcome::collect(0, vec![unsat("x"), unsat("y")]);
        let p1 = PartitionOutcome::collect(1, vec![unsat("x"), unsat("x")]);
        let summary = merge_partitions(vec![p0, p1]);
        let counts = summary.partial_unexpected_counts.as_ref().unwrap();
        assert_eq!(counts[0].count, 3); // "x", most frequent first
        assert_eq!(counts[1].count, 1);
        assert!(summary.counted_mode());
    }

    #[test]
    fn test_too_many_distinct_values_leave_counted_mode() {
        let verdicts: Vec<Verdict> = (0..PARTIAL_UNEXPECTED_LIMIT + 5)
            .map(|i| unsat(&format!("v{}", i)))
            .collect();
        let summary = merge_partitions(vec![PartitionOutcome::collect(0, verdicts)]);
        let counts = summary.partial_unexpected_counts.as_ref().unwrap();
        assert_eq!(counts.len(), PARTIAL_UNEXPECTED_LIMIT);
        assert!(!summary.counted_mode());
    }

    #[test]
    fn test_sample_is_bounded() {
        let verdicts: Vec<Verdict> = (0..100).map(|_| unsat("x")).collect();
        let summary = merge_partitions(vec![PartitionOutcome::collect(0, verdicts)]);
        assert_eq!(
            summary.partial_unexpected_list.len(),
            PARTIAL_UNEXPECTED_LIMIT
        );
        assert_eq!(summary.unexpected_count, 100);
    }
}
