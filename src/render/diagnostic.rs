//! Diagnostic renderer: the unexpected-value table.

use serde_json::{Value, json};

use crate::config::ExpectationConfig;
use crate::render::content::RenderedContent;
use crate::results::{UnexpectedValue, ValidationResult};

fn table_styling() -> Option<Value> {
    Some(json!({"body": {"classes": ["table-bordered", "table-sm", "mt-3"]}}))
}

/// Display form of one unexpected value. Pairs carry their column names so
/// the reader can tell which side is which.
fn display_value(value: &UnexpectedValue, config: &ExpectationConfig) -> String {
    match value {
        UnexpectedValue::Single(cell) => cell.display(),
        UnexpectedValue::Pair(a, b) => format!(
            "{}: {}, {}: {}",
            config.columns[0],
            a.display(),
            config.columns[1],
            b.display()
        ),
        UnexpectedValue::Row(cells) => format!(
            "[{}]",
            cells
                .iter()
                .map(|c| c.display())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Render the unexpected-value table for one result.
///
/// Counted mode (grouped counts cover the full unexpected population):
/// value/count rows. Otherwise: a deduplicated sample in first-seen order.
/// Returns `None` when there is nothing unexpected to show.
pub(crate) fn unexpected_table(
    config: &ExpectationConfig,
    result: &ValidationResult,
) -> Option<RenderedContent> {
    let summary = &result.result;
    if summary.unexpected_count == 0 {
        return None;
    }

    let (header_row, rows) = match &summary.partial_unexpected_counts {
        Some(counts) if !counts.is_empty() => {
            let total: usize = counts.iter().map(|c| c.count).sum();
            if total == summary.unexpected_count {
                // The full population is accounted for: show counts
                let rows = counts
                    .iter()
                    .map(|c| vec![json!(display_value(&c.value, config)), json!(c.count)])
                    .collect();
                (
                    vec!["Unexpected Value".to_string(), "Count".to_string()],
                    rows,
                )
            } else {
                // Only a sample is held: counts would mislead, drop them
                let rows = counts
                    .iter()
                    .map(|c| vec![json!(display_value(&c.value, config))])
                    .collect();
                (vec!["Sampled Unexpected Values".to_string()], rows)
            }
        }
        _ => {
            let mut seen = Vec::new();
            let mut rows = Vec::new();
            for value in &summary.partial_unexpected_list {
                let display = display_value(value, config);
                if !seen.contains(&display) {
                    rows.push(vec![json!(display)]);
                    seen.push(display);
                }
            }
            (vec!["Sampled Unexpected Values".to_string()], rows)
        }
    };

    Some(RenderedContent::Table {
        header_row,
        rows,
        styling: table_styling(),
    })
}
