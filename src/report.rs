use prettytable::{Cell, Row, Table};

use crate::checkpoint::CheckpointResult;
use crate::utils::numbers::format_numbers;

/// Render a human-readable summary of one checkpoint run.
///
/// One row per evaluated expectation; expectations that raised a recorded
/// evaluation error show as ERROR instead of PASS/FAIL.
pub fn generate_report(checkpoint_result: &CheckpointResult) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Expectation"),
        Cell::new("Status"),
        Cell::new("Elements"),
        Cell::new("Unexpected"),
        Cell::new("% Unexpected"),
    ]));

    for result in &checkpoint_result.results {
        let status = if result.exception_info.is_some() {
            "ERROR"
        } else if result.success {
            "PASS"
        } else {
            "FAIL"
        };
        let percent = match result.result.unexpected_percent {
            Some(p) => format!("{:.2}%", p),
            None => "-".to_string(),
        };
        table.add_row(Row::new(vec![
            Cell::new(&result.expectation),
            Cell::new(status),
            Cell::new(&format_numbers(result.result.element_count)),
            Cell::new(&format_numbers(result.result.unexpected_count)),
            Cell::new(&percent),
        ]));
    }

    format!(
        "Run: {} ({})\nSuite: {}\n{}",
        checkpoint_result.run_id.run_name,
        checkpoint_result.run_id.run_time.format("%Y-%m-%d %H:%M:%S UTC"),
        checkpoint_result.suite_name,
        table
    )
}
