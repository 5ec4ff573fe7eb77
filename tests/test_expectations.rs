use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use serde_json::json;

use batchguard::{Batch, Expectation, ExpectationConfig, ExpectationError, ExpectationKind};

fn string_batch(column: &str, values: Vec<Option<&str>>) -> Batch {
    RecordBatch::try_from_iter(vec![(
        column,
        Arc::new(StringArray::from(values)) as ArrayRef,
    )])
    .unwrap()
    .into()
}

fn length_match(length: i64) -> Expectation {
    let config = ExpectationConfig::new(ExpectationKind::LengthMatch, vec!["video_id".to_string()])
        .with_kwarg("length", json!(length));
    Expectation::compile(config).unwrap()
}

#[test]
fn test_length_match_all_rows_satisfied() {
    let batch = string_batch("video_id", vec![Some("V00001111"), Some("V12345678")]);
    let result = length_match(9).validate(&batch).unwrap();

    assert!(result.success);
    assert_eq!(result.result.element_count, 2);
    assert_eq!(result.result.unexpected_count, 0);
    assert_eq!(result.result.unexpected_percent, Some(0.0));
    assert!(result.result.partial_unexpected_list.is_empty());
}

#[test]
fn test_length_match_every_row_unexpected() {
    let batch = string_batch("video_id", vec![Some("V01"), Some("V123456789")]);
    let result = length_match(9).validate(&batch).unwrap();

    assert!(!result.success);
    assert_eq!(result.result.element_count, 2);
    assert_eq!(result.result.unexpected_count, 2);
    assert_eq!(result.result.unexpected_percent, Some(100.0));
    assert_eq!(result.result.partial_unexpected_list.len(), 2);
}

#[test]
fn test_length_match_counts_characters_not_bytes() {
    // "Vidéo9999" is 9 characters but 10 bytes
    let batch = string_batch("video_id", vec![Some("Vidéo9999")]);
    let result = length_match(9).validate(&batch).unwrap();

    assert!(result.success);
    assert_eq!(result.result.unexpected_count, 0);
}

#[test]
fn test_length_match_null_is_unexpected() {
    let batch = string_batch("video_id", vec![Some("V00001111"), None, Some("")]);
    let result = length_match(9).validate(&batch).unwrap();

    assert!(!result.success);
    assert_eq!(result.result.unexpected_count, 2);
}

#[test]
fn test_length_match_mostly_tolerance() {
    let batch = string_batch(
        "video_id",
        vec![Some("V00001111"), Some("V12345678"), Some("V99999999"), Some("V01")],
    );
    let config = ExpectationConfig::new(ExpectationKind::LengthMatch, vec!["video_id".to_string()])
        .with_kwarg("length", json!(9))
        .with_mostly(0.75);
    let result = Expectation::compile(config).unwrap().validate(&batch).unwrap();
    assert!(result.success);
    assert_eq!(result.result.unexpected_count, 1);

    let config = ExpectationConfig::new(ExpectationKind::LengthMatch, vec!["video_id".to_string()])
        .with_kwarg("length", json!(9))
        .with_mostly(0.8);
    let result = Expectation::compile(config).unwrap().validate(&batch).unwrap();
    assert!(!result.success);
}

#[test]
fn test_length_match_empty_batch_succeeds() {
    let batch = string_batch("video_id", vec![]);
    let result = length_match(9).validate(&batch).unwrap();

    assert!(result.success);
    assert_eq!(result.result.element_count, 0);
    assert_eq!(result.result.unexpected_percent, None);
}

fn pair_batch(a: Vec<Option<i64>>, b: Vec<Option<i64>>) -> Batch {
    RecordBatch::try_from_iter(vec![
        (
            "time_spent",
            Arc::new(Int64Array::from(a)) as ArrayRef,
        ),
        (
            "video_duration",
            Arc::new(Int64Array::from(b)) as ArrayRef,
        ),
    ])
    .unwrap()
    .into()
}

fn approx_leq() -> ExpectationConfig {
    ExpectationConfig::new(
        ExpectationKind::ApproxLeq,
        vec!["time_spent".to_string(), "video_duration".to_string()],
    )
}

#[test]
fn test_approx_leq_within_approximation() {
    let batch = pair_batch(
        vec![Some(11), Some(22), Some(50)],
        vec![Some(10), Some(21), Some(100)],
    );
    let config = approx_leq().with_kwarg("n_approximate", json!(1));
    let result = Expectation::compile(config).unwrap().validate(&batch).unwrap();

    assert!(result.success);
    assert_eq!(result.result.unexpected_count, 0);
}

#[test]
fn test_approx_leq_strict_default_fails() {
    let batch = pair_batch(
        vec![Some(11), Some(22), Some(50)],
        vec![Some(9), Some(21), Some(30)],
    );
    let result = Expectation::compile(approx_leq())
        .unwrap()
        .validate(&batch)
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.result.element_count, 3);
    assert_eq!(result.result.unexpected_count, 3);
}

#[test]
fn test_approx_leq_ignore_missing_rows() {
    let batch = pair_batch(
        vec![Some(11), None, Some(5)],
        vec![Some(20), Some(21), None],
    );
    let config = approx_leq().with_kwarg("ignore_row_if", json!("either_value_is_missing"));
    let result = Expectation::compile(config).unwrap().validate(&batch).unwrap();

    // Ignored rows still count as elements but never as unexpected
    assert!(result.success);
    assert_eq!(result.result.element_count, 3);
    assert_eq!(result.result.unexpected_count, 0);
}

#[test]
fn test_approx_leq_missing_value_is_unexpected_by_default() {
    let batch = pair_batch(vec![Some(11), None], vec![Some(20), Some(21)]);
    let result = Expectation::compile(approx_leq())
        .unwrap()
        .validate(&batch)
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.result.unexpected_count, 1);
}

#[test]
fn test_approx_leq_float_columns() {
    let batch: Batch = RecordBatch::try_from_iter(vec![
        (
            "time_spent",
            Arc::new(Float64Array::from(vec![Some(10.5), Some(30.0)])) as ArrayRef,
        ),
        (
            "video_duration",
            Arc::new(Float64Array::from(vec![Some(10.0), Some(29.0)])) as ArrayRef,
        ),
    ])
    .unwrap()
    .into();
    let config = approx_leq().with_kwarg("n_approximate", json!(1));
    let result = Expectation::compile(config).unwrap().validate(&batch).unwrap();

    assert!(result.success);
}

#[test]
fn test_approx_leq_rejects_string_column() {
    let batch: Batch = RecordBatch::try_from_iter(vec![
        (
            "time_spent",
            Arc::new(StringArray::from(vec!["11"])) as ArrayRef,
        ),
        (
            "video_duration",
            Arc::new(StringArray::from(vec!["20"])) as ArrayRef,
        ),
    ])
    .unwrap()
    .into();
    let err = Expectation::compile(approx_leq())
        .unwrap()
        .validate(&batch)
        .unwrap_err();

    assert!(matches!(err, ExpectationError::TypeCastError(_, _)));
}

fn identity_batch(a: Vec<Option<&str>>, b: Vec<Option<&str>>, c: Vec<Option<&str>>) -> Batch {
    RecordBatch::try_from_iter(vec![
        ("customer_id", Arc::new(StringArray::from(a)) as ArrayRef),
        ("user_id", Arc::new(StringArray::from(b)) as ArrayRef),
        ("device_id", Arc::new(StringArray::from(c)) as ArrayRef),
    ])
    .unwrap()
    .into()
}

fn identity_rule() -> Expectation {
    let config = ExpectationConfig::new(
        ExpectationKind::IdentityRule,
        vec![
            "customer_id".to_string(),
            "user_id".to_string(),
            "device_id".to_string(),
        ],
    )
    .with_kwarg("device_id_regex", json!("d[0-9]{3}$"));
    Expectation::compile(config).unwrap()
}

#[test]
fn test_identity_rule_satisfied() {
    let batch = identity_batch(
        vec![Some("d001"), Some("1000"), Some("1001")],
        vec![None, Some("1000"), Some("1001")],
        vec![Some("d001"), Some("d002"), Some("d002")],
    );
    let result = identity_rule().validate(&batch).unwrap();

    assert!(result.success);
    assert_eq!(result.result.unexpected_count, 0);
}

#[test]
fn test_identity_rule_mismatch_reports_rows() {
    let batch = identity_batch(
        vec![Some("d001"), Some("d002"), Some("1001")],
        vec![None, Some("1000"), Some("1001")],
        vec![Some("d001"), Some("d002"), Some("d002")],
    );
    let result = identity_rule().validate(&batch).unwrap();

    assert!(!result.success);
    assert_eq!(result.result.unexpected_count, 1);
    // Multicolumn rows are reported sample-only
    assert_eq!(result.result.partial_unexpected_counts, None);
    assert_eq!(result.result.partial_unexpected_list.len(), 1);
}

#[test]
fn test_missing_column_is_an_evaluation_error() {
    let batch = string_batch("other", vec![Some("V00001111")]);
    let err = length_match(9).validate(&batch).unwrap_err();

    assert_eq!(err.to_string(), "Column 'video_id' not found in Batch");
}

#[test]
fn test_config_errors_detected_before_any_row_is_read() {
    let missing = ExpectationConfig::new(ExpectationKind::LengthMatch, vec!["a".to_string()]);
    assert!(Expectation::compile(missing).is_err());

    let wrong_arity = ExpectationConfig::new(
        ExpectationKind::ApproxLeq,
        vec!["a".to_string()],
    );
    assert!(Expectation::compile(wrong_arity).is_err());

    let bad_mostly = ExpectationConfig::new(ExpectationKind::LengthMatch, vec!["a".to_string()])
        .with_kwarg("length", json!(9))
        .with_mostly(0.0);
    assert!(Expectation::compile(bad_mostly).is_err());
}

#[test]
fn test_evaluation_is_idempotent() {
    let batch = string_batch(
        "video_id",
        vec![Some("V01"), Some("V00001111"), None, Some(""), Some("V01")],
    );
    let expectation = length_match(9);

    let first = expectation.validate(&batch).unwrap();
    let second = expectation.validate(&batch).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
