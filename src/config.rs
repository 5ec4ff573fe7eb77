use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ExpectationError;

/// The closed set of expectation kinds.
///
/// New kinds are added as variants, not by subclassing; the renderer
/// registry and the compile step match exhaustively on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationKind {
    /// Single-column rule: value length must match the `length` parameter
    LengthMatch,
    /// Column-pair rule: `a <= b + n_approximate`
    ApproxLeq,
    /// Multicolumn identity rule over (customer, user, device) columns
    IdentityRule,
}

impl ExpectationKind {
    /// Metric name of the underlying per-row condition.
    pub fn metric_name(&self) -> &'static str {
        match self {
            ExpectationKind::LengthMatch => "column_values.match_input_length",
            ExpectationKind::ApproxLeq => "column_pair_values.a_approx_smaller_or_equal_than_b",
            ExpectationKind::IdentityRule => "multicolumn_values.customer_id",
        }
    }

    /// Parameters affecting the pass/fail decision. Doubles as the set of
    /// recognized kwargs: anything else is rejected when the configuration
    /// is compiled.
    pub fn success_keys(&self) -> &'static [&'static str] {
        match self {
            ExpectationKind::LengthMatch => &["length", "mostly"],
            ExpectationKind::ApproxLeq => &[
                "column_A",
                "column_B",
                "ignore_row_if",
                "n_approximate",
                "mostly",
            ],
            ExpectationKind::IdentityRule => &["device_id_regex", "mostly"],
        }
    }

    /// Number of domain columns the kind evaluates.
    pub fn column_count(&self) -> usize {
        match self {
            ExpectationKind::LengthMatch => 1,
            ExpectationKind::ApproxLeq => 2,
            ExpectationKind::IdentityRule => 3,
        }
    }
}

/// Declarative expectation configuration.
///
/// Immutable once constructed; compiling it into an `Expectation` performs
/// all parameter validation, so malformed configurations are rejected
/// before any row is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationConfig {
    pub kind: ExpectationKind,
    /// Domain column name(s), in kind-specific order
    pub columns: Vec<String>,
    /// Value parameters (e.g. `length`, `n_approximate`, `device_id_regex`)
    #[serde(default)]
    pub kwargs: Map<String, Value>,
    /// Minimum fraction of rows that must satisfy the condition.
    /// `None` means the default of 1.0 (zero tolerance).
    #[serde(default)]
    pub mostly: Option<f64>,
    /// When true, evaluation errors are recorded in the result instead of
    /// aborting the run
    #[serde(default)]
    pub catch_exceptions: bool,
}

impl ExpectationConfig {
    pub fn new(kind: ExpectationKind, columns: Vec<String>) -> Self {
        Self {
            kind,
            columns,
            kwargs: Map::new(),
            mostly: None,
            catch_exceptions: false,
        }
    }

    pub fn with_kwarg(mut self, key: &str, value: Value) -> Self {
        self.kwargs.insert(key.to_string(), value);
        self
    }

    pub fn with_mostly(mut self, mostly: f64) -> Self {
        self.mostly = Some(mostly);
        self
    }

    pub fn with_catch_exceptions(mut self, catch: bool) -> Self {
        self.catch_exceptions = catch;
        self
    }

    pub fn effective_mostly(&self) -> f64 {
        self.mostly.unwrap_or(1.0)
    }

    /// Human-readable label used in results, reports, and errors.
    pub fn description(&self) -> String {
        format!("{}({})", self.kind.metric_name(), self.columns.join(", "))
    }

    pub(crate) fn config_error(&self, message: impl Into<String>) -> ExpectationError {
        ExpectationError::ConfigError {
            expectation: self.description(),
            message: message.into(),
        }
    }

    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    /// An optional integer parameter; present but non-integer is a
    /// configuration error.
    pub(crate) fn integer_kwarg(&self, key: &str) -> Result<Option<i64>, ExpectationError> {
        match self.kwargs.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.config_error(format!("{} must be an integer", key))),
        }
    }

    /// An optional string parameter; present but non-string is a
    /// configuration error.
    pub(crate) fn string_kwarg(&self, key: &str) -> Result<Option<&str>, ExpectationError> {
        match self.kwargs.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.config_error(format!("{} must be a string", key))),
        }
    }
}
