use tracing::warn;

use crate::config::ExpectationConfig;
use crate::errors::ExpectationError;
use crate::expectations::Expectation;

/// An ordered, named collection of expectation configurations.
///
/// Insertion order is evaluation order; expectations fail independently,
/// there is no short-circuit.
#[derive(Debug, Clone)]
pub struct ExpectationSuite {
    name: String,
    expectations: Vec<ExpectationConfig>,
}

impl ExpectationSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
        }
    }

    pub fn add_expectation(&mut self, config: ExpectationConfig) -> &mut Self {
        self.expectations.push(config);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    pub fn configs(&self) -> &[ExpectationConfig] {
        &self.expectations
    }

    /// Compile every configuration, keeping order.
    ///
    /// A malformed expectation yields an attributable `ConfigError` and is
    /// excluded from the compiled set; it is never fatal for the suite.
    pub fn compile(&self) -> (Vec<Expectation>, Vec<ExpectationError>) {
        let mut compiled = Vec::with_capacity(self.expectations.len());
        let mut rejected = Vec::new();
        for config in &self.expectations {
            match Expectation::compile(config.clone()) {
                Ok(expectation) => compiled.push(expectation),
                Err(err) => {
                    warn!(suite = %self.name, error = %err, "expectation excluded from suite");
                    rejected.push(err);
                }
            }
        }
        (compiled, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::config::ExpectationKind;

    #[test]
    fn test_misconfigured_expectation_is_excluded_not_fatal() {
        let mut suite = ExpectationSuite::new("videos.basic");
        suite.add_expectation(
            ExpectationConfig::new(ExpectationKind::LengthMatch, vec!["video_id".to_string()])
                .with_kwarg("length", json!(9)),
        );
        // missing the length parameter
        suite.add_expectation(ExpectationConfig::new(
            ExpectationKind::LengthMatch,
            vec!["customer_id".to_string()],
        ));

        let (compiled, rejected) = suite.compile();
        assert_eq!(compiled.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert!(
            rejected[0]
                .to_string()
                .contains("column_values.match_input_length(customer_id)")
        );
    }

    #[test]
    fn test_compile_preserves_order() {
        let mut suite = ExpectationSuite::new("videos.basic");
        suite
            .add_expectation(
                ExpectationConfig::new(ExpectationKind::LengthMatch, vec!["a".to_string()])
                    .with_kwarg("length", json!(3)),
            )
            .add_expectation(
                ExpectationConfig::new(
                    ExpectationKind::ApproxLeq,
                    vec!["x".to_string(), "y".to_string()],
                ),
            );
        let (compiled, rejected) = suite.compile();
        assert!(rejected.is_empty());
        assert_eq!(compiled[0].description(), "column_values.match_input_length(a)");
        assert_eq!(
            compiled[1].description(),
            "column_pair_values.a_approx_smaller_or_equal_than_b(x, y)"
        );
    }
}
