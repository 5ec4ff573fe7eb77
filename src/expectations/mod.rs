//! Expectation kinds and their per-row conditions.
//!
//! An `Expectation` is a validated, immutable pairing of a declarative
//! `ExpectationConfig` with a compiled condition. All parameter validation
//! happens here, at compile time; evaluation never rejects a configuration.

pub mod approx_leq;
pub mod identity;
pub mod length_match;

pub use approx_leq::{ApproxLeq, IgnoreRowIf};
pub use identity::IdentityRule;
pub use length_match::LengthMatch;

use crate::batch::Batch;
use crate::config::{ExpectationConfig, ExpectationKind};
use crate::errors::ExpectationError;
use crate::results::{UnexpectedValue, ValidationResult};

/// Outcome of one row under one condition.
///
/// `Ignored` is only produced by the pair-policy exclusion; it counts
/// toward `element_count` but never toward `unexpected_count`.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Satisfied,
    Unsatisfied(UnexpectedValue),
    Ignored,
}

/// The compiled per-row condition, a closed tagged variant.
#[derive(Debug)]
pub(crate) enum Condition {
    LengthMatch(LengthMatch),
    ApproxLeq(ApproxLeq),
    Identity(IdentityRule),
}

/// A single declarative rule, compiled and ready to evaluate.
#[derive(Debug)]
pub struct Expectation {
    pub(crate) config: ExpectationConfig,
    pub(crate) condition: Condition,
}

impl Expectation {
    /// Compile a declarative configuration into an evaluable expectation.
    ///
    /// Every invalid parameter is rejected here with a `ConfigError`
    /// attributable to the expectation, never at evaluation time.
    pub fn compile(config: ExpectationConfig) -> Result<Self, ExpectationError> {
        let expected = config.kind.column_count();
        if config.columns.len() != expected {
            return Err(config.config_error(format!(
                "expected {} column(s), got {}",
                expected,
                config.columns.len()
            )));
        }
        for key in config.kwargs.keys() {
            if !config.kind.success_keys().contains(&key.as_str()) {
                return Err(config.config_error(format!("unrecognized parameter '{}'", key)));
            }
        }
        let mostly = config.effective_mostly();
        if !(mostly > 0.0 && mostly <= 1.0) {
            return Err(config.config_error(format!("mostly must be in (0, 1], got {}", mostly)));
        }
        let condition = match config.kind {
            ExpectationKind::LengthMatch => Condition::LengthMatch(LengthMatch::from_config(&config)?),
            ExpectationKind::ApproxLeq => Condition::ApproxLeq(ApproxLeq::from_config(&config)?),
            ExpectationKind::IdentityRule => Condition::Identity(IdentityRule::from_config(&config)?),
        };
        Ok(Self { config, condition })
    }

    pub fn kind(&self) -> ExpectationKind {
        self.config.kind
    }

    pub fn config(&self) -> &ExpectationConfig {
        &self.config
    }

    pub fn description(&self) -> String {
        self.config.description()
    }

    pub fn mostly(&self) -> f64 {
        self.config.effective_mostly()
    }

    pub fn catch_exceptions(&self) -> bool {
        self.config.catch_exceptions
    }

    /// Evaluate this expectation against one batch and aggregate the
    /// per-row verdicts into a `ValidationResult`.
    pub fn validate(&self, batch: &Batch) -> Result<ValidationResult, ExpectationError> {
        let summary = crate::engine::evaluate(self, batch)?;
        Ok(ValidationResult::from_summary(
            self.description(),
            summary,
            self.mostly(),
        ))
    }
}
