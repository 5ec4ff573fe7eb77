//! Checkpoint orchestration: runs a suite against one batch and triggers
//! post-run actions.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::batch::Batch;
use crate::errors::ExpectationError;
use crate::results::ValidationResult;
use crate::suite::ExpectationSuite;

/// Identity of one checkpoint execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunId {
    pub run_name: String,
    pub run_time: DateTime<Utc>,
}

/// A post-run side effect, polymorphic over "consume a result".
///
/// Implementations must not mutate the batch or the results; a failing
/// action is reported per-action and never invalidates already-computed
/// results.
pub trait Action: Send + Sync {
    fn name(&self) -> &str;

    fn consume(&self, run_id: &RunId, result: &ValidationResult) -> Result<(), ExpectationError>;
}

/// Keeps consumed results in memory; the default store used when no
/// external persistence backend is wired in.
#[derive(Default)]
pub struct MemoryValidationStore {
    stored: Mutex<Vec<(RunId, ValidationResult)>>,
}

impl MemoryValidationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Vec<(RunId, ValidationResult)> {
        self.stored.lock().unwrap().clone()
    }
}

impl Action for MemoryValidationStore {
    fn name(&self) -> &str {
        "store_validation_result"
    }

    fn consume(&self, run_id: &RunId, result: &ValidationResult) -> Result<(), ExpectationError> {
        self.stored
            .lock()
            .unwrap()
            .push((run_id.clone(), result.clone()));
        Ok(())
    }
}

/// Outcome of one checkpoint run: one `ValidationResult` per successfully
/// configured expectation, in suite order, plus the errors that excluded
/// expectations or failed actions.
#[derive(Debug)]
pub struct CheckpointResult {
    pub run_id: RunId,
    pub suite_name: String,
    pub results: Vec<ValidationResult>,
    pub config_errors: Vec<ExpectationError>,
    pub action_errors: Vec<ExpectationError>,
}

impl CheckpointResult {
    /// True when every evaluated expectation succeeded. Config and action
    /// errors are surfaced separately and do not flip this flag.
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

/// Executes an `ExpectationSuite` against one `Batch`.
///
/// Expectations are evaluated independently and in order; an assertion
/// failure in one never prevents evaluation of the next. Evaluation errors
/// follow the expectation's `catch_exceptions` flag: recorded in the
/// result, or fatal for the remainder of the run.
pub struct Checkpoint {
    name: String,
    run_name_template: Option<String>,
    actions: Vec<Arc<dyn Action>>,
}

impl Checkpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run_name_template: None,
            actions: Vec::new(),
        }
    }

    /// Derive the run name from the run time with a chrono format string,
    /// e.g. `"%Y%m%d_%H%M%S"`.
    pub fn with_run_name_template(mut self, template: impl Into<String>) -> Self {
        self.run_name_template = Some(template.into());
        self
    }

    pub fn with_action(mut self, action: Arc<dyn Action>) -> Self {
        self.actions.push(action);
        self
    }

    fn run_id(&self, suite: &ExpectationSuite) -> RunId {
        let run_time = Utc::now();
        let run_name = match &self.run_name_template {
            Some(template) => run_time.format(template).to_string(),
            None => format!("{}_{}_run", self.name, suite.name()),
        };
        RunId { run_name, run_time }
    }

    pub fn run(
        &self,
        suite: &ExpectationSuite,
        batch: &Batch,
    ) -> Result<CheckpointResult, ExpectationError> {
        let run_id = self.run_id(suite);
        info!(
            checkpoint = %self.name,
            suite = %suite.name(),
            run_name = %run_id.run_name,
            rows = batch.num_rows(),
            "checkpoint run starting"
        );

        let (expectations, config_errors) = suite.compile();

        let mut results = Vec::with_capacity(expectations.len());
        for expectation in &expectations {
            match expectation.validate(batch) {
                Ok(result) => {
                    debug!(
                        expectation = %result.expectation,
                        success = result.success,
                        unexpected = result.result.unexpected_count,
                        "expectation evaluated"
                    );
                    results.push(result);
                }
                Err(err) if expectation.catch_exceptions() => {
                    warn!(
                        expectation = %expectation.description(),
                        error = %err,
                        "evaluation error recorded"
                    );
                    results.push(ValidationResult::from_error(expectation.description(), &err));
                }
                Err(err) => return Err(err),
            }
        }

        let mut action_errors = Vec::new();
        for action in &self.actions {
            for result in &results {
                if let Err(err) = action.consume(&run_id, result) {
                    warn!(action = action.name(), error = %err, "action failed");
                    action_errors.push(ExpectationError::ActionError {
                        action: action.name().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            run_name = %run_id.run_name,
            results = results.len(),
            excluded = config_errors.len(),
            "checkpoint run completed"
        );
        Ok(CheckpointResult {
            run_id,
            suite_name: suite.name().to_string(),
            results,
            config_errors,
            action_errors,
        })
    }
}
