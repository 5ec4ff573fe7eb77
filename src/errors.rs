use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpectationError {
    /// Missing or malformed expectation parameter, detected when the
    /// configuration is compiled, before any row is read
    #[error("Invalid configuration for expectation '{expectation}': {message}")]
    ConfigError {
        expectation: String,
        message: String,
    },

    /// Column not found in the current Batch
    #[error("Column '{0}' not found in Batch")]
    ColumnNotFound(String),

    /// The column could not be cast to the expected type
    #[error("Failed to cast column '{0}' to type {1}")]
    TypeCastError(String, String),

    /// The Arrow kernel produced an error (e.g., unsupported cast)
    #[error("Arrow computation error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error raised while scanning a batch for one expectation
    #[error("Evaluation error: {0}")]
    EvaluationError(String),

    /// A post-run action failed; never invalidates produced results
    #[error("Action '{action}' failed: {message}")]
    ActionError { action: String, message: String },
}
