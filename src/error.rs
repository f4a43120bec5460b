//! Error types for ascend-core
//!
//! Business outcomes (a rejected or flagged workout) are values, not errors;
//! only malformed input and unknown experiment state surface here.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// ascend-core error types
#[derive(Error, Debug)]
pub enum Error {
    /// A completion log or plan failed validation before scoring
    #[error("validation failed: {0}")]
    Validation(String),

    /// Experiment lookup failed
    #[error("experiment not found: {0}")]
    ExperimentNotFound(String),

    /// Variant lookup failed within a known experiment
    #[error("variant {variant_id} not found in experiment {experiment_id}")]
    VariantNotFound {
        /// Experiment that was addressed
        experiment_id: String,
        /// Variant id that did not resolve
        variant_id: String,
    },

    /// Experiment exists but is no longer accepting assignments
    #[error("experiment {0} is not running")]
    ExperimentNotRunning(String),

    /// Experiment configuration rejected at creation time
    #[error("invalid experiment config: {0}")]
    InvalidConfig(String),

    /// Plan generation failed in the external collaborator
    #[error("plan generation failed: {0}")]
    Generation(String),
}
