//! Experimentation engine for grading-rule A/B tests
//!
//! Lets the product run controlled comparisons of two grading-rule variants
//! and decide, statistically, which one is better.
//!
//! ## Schema Overview
//!
//! ```text
//! Experiment (1) ──< Variant (N, running aggregates)
//!       │
//!       └── ExperimentMetrics (z-test results, winner)
//!
//! AssignmentStore: (experiment_id, user_id) -> variant_id, sticky
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use ascend_core::experiment::{ExperimentConfig, ExperimentEngine, TargetMetric};
//!
//! # fn demo() -> ascend_core::Result<()> {
//! let engine = ExperimentEngine::new();
//! engine.create_experiment(ExperimentConfig {
//!     id: "judge-v2".to_string(),
//!     name: "Stricter integrity ceiling".to_string(),
//!     description: None,
//!     variants: vec!["control".to_string(), "treatment".to_string()],
//!     target_metric: TargetMetric::SuccessRate,
//!     min_sample_size: 200,
//! })?;
//!
//! let variant = engine.assign_variant("judge-v2", "user-42")?;
//! engine.record_observation("judge-v2", &variant, true, 0.93, 840.0)?;
//! # Ok(())
//! # }
//! ```

mod assignment;
mod engine;
mod record;
mod stats;
mod variant;

pub use assignment::{assignment_hash, AssignmentStore};
pub use engine::ExperimentEngine;
pub use record::{
    Experiment, ExperimentConfig, ExperimentMetrics, ExperimentStatus, TargetMetric,
};
pub use stats::{normal_cdf, two_proportion_z_test, ZTest, SIGNIFICANCE_LEVEL, Z_95};
pub use variant::Variant;
