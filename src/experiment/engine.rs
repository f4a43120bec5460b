//! Experiment engine - concurrent aggregation and significance checking
//!
//! The engine owns the only mutable shared state in the crate: per-experiment
//! running aggregates. All mutation happens under a `DashMap` entry guard, so
//! the read-modify-write of `record_observation` (and the auto-complete check
//! riding on it) is serialized per experiment while distinct experiments
//! update in parallel. Exactly one caller can ever perform the running ->
//! completed transition; later callers observe `Completed` and no-op.

use dashmap::DashMap;
use tracing::debug;

use crate::error::{Error, Result};

use super::assignment::{assignment_hash, AssignmentStore};
use super::record::{Experiment, ExperimentConfig, ExperimentMetrics};
use super::stats::{two_proportion_z_test, SIGNIFICANCE_LEVEL, Z_95};

/// Thread-safe engine for grading-rule experiments.
///
/// Shared by reference (typically inside an `Arc`) between the request
/// handlers that record quest completions.
#[derive(Debug, Default)]
pub struct ExperimentEngine {
    experiments: DashMap<String, Experiment>,
    assignments: AssignmentStore,
}

impl ExperimentEngine {
    /// Create an engine with no experiments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a running experiment from a config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the config fails validation or
    /// an experiment with the same id already exists.
    pub fn create_experiment(&self, config: ExperimentConfig) -> Result<Experiment> {
        config.validate()?;
        if self.experiments.contains_key(&config.id) {
            return Err(Error::InvalidConfig(format!(
                "experiment {} already exists",
                config.id
            )));
        }
        let experiment = Experiment::from_config(config);
        debug!(
            experiment_id = %experiment.id,
            variants = experiment.variants.len(),
            "experiment created"
        );
        self.experiments
            .insert(experiment.id.clone(), experiment.clone());
        Ok(experiment)
    }

    /// Snapshot of an experiment by id.
    #[must_use]
    pub fn experiment(&self, experiment_id: &str) -> Option<Experiment> {
        self.experiments
            .get(experiment_id)
            .map(|entry| entry.value().clone())
    }

    /// Snapshot of all experiments.
    #[must_use]
    pub fn experiments(&self) -> Vec<Experiment> {
        self.experiments
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of experiments in the engine.
    #[must_use]
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Existing sticky assignment for a pair, if any.
    #[must_use]
    pub fn assignment(&self, experiment_id: &str, user_id: &str) -> Option<String> {
        self.assignments.get(experiment_id, user_id)
    }

    /// Deterministically assign a user to a variant of a running experiment.
    ///
    /// The candidate variant is picked by a stable hash of the user and
    /// experiment ids modulo the variant count - no randomness - and the
    /// first assignment for a pair is cached and returned forever after,
    /// independent of call order, concurrency, or process restarts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentNotFound`] for an unknown id and
    /// [`Error::ExperimentNotRunning`] once the experiment has completed.
    pub fn assign_variant(&self, experiment_id: &str, user_id: &str) -> Result<String> {
        let candidate = {
            let entry = self
                .experiments
                .get(experiment_id)
                .ok_or_else(|| Error::ExperimentNotFound(experiment_id.to_string()))?;
            let experiment = entry.value();
            if !experiment.is_running() {
                return Err(Error::ExperimentNotRunning(experiment_id.to_string()));
            }
            let hash = assignment_hash(user_id, experiment_id);
            #[allow(clippy::cast_possible_truncation)]
            let index = (hash % experiment.variants.len() as u64) as usize;
            experiment.variants[index].id.clone()
        };

        let variant_id = self
            .assignments
            .get_or_insert(experiment_id, user_id, candidate);
        debug!(%experiment_id, %user_id, %variant_id, "variant assigned");
        Ok(variant_id)
    }

    /// Record one observation against a variant.
    ///
    /// Updates the variant's running means and the experiment's total run
    /// count atomically with respect to concurrent callers, then runs the
    /// significance check once every variant has reached the minimum sample
    /// size - completing the experiment if the result is significant. All of
    /// this happens under the experiment's exclusive guard, so no increments
    /// are lost and the auto-complete fires exactly once.
    ///
    /// Observations against a completed experiment are dropped silently: the
    /// aggregates of a terminal experiment are frozen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentNotFound`] or [`Error::VariantNotFound`];
    /// both are raised before any mutation, so a failed call never leaves the
    /// aggregates partially updated.
    pub fn record_observation(
        &self,
        experiment_id: &str,
        variant_id: &str,
        success: bool,
        score: f64,
        duration_ms: f64,
    ) -> Result<()> {
        let mut entry = self
            .experiments
            .get_mut(experiment_id)
            .ok_or_else(|| Error::ExperimentNotFound(experiment_id.to_string()))?;
        let experiment = entry.value_mut();

        if !experiment.is_running() {
            debug!(%experiment_id, "observation dropped: experiment already completed");
            return Ok(());
        }

        let index =
            experiment
                .variant_index(variant_id)
                .ok_or_else(|| Error::VariantNotFound {
                    experiment_id: experiment_id.to_string(),
                    variant_id: variant_id.to_string(),
                })?;

        experiment.variants[index].observe(success, score, duration_ms);
        experiment.metrics.total_runs = experiment
            .variants
            .iter()
            .map(|variant| variant.sample_size)
            .sum();

        if experiment.all_variants_at_min_sample() {
            Self::run_significance(experiment);
        }
        Ok(())
    }

    /// Run the significance check for an experiment.
    ///
    /// Compares the first two variants with a two-proportion z-test over the
    /// configured target metric. A significant result (p < 0.05) records the
    /// winner and completes the experiment. Idempotent once completed: the
    /// stored metrics are returned unchanged and no new winner is picked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentNotFound`] for an unknown id.
    pub fn evaluate_significance(&self, experiment_id: &str) -> Result<ExperimentMetrics> {
        let mut entry = self
            .experiments
            .get_mut(experiment_id)
            .ok_or_else(|| Error::ExperimentNotFound(experiment_id.to_string()))?;
        let experiment = entry.value_mut();

        if !experiment.is_running() {
            return Ok(experiment.metrics.clone());
        }
        Ok(Self::run_significance(experiment))
    }

    /// Explicitly complete an experiment, optionally recording a winner.
    /// Idempotent; a second call never overwrites the first winner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentNotFound`] for an unknown id.
    pub fn end_experiment(&self, experiment_id: &str, winner_id: Option<String>) -> Result<()> {
        let mut entry = self
            .experiments
            .get_mut(experiment_id)
            .ok_or_else(|| Error::ExperimentNotFound(experiment_id.to_string()))?;
        entry.value_mut().complete(winner_id);
        Ok(())
    }

    /// Compute and store significance metrics; caller holds the entry guard.
    fn run_significance(experiment: &mut Experiment) -> ExperimentMetrics {
        let variant_a = &experiment.variants[0];
        let variant_b = &experiment.variants[1];

        let p1 = variant_a.metric(experiment.target_metric);
        let p2 = variant_b.metric(experiment.target_metric);
        let test = two_proportion_z_test(p1, variant_a.sample_size, p2, variant_b.sample_size);

        let is_significant = test.p_value < SIGNIFICANCE_LEVEL;
        let winner_id = is_significant.then(|| {
            if p1 > p2 {
                variant_a.id.clone()
            } else {
                variant_b.id.clone()
            }
        });

        experiment.metrics = ExperimentMetrics {
            total_runs: experiment.metrics.total_runs,
            z_score: test.z,
            p_value: test.p_value,
            is_significant,
            confidence_interval: Z_95 * test.se,
            improvement_delta: (p1 - p2).abs(),
            winner_id: winner_id.clone(),
        };

        if is_significant {
            debug!(
                experiment_id = %experiment.id,
                winner = winner_id.as_deref().unwrap_or(""),
                p_value = test.p_value,
                "experiment reached significance"
            );
            experiment.complete(winner_id);
        }
        experiment.metrics.clone()
    }
}
