//! Experiment record - configuration, lifecycle, and aggregated metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::variant::Variant;

/// Lifecycle state of an experiment. Transitions only move forward:
/// Running -> Completed, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    /// Accepting assignments and observations
    Running,
    /// Terminal; winner recorded if one was found
    Completed,
}

/// Which variant aggregate the significance test compares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMetric {
    /// Compare approval rates
    #[default]
    SuccessRate,
    /// Compare mean grading scores
    AvgScore,
}

/// Configuration supplied at experiment creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Unique experiment identifier, chosen by the caller
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Variant identifiers; at least two, all distinct
    pub variants: Vec<String>,
    /// Metric the significance test compares
    #[serde(default)]
    pub target_metric: TargetMetric,
    /// Observations every variant must reach before significance is checked
    pub min_sample_size: u64,
}

impl ExperimentConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for fewer than two variants, duplicate
    /// variant ids, an empty experiment id, or a zero minimum sample size.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidConfig("experiment id is empty".to_string()));
        }
        if self.variants.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "experiment {} needs at least 2 variants, got {}",
                self.id,
                self.variants.len()
            )));
        }
        for (i, variant) in self.variants.iter().enumerate() {
            if self.variants[..i].contains(variant) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate variant id {variant:?} in experiment {}",
                    self.id
                )));
            }
        }
        if self.min_sample_size == 0 {
            return Err(Error::InvalidConfig(
                "min_sample_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregated significance metrics for an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetrics {
    /// Sum of all variants' sample sizes
    pub total_runs: u64,
    /// Two-proportion z statistic
    pub z_score: f64,
    /// Two-tailed p-value
    pub p_value: f64,
    /// Whether `p_value < 0.05`
    pub is_significant: bool,
    /// Half-width of the 95% confidence interval (1.96 * standard error)
    pub confidence_interval: f64,
    /// Absolute difference between the compared metric values
    pub improvement_delta: f64,
    /// Winning variant id, only set once significance is reached
    pub winner_id: Option<String>,
}

impl Default for ExperimentMetrics {
    fn default() -> Self {
        Self {
            total_runs: 0,
            z_score: 0.0,
            p_value: 1.0,
            is_significant: false,
            confidence_interval: 0.0,
            improvement_delta: 0.0,
            winner_id: None,
        }
    }
}

/// A controlled comparison of grading-rule variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Unique identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle state
    pub status: ExperimentStatus,
    /// Metric the significance test compares
    pub target_metric: TargetMetric,
    /// Per-variant observation threshold for the significance check
    pub min_sample_size: u64,
    /// Arms of the experiment with their running aggregates
    pub variants: Vec<Variant>,
    /// Aggregated significance metrics
    pub metrics: ExperimentMetrics,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Completion timestamp, set on the running -> completed transition
    pub completed_at: Option<DateTime<Utc>>,
}

impl Experiment {
    /// Build a running experiment from a validated config.
    #[must_use]
    pub fn from_config(config: ExperimentConfig) -> Self {
        Self {
            id: config.id,
            name: config.name,
            description: config.description,
            status: ExperimentStatus::Running,
            target_metric: config.target_metric,
            min_sample_size: config.min_sample_size,
            variants: config.variants.into_iter().map(Variant::new).collect(),
            metrics: ExperimentMetrics::default(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Whether the experiment is still accepting observations.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == ExperimentStatus::Running
    }

    /// Whether every variant has reached the minimum sample size.
    #[must_use]
    pub fn all_variants_at_min_sample(&self) -> bool {
        self.variants
            .iter()
            .all(|variant| variant.sample_size >= self.min_sample_size)
    }

    /// Position of a variant by id.
    #[must_use]
    pub fn variant_index(&self, variant_id: &str) -> Option<usize> {
        self.variants
            .iter()
            .position(|variant| variant.id == variant_id)
    }

    /// Mark the experiment completed, recording the winner if one was found.
    /// No-op if already completed; status never moves backward.
    pub fn complete(&mut self, winner_id: Option<String>) {
        if self.status == ExperimentStatus::Completed {
            return;
        }
        self.status = ExperimentStatus::Completed;
        self.completed_at = Some(Utc::now());
        if winner_id.is_some() {
            self.metrics.winner_id = winner_id;
        }
    }
}
