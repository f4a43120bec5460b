//! Variant - one arm of a grading-rule experiment

use serde::{Deserialize, Serialize};

use super::record::TargetMetric;

/// Running aggregates for one experiment arm.
///
/// All three means use the incremental update `m += (x - m) / n`, so the
/// struct stays O(1) regardless of how many observations flow through it.
/// `sample_size` is monotonically non-decreasing except on an explicit reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Stable variant identifier
    pub id: String,
    /// Number of observations recorded
    pub sample_size: u64,
    /// Running mean of the success indicator (0.0 - 1.0)
    pub success_rate: f64,
    /// Running mean of the grading score
    pub avg_score: f64,
    /// Running mean of end-to-end latency, in milliseconds
    pub avg_time_ms: f64,
}

impl Variant {
    /// Create a zeroed variant.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sample_size: 0,
            success_rate: 0.0,
            avg_score: 0.0,
            avg_time_ms: 0.0,
        }
    }

    /// Fold one observation into the running means.
    pub fn observe(&mut self, success: bool, score: f64, duration_ms: f64) {
        self.sample_size += 1;
        #[allow(clippy::cast_precision_loss)]
        let n = self.sample_size as f64;
        let success_value = if success { 1.0 } else { 0.0 };
        self.success_rate += (success_value - self.success_rate) / n;
        self.avg_score += (score - self.avg_score) / n;
        self.avg_time_ms += (duration_ms - self.avg_time_ms) / n;
    }

    /// Zero the aggregates, keeping the id.
    pub fn reset(&mut self) {
        self.sample_size = 0;
        self.success_rate = 0.0;
        self.avg_score = 0.0;
        self.avg_time_ms = 0.0;
    }

    /// Value of the configured target metric.
    #[must_use]
    pub const fn metric(&self, target: TargetMetric) -> f64 {
        match target {
            TargetMetric::SuccessRate => self.success_rate,
            TargetMetric::AvgScore => self.avg_score,
        }
    }
}
