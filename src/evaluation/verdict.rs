//! Verdict - the graded outcome of one completion log

use serde::{Deserialize, Serialize};

/// Outcome of grading.
///
/// Rejected and Flagged are normal business results, not errors; the caller
/// persists them like any other verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    /// Log accepted; full reward granted
    Approved,
    /// Log suspicious; reduced reward granted
    Flagged,
    /// Cheating detected; no reward
    Rejected,
}

/// Flat stat changes to apply on top of XP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDeltas {
    /// Strength points to add
    pub strength_add: u32,
    /// Agility points to add
    pub agility_add: u32,
    /// Stamina points to add
    pub stamina_add: u32,
}

/// The trust-weighted grading result.
///
/// Scores are multiplicative factors, finite and non-negative; `effort_score`
/// can exceed 1.0 when the user out-performed the prescription. The caller
/// owns all persistence of the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Grading outcome
    pub status: VerdictStatus,
    /// Anti-cheat plausibility factor (0.0, 0.5, or 1.0)
    pub integrity_score: f64,
    /// Exertion factor relative to the prescribed RPE (0.5 - 1.2)
    pub effort_score: f64,
    /// Safety factor; fixed at 1.0 in the baseline rules
    pub safety_score: f64,
    /// Class-match bonus factor (1.0 or 1.1)
    pub synergy_bonus: f64,
    /// Streak bonus factor (1.0 - 1.2)
    pub streak_bonus: f64,
    /// Final reward, floored product of base XP and all factors
    pub final_xp: u64,
    /// System message shown to the user
    pub message: String,
    /// Stat changes granted alongside the XP
    pub stat_deltas: StatDeltas,
}

impl Verdict {
    /// Mean of the three grading scores, used as the experiment score metric.
    #[must_use]
    pub fn overall_score(&self) -> f64 {
        (self.integrity_score + self.effort_score + self.safety_score) / 3.0
    }

    /// Whether the verdict counts as a success for experiment tracking.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == VerdictStatus::Approved
    }
}
