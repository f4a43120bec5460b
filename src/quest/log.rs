//! Completion log - the user's self-reported workout outcome

use serde::{Deserialize, Serialize};

use super::plan::ProofType;

/// Self-reported outcome for one prescribed exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseOutcome {
    /// Id of the prescribed exercise this outcome answers
    pub exercise_id: String,
    /// Sets the user claims to have done
    pub sets_done: u32,
    /// Reps per set the user claims, free-form (`"12"`, `"8-12"`)
    pub reps_done: String,
    /// Whether the exercise was skipped entirely
    #[serde(default)]
    pub skipped: bool,
}

/// A completed quest log, immutable after grading.
///
/// Created once per quest attempt by the user-facing flow. The optional proof
/// reference is opaque to the grading core; verification of proof media is an
/// external concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLog {
    /// Quest this log answers
    pub quest_id: String,
    /// Actual workout duration, in minutes
    pub duration_actual: u32,
    /// Self-reported Rate of Perceived Exertion, 1-10
    pub rpe_actual: u8,
    /// Per-exercise outcomes
    pub exercises_completed: Vec<ExerciseOutcome>,
    /// Free-form user feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<String>,
    /// Opaque reference to uploaded proof media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_media_url: Option<String>,
    /// Kind of proof provided
    #[serde(default)]
    pub proof_type: ProofType,
}

impl CompletionLog {
    /// Number of exercises the user did not skip.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.exercises_completed
            .iter()
            .filter(|outcome| !outcome.skipped)
            .count()
    }
}
