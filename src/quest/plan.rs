//! Workout plan - the quest as produced by the external generator

use serde::{Deserialize, Serialize};

use crate::progression::RankTier;

use super::profile::UserClass;

/// Category of an exercise within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseKind {
    /// Low-intensity preparation work
    Warmup,
    /// Technique or mobility work
    Skill,
    /// Multi-joint strength movement
    Compound,
    /// Single-muscle accessory movement
    Isolation,
    /// Post-workout wind-down
    Cooldown,
}

/// One prescribed exercise in a workout plan.
///
/// `reps` is kept as a string because the generator prescribes ranges
/// (`"8-12"`) as well as fixed counts (`"10"`); the evaluation engine parses
/// the leading integer as the conservative lower bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Stable identifier, matched against `ExerciseOutcome::exercise_id`
    pub id: String,
    /// Display name
    pub name: String,
    /// Exercise category
    pub kind: ExerciseKind,
    /// Prescribed set count
    pub sets: u32,
    /// Prescribed reps per set, fixed count or range
    pub reps: String,
    /// Prescribed rest between sets, in seconds
    pub rest_sec: u32,
    /// Target Rate of Perceived Exertion, 1-10
    pub rpe_target: u8,
    /// Primary muscle targeted
    pub target_muscle: String,
    /// Optional coaching cue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

/// Quest category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestType {
    /// Regular daily workout
    #[default]
    Daily,
    /// Punitive quest issued after a missed day
    Penalty,
    /// Gatekeeper exam for rank advancement
    RankUp,
    /// Event or one-off quest
    Special,
}

/// Flat stat bonus attached to a plan, granted on approval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGain {
    /// Strength points
    #[serde(default)]
    pub strength: u32,
    /// Agility points
    #[serde(default)]
    pub agility: u32,
    /// Stamina points
    #[serde(default)]
    pub stamina: u32,
}

/// Kind of completion proof a quest may require.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// No proof required
    #[default]
    None,
    /// Single photo
    Photo,
    /// Full video
    Video,
    /// Timelapse recording
    Timelapse,
}

/// A complete workout plan.
///
/// Produced by the external generative collaborator and treated as an opaque,
/// immutable value here; only `base_xp`, `target_class`, and the exercise
/// prescriptions feed the grading rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Display name of the quest
    pub quest_name: String,
    /// Difficulty rank the plan was generated for
    pub quest_rank: RankTier,
    /// Quest category
    #[serde(default)]
    pub quest_type: QuestType,
    /// Reward baseline before multiplicative grading
    pub base_xp: u64,
    /// Flat stat bonus granted on approval
    #[serde(default)]
    pub stat_gain: StatGain,
    /// Generator's duration estimate, in minutes
    pub estimated_duration_min: u32,
    /// Class the plan was tailored for; matching users earn a synergy bonus
    pub target_class: UserClass,
    /// Whether completion proof is mandatory
    #[serde(default)]
    pub requires_proof: bool,
    /// Kind of proof requested
    #[serde(default)]
    pub proof_type: ProofType,
    /// Ordered exercise prescriptions
    pub exercises: Vec<Exercise>,
}
