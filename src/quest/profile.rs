//! Profile aggregate - read-only view of the user consumed by grading

use serde::{Deserialize, Serialize};

use crate::progression::RankTier;

/// Training class chosen at onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserClass {
    /// Unspecialized starter class
    Novice,
    /// Explosive upper-body focus
    Striker,
    /// Strength and load focus
    Tank,
    /// Agility and endurance focus
    Assassin,
}

/// Read-only profile snapshot.
///
/// This core never mutates profile state; the caller persists new totals after
/// grading and re-derives level and rank via [`crate::progression`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAggregate {
    /// Training class
    pub class: UserClass,
    /// Current rank tier
    pub rank_tier: RankTier,
    /// Consecutive-day completion streak
    pub streak_current: u32,
    /// Current level
    pub level: u32,
    /// Lifetime experience points
    pub total_xp: u64,
}
