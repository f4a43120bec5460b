//! Evaluation engine - rule-based grading of a completion log
//!
//! [`evaluate`] is a pure, deterministic function with no side effects: the
//! same plan, log, class, and streak always produce the same verdict, and all
//! persistence is the caller's responsibility. It is safe to call from any
//! number of threads without synchronization.
//!
//! The reward is a multiplicative stack:
//!
//! ```text
//! final_xp = floor(base_xp * integrity * effort * safety * synergy * streak)
//! ```
//!
//! - **integrity**: anti-cheat plausibility. Claimed rep volume above the
//!   physical ceiling of 80 reps/minute zeroes the reward outright; finishing
//!   fewer than half the prescribed exercises halves it.
//! - **effort**: step function of prescribed-vs-reported RPE.
//! - **safety**: fixed at 1.0 in the baseline rules. Extension point for
//!   soreness overlap and rank-appropriate intensity ceilings.
//! - **synergy**: +10% when the plan targets the user's class.
//! - **streak**: +2% per consecutive day, capped at +20%.

mod verdict;

pub use verdict::{StatDeltas, Verdict, VerdictStatus};

use crate::error::{Error, Result};
use crate::quest::{CompletionLog, UserClass, WorkoutPlan};

/// Plausibility ceiling in reps per minute for generic bodyweight movement.
const MAX_REPS_PER_MINUTE: u64 = 80;

/// Streak bonus per consecutive day, and its cap.
const STREAK_STEP: f64 = 0.02;
const STREAK_CAP: f64 = 0.20;

/// Class-match bonus factor.
const SYNERGY_BONUS: f64 = 1.1;

/// Grade a completion log against its plan.
///
/// Pure and deterministic. Rejected and Flagged outcomes are returned as
/// verdicts, never as errors.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a log with zero exercises, a plan with
/// zero exercises, a zero duration, an out-of-range RPE, or a `reps_done`
/// value with no parseable leading integer. Validation runs before any
/// scoring so a malformed log can never distort the integrity ratio.
pub fn evaluate(
    plan: &WorkoutPlan,
    log: &CompletionLog,
    user_class: UserClass,
    streak_current: u32,
) -> Result<Verdict> {
    validate(plan, log)?;

    let integrity_score = check_integrity(plan, log)?;
    let effort_score = check_effort(plan, log);
    let safety_score = 1.0;

    let synergy_bonus = if plan.target_class == user_class {
        SYNERGY_BONUS
    } else {
        1.0
    };
    let streak_bonus = 1.0 + (f64::from(streak_current) * STREAK_STEP).min(STREAK_CAP);

    #[allow(clippy::cast_precision_loss)]
    let raw_xp = plan.base_xp as f64
        * integrity_score
        * effort_score
        * safety_score
        * synergy_bonus
        * streak_bonus;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let final_xp = raw_xp.floor().max(0.0) as u64;

    let (status, message) = decide_status(integrity_score, effort_score);

    let stat_deltas = if status == VerdictStatus::Approved {
        StatDeltas {
            strength_add: plan.stat_gain.strength,
            agility_add: plan.stat_gain.agility,
            stamina_add: plan.stat_gain.stamina,
        }
    } else {
        StatDeltas::default()
    };

    Ok(Verdict {
        status,
        integrity_score,
        effort_score,
        safety_score,
        synergy_bonus,
        streak_bonus,
        final_xp,
        message,
        stat_deltas,
    })
}

fn validate(plan: &WorkoutPlan, log: &CompletionLog) -> Result<()> {
    if plan.exercises.is_empty() {
        return Err(Error::Validation(
            "plan contains no exercises".to_string(),
        ));
    }
    if log.exercises_completed.is_empty() {
        return Err(Error::Validation(
            "completion log contains no exercises".to_string(),
        ));
    }
    if log.duration_actual == 0 {
        return Err(Error::Validation(
            "duration_actual must be at least 1 minute".to_string(),
        ));
    }
    if !(1..=10).contains(&log.rpe_actual) {
        return Err(Error::Validation(format!(
            "rpe_actual must be 1-10, got {}",
            log.rpe_actual
        )));
    }
    Ok(())
}

/// Parse a claimed rep count.
///
/// Takes the leading integer so range prescriptions like `"8-12"` resolve to
/// their conservative lower bound. An empty string claims zero reps; a value
/// with no leading digits is a validation failure, never a silent zero.
fn parse_reps(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let digits: String = trimmed
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return Err(Error::Validation(format!(
            "reps_done {raw:?} has no parseable rep count"
        )));
    }
    digits
        .parse::<u64>()
        .map_err(|_| Error::Validation(format!("reps_done {raw:?} overflows a rep count")))
}

/// Anti-cheat plausibility factor: 0.0 (cheat), 0.5 (partial), or 1.0.
fn check_integrity(plan: &WorkoutPlan, log: &CompletionLog) -> Result<f64> {
    let mut total_reps: u64 = 0;
    for outcome in &log.exercises_completed {
        if outcome.skipped {
            continue;
        }
        let reps = parse_reps(&outcome.reps_done)?;
        total_reps = total_reps.saturating_add(u64::from(outcome.sets_done).saturating_mul(reps));
    }

    let max_possible_reps = u64::from(log.duration_actual).saturating_mul(MAX_REPS_PER_MINUTE);
    if total_reps > max_possible_reps {
        return Ok(0.0);
    }

    #[allow(clippy::cast_precision_loss)]
    let completion_ratio = log.completed_count() as f64 / plan.exercises.len() as f64;
    if completion_ratio < 0.5 {
        return Ok(0.5);
    }
    Ok(1.0)
}

/// Exertion factor from the gap between prescribed and reported RPE.
///
/// Non-increasing step function with breakpoints at deltas of 0, 2, and 4.
fn check_effort(plan: &WorkoutPlan, log: &CompletionLog) -> f64 {
    let rpe_sum: u32 = plan
        .exercises
        .iter()
        .map(|exercise| u32::from(exercise.rpe_target))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let avg_target_rpe = f64::from(rpe_sum) / plan.exercises.len() as f64;
    let delta = avg_target_rpe - f64::from(log.rpe_actual);

    if delta < 0.0 {
        1.2 // Worked harder than prescribed
    } else if delta <= 2.0 {
        1.0
    } else if delta <= 4.0 {
        0.8
    } else {
        0.5 // Sandbagging
    }
}

fn decide_status(integrity_score: f64, effort_score: f64) -> (VerdictStatus, String) {
    if integrity_score == 0.0 {
        (
            VerdictStatus::Rejected,
            "ANOMALY DETECTED. Stats rejected. The System does not tolerate deception."
                .to_string(),
        )
    } else if integrity_score < 1.0 {
        (
            VerdictStatus::Flagged,
            "Suspicious activity logged. XP reduced. You are being monitored.".to_string(),
        )
    } else if effort_score >= 1.0 {
        (
            VerdictStatus::Approved,
            "Exceptional effort acknowledged. The System rewards those who push beyond limits."
                .to_string(),
        )
    } else {
        (
            VerdictStatus::Approved,
            "Protocol completed. Continue to prove your worth.".to_string(),
        )
    }
}
