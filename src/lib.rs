//! # ASCEND Core: Workout Integrity & Progression Engine
//!
//! Rule-based grading of self-reported workout completions, level/rank
//! progression curves, and a statistical A/B experimentation engine for
//! comparing grading-rule variants.
//!
//! The crate is the algorithmic core of a fitness-gamification product:
//! the surrounding product generates workout "quests", users submit
//! completion logs, and this core decides, without a human reviewer, how
//! much reward to grant and whether the submission looks honest.
//!
//! ## Components
//!
//! - [`evaluation`] - pure grading of one [`quest::CompletionLog`] against its
//!   [`quest::WorkoutPlan`], producing a trust-weighted [`evaluation::Verdict`]
//! - [`progression`] - XP-to-level curve inversion and rank-tier mapping
//! - [`experiment`] - per-experiment running statistics, sticky variant
//!   assignment, and two-proportion z-test significance checks
//! - [`runner`] - orchestration of one quest cycle, feeding graded outcomes
//!   into an active experiment
//!
//! ## Example
//!
//! ```rust
//! use ascend_core::evaluation::evaluate;
//! use ascend_core::quest::{CompletionLog, UserClass, WorkoutPlan};
//!
//! # fn demo(plan: WorkoutPlan, log: CompletionLog) -> ascend_core::Result<()> {
//! let verdict = evaluate(&plan, &log, UserClass::Tank, 10)?;
//! println!("{}: {} XP", verdict.message, verdict.final_xp);
//! # Ok(())
//! # }
//! ```
//!
//! Persistence, transport, authentication, and plan generation are owned by
//! the caller; everything here is in-process and side-effect free except for
//! the experiment engine's own in-memory aggregates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod evaluation;
pub mod experiment;
pub mod progression;
pub mod quest;
pub mod runner;

pub use error::{Error, Result};
