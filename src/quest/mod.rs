//! Quest data model
//!
//! Immutable value types exchanged with the excluded collaborators: the plan
//! produced by the external generator, the completion log submitted by the
//! user-facing flow, and the profile aggregate read from the store.
//!
//! ```text
//! WorkoutPlan (generator) ──┐
//!                           ├──> evaluation::evaluate ──> Verdict
//! CompletionLog (user) ─────┘
//! ```
//!
//! All types derive serde so the caller can persist them however it likes;
//! nothing in this module performs I/O.

mod log;
mod plan;
mod profile;

pub use log::{CompletionLog, ExerciseOutcome};
pub use plan::{Exercise, ExerciseKind, ProofType, QuestType, StatGain, WorkoutPlan};
pub use profile::{ProfileAggregate, UserClass};
