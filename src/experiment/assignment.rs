//! Sticky variant assignments
//!
//! An explicit keyed store `(experiment_id, user_id) -> variant_id` with an
//! atomic get-or-create. Once a pair is assigned it never changes for the life
//! of the experiment, independent of call order or process restarts: the
//! candidate value is a deterministic hash, so even a racing re-create lands
//! on the same variant.

use std::hash::Hasher;

use dashmap::DashMap;
use rustc_hash::FxHasher;

/// Deterministic, seed-free hash used to spread users across variants.
///
/// `FxHasher` carries no per-process random state, so the same
/// user/experiment pair hashes identically across restarts.
#[must_use]
pub fn assignment_hash(user_id: &str, experiment_id: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(user_id.as_bytes());
    hasher.write(b"-");
    hasher.write(experiment_id.as_bytes());
    hasher.finish()
}

/// Concurrent store of sticky `(experiment, user) -> variant` mappings.
#[derive(Debug, Default)]
pub struct AssignmentStore {
    assignments: DashMap<(String, String), String>,
}

impl AssignmentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing assignment for a pair, if any.
    #[must_use]
    pub fn get(&self, experiment_id: &str, user_id: &str) -> Option<String> {
        self.assignments
            .get(&(experiment_id.to_string(), user_id.to_string()))
            .map(|entry| entry.value().clone())
    }

    /// Return the stored assignment for a pair, creating it from `candidate`
    /// on first use. The entry guard makes get-or-create atomic; concurrent
    /// callers all observe the same final value.
    #[must_use]
    pub fn get_or_insert(&self, experiment_id: &str, user_id: &str, candidate: String) -> String {
        self.assignments
            .entry((experiment_id.to_string(), user_id.to_string()))
            .or_insert(candidate)
            .clone()
    }

    /// Number of stored assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the store holds no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
