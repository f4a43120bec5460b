//! Experiment runner - one quest cycle, end to end
//!
//! Orchestrates: resolve variant -> generate plan (external collaborator) ->
//! grade the completion log -> feed the outcome into the experiment engine.
//!
//! The propagation policy is asymmetric: evaluation failures block
//! the request (the user must see a pass/fail outcome), while every
//! experiment-tracking failure is logged and swallowed so A/B bookkeeping can
//! never prevent a user from receiving their quest or their verdict.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::evaluation::{evaluate, Verdict};
use crate::experiment::ExperimentEngine;
use crate::progression::RankTier;
use crate::quest::{CompletionLog, UserClass, WorkoutPlan};

/// Input to the external plan generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRequest {
    /// Training class to tailor the plan for
    pub user_class: UserClass,
    /// Difficulty rank to generate at
    pub user_rank: RankTier,
    /// Time the user has available, in minutes
    pub time_window_min: u32,
    /// Equipment available to the user
    pub equipment: Vec<String>,
    /// Muscle groups reported sore, to be avoided
    pub muscle_soreness: Vec<String>,
}

/// Seam to the external generative collaborator.
///
/// The runner only measures this call's latency; timeout and retry policy
/// belong to the implementation behind it.
pub trait PlanGenerator: Send + Sync {
    /// Produce a workout plan for the request.
    fn generate(&self, request: &QuestRequest)
        -> impl Future<Output = Result<WorkoutPlan>> + Send;
}

/// A generated quest plus the experiment bookkeeping it was produced under.
#[derive(Debug, Clone)]
pub struct GeneratedQuest {
    /// The plan from the external generator
    pub plan: WorkoutPlan,
    /// Variant the user was assigned to, if an experiment was active
    pub variant_id: Option<String>,
    /// Wall-clock generation latency, in milliseconds
    pub generation_ms: u64,
}

/// Experiment bookkeeping carried from generation to evaluation.
#[derive(Debug, Clone, Default)]
pub struct ExperimentContext {
    /// Active experiment, if any
    pub experiment_id: Option<String>,
    /// Variant assigned at generation time, if any
    pub variant_id: Option<String>,
    /// Generation latency measured earlier in the cycle, in milliseconds
    pub generation_ms: u64,
}

/// Orchestrates quest generation and evaluation around the experiment engine.
pub struct ExperimentRunner<G> {
    generator: G,
    engine: Arc<ExperimentEngine>,
}

impl<G: PlanGenerator> ExperimentRunner<G> {
    /// Create a runner over a generator and a shared engine.
    pub fn new(generator: G, engine: Arc<ExperimentEngine>) -> Self {
        Self { generator, engine }
    }

    /// Shared engine handle.
    #[must_use]
    pub fn engine(&self) -> &Arc<ExperimentEngine> {
        &self.engine
    }

    /// Generate a quest, resolving the user's variant first when an
    /// experiment is designated.
    ///
    /// Assignment failure is logged and the flow proceeds without
    /// experimentation; only generator failure propagates.
    ///
    /// # Errors
    ///
    /// Returns the generator's error unchanged.
    pub async fn run_quest_generation(
        &self,
        user_id: &str,
        request: &QuestRequest,
        experiment_id: Option<&str>,
    ) -> Result<GeneratedQuest> {
        let variant_id = experiment_id.and_then(|id| self.try_assign(id, user_id));

        let start = Instant::now();
        let plan = self.generator.generate(request).await?;
        let generation_ms = elapsed_ms(start);

        debug!(
            %user_id,
            quest = %plan.quest_name,
            variant = variant_id.as_deref().unwrap_or("none"),
            generation_ms,
            "quest generated"
        );
        Ok(GeneratedQuest {
            plan,
            variant_id,
            generation_ms,
        })
    }

    /// Grade a completion log and, when a variant is assigned, feed the
    /// outcome into the experiment engine.
    ///
    /// When no variant was carried over from generation the runner tries to
    /// assign one lazily. Tracking failures are logged and swallowed;
    /// evaluation failures propagate so the user always sees an outcome.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] from the evaluation engine for a
    /// malformed log.
    pub fn run_quest_evaluation(
        &self,
        user_id: &str,
        plan: &WorkoutPlan,
        log: &CompletionLog,
        user_class: UserClass,
        streak_current: u32,
        context: &ExperimentContext,
    ) -> Result<Verdict> {
        let variant_id = context.variant_id.clone().or_else(|| {
            context
                .experiment_id
                .as_deref()
                .and_then(|id| self.try_assign(id, user_id))
        });

        let start = Instant::now();
        let verdict = evaluate(plan, log, user_class, streak_current)?;
        let evaluation_ms = elapsed_ms(start);

        if let (Some(experiment_id), Some(variant_id)) =
            (context.experiment_id.as_deref(), variant_id)
        {
            let total_ms = context.generation_ms + evaluation_ms;
            #[allow(clippy::cast_precision_loss)]
            let result = self.engine.record_observation(
                experiment_id,
                &variant_id,
                verdict.is_success(),
                verdict.overall_score(),
                total_ms as f64,
            );
            match result {
                Ok(()) => debug!(
                    %experiment_id,
                    %variant_id,
                    success = verdict.is_success(),
                    score = verdict.overall_score(),
                    total_ms,
                    "observation recorded"
                ),
                Err(error) => warn!(
                    %experiment_id,
                    %variant_id,
                    %error,
                    "failed to track experiment metric"
                ),
            }
        }
        Ok(verdict)
    }

    /// Assignment failures never block the user-facing flow.
    fn try_assign(&self, experiment_id: &str, user_id: &str) -> Option<String> {
        match self.engine.assign_variant(experiment_id, user_id) {
            Ok(variant_id) => Some(variant_id),
            Err(error) => {
                warn!(%experiment_id, %user_id, %error, "failed to assign variant");
                None
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{ExperimentConfig, TargetMetric};
    use crate::quest::{Exercise, ExerciseKind, ExerciseOutcome, ProofType, QuestType, StatGain};

    struct StubGenerator;

    impl PlanGenerator for StubGenerator {
        async fn generate(&self, request: &QuestRequest) -> Result<WorkoutPlan> {
            Ok(WorkoutPlan {
                quest_name: "Stub Quest".to_string(),
                quest_rank: request.user_rank,
                quest_type: QuestType::Daily,
                base_xp: 100,
                stat_gain: StatGain::default(),
                estimated_duration_min: request.time_window_min,
                target_class: request.user_class,
                requires_proof: false,
                proof_type: ProofType::None,
                exercises: vec![Exercise {
                    id: "ex-1".to_string(),
                    name: "Push-up".to_string(),
                    kind: ExerciseKind::Compound,
                    sets: 3,
                    reps: "10".to_string(),
                    rest_sec: 60,
                    rpe_target: 7,
                    target_muscle: "Chest".to_string(),
                    tips: None,
                }],
            })
        }
    }

    fn request() -> QuestRequest {
        QuestRequest {
            user_class: UserClass::Novice,
            user_rank: RankTier::E,
            time_window_min: 30,
            equipment: vec![],
            muscle_soreness: vec![],
        }
    }

    fn log() -> CompletionLog {
        CompletionLog {
            quest_id: "q-1".to_string(),
            duration_actual: 25,
            rpe_actual: 7,
            exercises_completed: vec![ExerciseOutcome {
                exercise_id: "ex-1".to_string(),
                sets_done: 3,
                reps_done: "10".to_string(),
                skipped: false,
            }],
            user_feedback: None,
            proof_media_url: None,
            proof_type: ProofType::None,
        }
    }

    fn engine_with_experiment() -> Arc<ExperimentEngine> {
        let engine = Arc::new(ExperimentEngine::new());
        engine
            .create_experiment(ExperimentConfig {
                id: "exp-1".to_string(),
                name: "Test".to_string(),
                description: None,
                variants: vec!["control".to_string(), "treatment".to_string()],
                target_metric: TargetMetric::SuccessRate,
                min_sample_size: 100,
            })
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_generation_without_experiment() {
        let runner = ExperimentRunner::new(StubGenerator, Arc::new(ExperimentEngine::new()));
        let quest = runner
            .run_quest_generation("user-1", &request(), None)
            .await
            .unwrap();
        assert!(quest.variant_id.is_none());
        assert_eq!(quest.plan.quest_name, "Stub Quest");
    }

    #[tokio::test]
    async fn test_generation_survives_unknown_experiment() {
        let runner = ExperimentRunner::new(StubGenerator, Arc::new(ExperimentEngine::new()));
        let quest = runner
            .run_quest_generation("user-1", &request(), Some("missing"))
            .await
            .unwrap();
        assert!(quest.variant_id.is_none());
    }

    #[tokio::test]
    async fn test_full_cycle_records_observation() {
        let engine = engine_with_experiment();
        let runner = ExperimentRunner::new(StubGenerator, Arc::clone(&engine));

        let quest = runner
            .run_quest_generation("user-1", &request(), Some("exp-1"))
            .await
            .unwrap();
        let variant_id = quest.variant_id.clone().unwrap();

        let context = ExperimentContext {
            experiment_id: Some("exp-1".to_string()),
            variant_id: quest.variant_id,
            generation_ms: quest.generation_ms,
        };
        let verdict = runner
            .run_quest_evaluation(
                "user-1",
                &quest.plan,
                &log(),
                UserClass::Novice,
                0,
                &context,
            )
            .unwrap();
        assert!(verdict.is_success());

        let experiment = engine.experiment("exp-1").unwrap();
        assert_eq!(experiment.metrics.total_runs, 1);
        let index = experiment.variant_index(&variant_id).unwrap();
        assert_eq!(experiment.variants[index].sample_size, 1);
    }

    #[tokio::test]
    async fn test_evaluation_swallows_tracking_failure() {
        let runner = ExperimentRunner::new(StubGenerator, Arc::new(ExperimentEngine::new()));
        let quest = runner
            .run_quest_generation("user-1", &request(), None)
            .await
            .unwrap();

        // Experiment never existed; variant carried from a stale context.
        let context = ExperimentContext {
            experiment_id: Some("gone".to_string()),
            variant_id: Some("control".to_string()),
            generation_ms: 5,
        };
        let verdict = runner
            .run_quest_evaluation(
                "user-1",
                &quest.plan,
                &log(),
                UserClass::Novice,
                0,
                &context,
            )
            .unwrap();
        assert!(verdict.is_success());
    }
}
