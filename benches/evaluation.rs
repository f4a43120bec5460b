//! Grading and significance benchmarks
//!
//! The evaluation path runs on every workout submission and the significance
//! check runs under the experiment entry guard, so both are hot.
//!
//! Run with: cargo bench --bench evaluation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ascend_core::evaluation::evaluate;
use ascend_core::experiment::{two_proportion_z_test, ExperimentConfig, ExperimentEngine, TargetMetric};
use ascend_core::progression::{level_from_xp, RankTier};
use ascend_core::quest::{
    CompletionLog, Exercise, ExerciseKind, ExerciseOutcome, ProofType, QuestType, StatGain,
    UserClass, WorkoutPlan,
};

fn plan(exercise_count: usize) -> WorkoutPlan {
    WorkoutPlan {
        quest_name: "Bench Quest".to_string(),
        quest_rank: RankTier::C,
        quest_type: QuestType::Daily,
        base_xp: 500,
        stat_gain: StatGain::default(),
        estimated_duration_min: 45,
        target_class: UserClass::Tank,
        requires_proof: false,
        proof_type: ProofType::None,
        exercises: (0..exercise_count)
            .map(|i| Exercise {
                id: i.to_string(),
                name: format!("Exercise {i}"),
                kind: ExerciseKind::Compound,
                sets: 4,
                reps: "8-12".to_string(),
                rest_sec: 90,
                rpe_target: 8,
                target_muscle: "Back".to_string(),
                tips: None,
            })
            .collect(),
    }
}

fn log(exercise_count: usize) -> CompletionLog {
    CompletionLog {
        quest_id: "q-bench".to_string(),
        duration_actual: 42,
        rpe_actual: 8,
        exercises_completed: (0..exercise_count)
            .map(|i| ExerciseOutcome {
                exercise_id: i.to_string(),
                sets_done: 4,
                reps_done: "10".to_string(),
                skipped: false,
            })
            .collect(),
        user_feedback: None,
        proof_media_url: None,
        proof_type: ProofType::None,
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for exercise_count in [1_usize, 6, 20] {
        let plan = plan(exercise_count);
        let log = log(exercise_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(exercise_count),
            &(plan, log),
            |b, (plan, log)| {
                b.iter(|| evaluate(black_box(plan), black_box(log), UserClass::Tank, 12));
            },
        );
    }
    group.finish();
}

fn bench_record_observation(c: &mut Criterion) {
    let engine = ExperimentEngine::new();
    engine
        .create_experiment(ExperimentConfig {
            id: "bench".to_string(),
            name: "Bench".to_string(),
            description: None,
            variants: vec!["control".to_string(), "treatment".to_string()],
            target_metric: TargetMetric::SuccessRate,
            min_sample_size: u64::MAX,
        })
        .unwrap();

    c.bench_function("record_observation", |b| {
        b.iter(|| {
            engine
                .record_observation("bench", black_box("control"), true, 0.87, 640.0)
                .unwrap();
        });
    });
}

fn bench_z_test(c: &mut Criterion) {
    c.bench_function("two_proportion_z_test", |b| {
        b.iter(|| {
            two_proportion_z_test(
                black_box(0.62),
                black_box(4_812),
                black_box(0.57),
                black_box(5_031),
            )
        });
    });
}

fn bench_level_from_xp(c: &mut Criterion) {
    c.bench_function("level_from_xp", |b| {
        b.iter(|| level_from_xp(black_box(1_234_567)));
    });
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_record_observation,
    bench_z_test,
    bench_level_from_xp
);
criterion_main!(benches);
