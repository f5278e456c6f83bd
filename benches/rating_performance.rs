//! Performance benchmarks for rating calculations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use varsity_ladder::rating::calculator::RatingCalculator;
use varsity_ladder::rating::TrueSkillRatingCalculator;
use varsity_ladder::types::{MatchOutcome, MatchResult, PlayerRating, Rating};
use varsity_ladder::utils::{current_timestamp, generate_match_id};
use varsity_ladder::{
    build_leaderboard, EngineConfig, InMemoryRatingStore, RatingEngine,
};

fn bench_teams(size: usize) -> (Vec<PlayerRating>, Vec<PlayerRating>) {
    let now = current_timestamp();
    let build = |prefix: &str| {
        (0..size)
            .map(|i| {
                let mut record = PlayerRating::new(
                    format!("{}_{}", prefix, i),
                    Rating {
                        mu: 23.0 + i as f64,
                        sigma: 4.0 + (i % 3) as f64,
                    },
                    now,
                );
                record.games_played = 10 + i as u64;
                record
            })
            .collect::<Vec<_>>()
    };
    (build("a"), build("b"))
}

fn bench_rating_update_5v5(c: &mut Criterion) {
    let calculator = TrueSkillRatingCalculator::new(EngineConfig::default()).unwrap();
    let (team_a, team_b) = bench_teams(5);
    let now = current_timestamp();

    c.bench_function("rating_update_5v5", |b| {
        b.iter(|| {
            black_box(calculator.rate_match(
                &team_a,
                &team_b,
                MatchOutcome::TeamAWin,
                now,
            ))
        })
    });
}

fn bench_match_quality_5v5(c: &mut Criterion) {
    let calculator = TrueSkillRatingCalculator::new(EngineConfig::default()).unwrap();
    let (team_a, team_b) = bench_teams(5);
    let ratings_a: Vec<Rating> = team_a.iter().map(|r| r.rating).collect();
    let ratings_b: Vec<Rating> = team_b.iter().map(|r| r.rating).collect();

    c.bench_function("match_quality_5v5", |b| {
        b.iter(|| black_box(calculator.match_quality(&ratings_a, &ratings_b)))
    });
}

fn bench_leaderboard_build(c: &mut Criterion) {
    let config = EngineConfig::default();
    let now = current_timestamp();
    let population: Vec<PlayerRating> = (0..1000)
        .map(|i| {
            let mut record = PlayerRating::new(
                format!("player_{:04}", i),
                Rating {
                    mu: 15.0 + (i % 20) as f64,
                    sigma: 1.0 + (i % 7) as f64,
                },
                now,
            );
            record.games_played = (i % 50) as u64;
            record
        })
        .collect();

    c.bench_function("leaderboard_build_1000", |b| {
        b.iter(|| black_box(build_leaderboard(&population, &config)))
    });
}

fn bench_match_ingestion(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("match_ingestion_5v5", |b| {
        b.iter(|| {
            rt.block_on(async {
                let engine = RatingEngine::new(
                    Arc::new(InMemoryRatingStore::new()),
                    EngineConfig::default(),
                )
                .unwrap();

                let result = MatchResult {
                    match_id: generate_match_id(),
                    team_a: (0..5).map(|i| format!("a_{}", i)).collect(),
                    team_b: (0..5).map(|i| format!("b_{}", i)).collect(),
                    outcome: MatchOutcome::TeamAWin,
                    played_at: current_timestamp(),
                };

                black_box(engine.submit_match(result).await)
            })
        })
    });
}

criterion_group!(
    benches,
    bench_rating_update_5v5,
    bench_match_quality_5v5,
    bench_leaderboard_build,
    bench_match_ingestion
);
criterion_main!(benches);
