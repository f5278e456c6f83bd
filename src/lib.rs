//! Varsity Ladder - skill rating engine for university esports leagues
//!
//! This crate ingests 5v5 match results, maintains TrueSkill-based player
//! ratings, estimates matchup fairness, and derives deterministic
//! leaderboards. Transport, auth, and the persistence schema are external
//! collaborators.

pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod leaderboard;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use config::EngineConfig;
pub use error::{RatingEngineError, Result};
pub use types::*;

// Re-export key components
pub use engine::RatingEngine;
pub use ingest::{IngestionPipeline, PipelineStats};
pub use leaderboard::{build_leaderboard, LeaderboardCache};
pub use rating::{InMemoryRatingStore, RatingCalculator, RatingStore, TrueSkillRatingCalculator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
