//! Rating system built on the TrueSkill algorithm
//!
//! This module provides the Bayesian update rule, match quality estimation,
//! and the storage interface toward the persistence collaborator.

pub mod calculator;
pub mod storage;
pub mod trueskill;

// Re-export commonly used types
pub use calculator::RatingCalculator;
pub use storage::{InMemoryRatingStore, RatingBatch, RatingStore, SaveOutcome};
pub use trueskill::TrueSkillRatingCalculator;
