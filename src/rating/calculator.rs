//! Rating calculator trait
//!
//! This module defines the interface for the Bayesian update rule and match
//! quality estimation, so the ingestion pipeline stays independent of the
//! concrete rating algorithm.

use crate::types::{MatchOutcome, PlayerRating, Rating};
use chrono::{DateTime, Utc};

/// Trait for computing rating updates and matchup quality
///
/// Implementations must be pure: for fixed inputs and configuration the
/// output is bit-identical across invocations. Idempotency at the match-id
/// level is the ingestion pipeline's responsibility, not the calculator's.
pub trait RatingCalculator: Send + Sync {
    /// Compute new ratings for every participant of a completed match
    ///
    /// # Arguments
    /// * `team_a`, `team_b` - current snapshots for each roster, equal size
    /// * `outcome` - match result from team A's perspective
    /// * `played_at` - match timestamp; drives inactivity decay and becomes
    ///   the `updated_at` of every returned snapshot
    ///
    /// # Returns
    /// One new `PlayerRating` per participant, team A first.
    fn rate_match(
        &self,
        team_a: &[PlayerRating],
        team_b: &[PlayerRating],
        outcome: MatchOutcome,
        played_at: DateTime<Utc>,
    ) -> crate::error::Result<Vec<PlayerRating>>;

    /// Probability in [0, 1] of a close/draw-like outcome for a prospective matchup
    fn match_quality(&self, team_a: &[Rating], team_b: &[Rating])
        -> crate::error::Result<f64>;

    /// Win probability for each side of a prospective matchup
    fn expected_score(
        &self,
        team_a: &[Rating],
        team_b: &[Rating],
    ) -> crate::error::Result<(f64, f64)>;

    /// Default prior for players seen for the first time
    fn initial_rating(&self) -> Rating;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}
