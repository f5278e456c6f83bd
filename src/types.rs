//! Common types used throughout the rating engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillRating;
use skillratings::Outcomes;
use uuid::Uuid;

/// Unique identifier for players, owned by the external player registry
pub type PlayerId = String;

/// Unique identifier for matches, used as the idempotency key
pub type MatchId = Uuid;

/// Latent skill belief: mean estimate and uncertainty (standard deviation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub mu: f64,
    pub sigma: f64,
}

impl Rating {
    /// Conservative single-number score that penalizes uncertainty
    pub fn conservative(&self, k: f64) -> f64 {
        self.mu - k * self.sigma
    }
}

impl From<TrueSkillRating> for Rating {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mu: rating.rating,
            sigma: rating.uncertainty,
        }
    }
}

impl From<Rating> for TrueSkillRating {
    fn from(rating: Rating) -> Self {
        Self {
            rating: rating.mu,
            uncertainty: rating.sigma,
        }
    }
}

/// A player's persisted rating snapshot with bookkeeping
///
/// Snapshots are immutable: the update rule always produces a fresh record
/// via [`PlayerRating::with_rating`], so callers can diff before/after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub player_id: PlayerId,
    pub rating: Rating,
    pub games_played: u64,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PlayerRating {
    /// Create a record for a player seen for the first time
    pub fn new(player_id: PlayerId, rating: Rating, at: DateTime<Utc>) -> Self {
        Self {
            player_id,
            rating,
            games_played: 0,
            updated_at: at,
            created_at: at,
        }
    }

    /// Derive the post-match snapshot: new rating, one more game, new timestamp
    pub fn with_rating(&self, rating: Rating, at: DateTime<Utc>) -> Self {
        Self {
            player_id: self.player_id.clone(),
            rating,
            games_played: self.games_played + 1,
            updated_at: at,
            created_at: self.created_at,
        }
    }
}

/// Result of a completed match from team A's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    TeamAWin,
    TeamBWin,
    Draw,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::TeamAWin => write!(f, "TeamAWin"),
            MatchOutcome::TeamBWin => write!(f, "TeamBWin"),
            MatchOutcome::Draw => write!(f, "Draw"),
        }
    }
}

impl From<MatchOutcome> for Outcomes {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::TeamAWin => Outcomes::WIN,
            MatchOutcome::TeamBWin => Outcomes::LOSS,
            MatchOutcome::Draw => Outcomes::DRAW,
        }
    }
}

/// A submitted match result, immutable once constructed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: MatchId,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub outcome: MatchOutcome,
    pub played_at: DateTime<Utc>,
}

impl MatchResult {
    /// All participants, team A first
    pub fn participants(&self) -> Vec<PlayerId> {
        self.team_a
            .iter()
            .chain(self.team_b.iter())
            .cloned()
            .collect()
    }
}

/// One row of a built leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub player_id: PlayerId,
    pub conservative_score: f64,
    /// 1-based position; strictly unique within a board
    pub rank: u32,
    pub rating: Rating,
    pub games_played: u64,
    /// Positions climbed (positive) or dropped (negative) since the previous board
    pub rank_delta: Option<i64>,
    /// Player was absent from the previous board
    pub is_new: bool,
}

/// Outcome of submitting a match to the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    /// Post-match snapshots for every participant, team A first
    pub updated: Vec<PlayerRating>,
    /// The match id had already been applied; no ratings changed
    pub already_processed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::current_timestamp;

    #[test]
    fn test_conservative_score() {
        let rating = Rating {
            mu: 25.0,
            sigma: 8.0,
        };
        assert_eq!(rating.conservative(3.0), 1.0);
        assert_eq!(rating.conservative(0.0), 25.0);
    }

    #[test]
    fn test_trueskill_conversions() {
        let rating = Rating {
            mu: 27.5,
            sigma: 6.25,
        };
        let ts: TrueSkillRating = rating.into();
        assert_eq!(ts.rating, 27.5);
        assert_eq!(ts.uncertainty, 6.25);

        let back: Rating = ts.into();
        assert_eq!(back, rating);
    }

    #[test]
    fn test_outcome_conversion() {
        assert_eq!(Outcomes::from(MatchOutcome::TeamAWin), Outcomes::WIN);
        assert_eq!(Outcomes::from(MatchOutcome::TeamBWin), Outcomes::LOSS);
        assert_eq!(Outcomes::from(MatchOutcome::Draw), Outcomes::DRAW);
    }

    #[test]
    fn test_with_rating_produces_new_snapshot() {
        let now = current_timestamp();
        let original = PlayerRating::new(
            "player1".to_string(),
            Rating {
                mu: 25.0,
                sigma: 8.333,
            },
            now,
        );

        let later = now + chrono::Duration::hours(2);
        let updated = original.with_rating(
            Rating {
                mu: 27.0,
                sigma: 7.5,
            },
            later,
        );

        // Original snapshot is untouched
        assert_eq!(original.games_played, 0);
        assert_eq!(original.rating.mu, 25.0);

        assert_eq!(updated.games_played, 1);
        assert_eq!(updated.rating.mu, 27.0);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn test_participants_order() {
        let result = MatchResult {
            match_id: crate::utils::generate_match_id(),
            team_a: vec!["a1".to_string(), "a2".to_string()],
            team_b: vec!["b1".to_string(), "b2".to_string()],
            outcome: MatchOutcome::Draw,
            played_at: current_timestamp(),
        };

        assert_eq!(result.participants(), vec!["a1", "a2", "b1", "b2"]);
    }
}
