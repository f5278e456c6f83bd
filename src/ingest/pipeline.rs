//! Match ingestion pipeline
//!
//! Processing walks a fixed path per match: received, validated, ratings
//! fetched, computed, persisted. Any failure before the persist step leaves
//! stored ratings untouched. Commits are optimistic: a conflicting
//! concurrent update restarts the cycle from a fresh read, a bounded number
//! of times.

use crate::config::EngineConfig;
use crate::error::{RatingEngineError, Result};
use crate::leaderboard::cache::LeaderboardCache;
use crate::rating::calculator::RatingCalculator;
use crate::rating::storage::{ExpectedVersion, RatingBatch, RatingStore, SaveOutcome};
use crate::types::{MatchResult, PlayerId, PlayerRating, SubmissionOutcome};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Statistics about pipeline operations
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Matches applied to the rating store
    pub matches_ingested: u64,
    /// Submissions short-circuited by the idempotency check
    pub duplicate_submissions: u64,
    /// Optimistic conflicts that triggered a retry
    pub conflicts_retried: u64,
    /// Submissions rejected by structural validation
    pub matches_rejected: u64,
}

/// Structural validation of a submitted match
///
/// Fails fast, before any rating is touched: empty team, unequal sizes, or
/// a player fielded twice.
pub fn validate_match(result: &MatchResult) -> Result<()> {
    validate_rosters(&result.team_a, &result.team_b)
}

/// Roster checks shared by ingestion and quality estimation
pub(crate) fn validate_rosters(team_a: &[PlayerId], team_b: &[PlayerId]) -> Result<()> {
    if team_a.is_empty() || team_b.is_empty() {
        return Err(RatingEngineError::InvalidMatch {
            reason: "teams must not be empty".to_string(),
        }
        .into());
    }
    if team_a.len() != team_b.len() {
        return Err(RatingEngineError::InvalidMatch {
            reason: format!("team sizes differ: {} vs {}", team_a.len(), team_b.len()),
        }
        .into());
    }

    let mut seen = HashSet::new();
    for player_id in team_a.iter().chain(team_b.iter()) {
        if !seen.insert(player_id.as_str()) {
            return Err(RatingEngineError::InvalidMatch {
                reason: format!("player {} appears more than once", player_id),
            }
            .into());
        }
    }

    Ok(())
}

/// The match ingestion pipeline
pub struct IngestionPipeline {
    store: Arc<dyn RatingStore>,
    calculator: Arc<dyn RatingCalculator>,
    leaderboard: Arc<LeaderboardCache>,
    config: EngineConfig,
    stats: Arc<RwLock<PipelineStats>>,
}

impl IngestionPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        store: Arc<dyn RatingStore>,
        calculator: Arc<dyn RatingCalculator>,
        leaderboard: Arc<LeaderboardCache>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            calculator,
            leaderboard,
            config,
            stats: Arc::new(RwLock::new(PipelineStats::default())),
        }
    }

    /// Apply a submitted match exactly once
    ///
    /// Returns the post-match snapshots for every participant, or the
    /// currently stored snapshots with `already_processed: true` when the
    /// match id was applied before.
    pub async fn submit_match(&self, result: MatchResult) -> Result<SubmissionOutcome> {
        debug!(match_id = %result.match_id, "match received");

        if let Err(error) = validate_match(&result) {
            self.bump(|stats| stats.matches_rejected += 1);
            return Err(error);
        }
        debug!(match_id = %result.match_id, "match validated");

        if self.store.is_match_processed(&result.match_id).await? {
            return self.already_processed(&result).await;
        }

        let participants = result.participants();
        for attempt in 1..=self.config.max_save_attempts {
            let stored = self.store.load_ratings(&participants).await?;
            debug!(match_id = %result.match_id, attempt, "ratings fetched");

            let mut expected: HashMap<PlayerId, Option<ExpectedVersion>> = HashMap::new();
            let team_a = self.resolve_team(&result.team_a, &stored, &mut expected, result.played_at);
            let team_b = self.resolve_team(&result.team_b, &stored, &mut expected, result.played_at);

            let updated = self.calculator.rate_match(
                &team_a,
                &team_b,
                result.outcome,
                result.played_at,
            )?;
            debug!(match_id = %result.match_id, "ratings computed");

            let batch = RatingBatch {
                match_id: result.match_id,
                expected,
                updated: updated.clone(),
            };
            match self.store.save_ratings(batch).await? {
                SaveOutcome::Committed => {
                    self.leaderboard.invalidate().await;
                    self.bump(|stats| stats.matches_ingested += 1);
                    info!(
                        match_id = %result.match_id,
                        players = updated.len(),
                        outcome = %result.outcome,
                        "match persisted"
                    );
                    return Ok(SubmissionOutcome {
                        updated,
                        already_processed: false,
                    });
                }
                SaveOutcome::AlreadyProcessed => {
                    return self.already_processed(&result).await;
                }
                SaveOutcome::Conflict => {
                    self.bump(|stats| stats.conflicts_retried += 1);
                    warn!(
                        match_id = %result.match_id,
                        attempt,
                        "optimistic conflict, retrying from a fresh read"
                    );
                }
            }
        }

        Err(RatingEngineError::ConcurrencyConflict {
            message: format!(
                "match {} still conflicted after {} attempts",
                result.match_id, self.config.max_save_attempts
            ),
        }
        .into())
    }

    /// Snapshot of pipeline statistics
    pub fn stats(&self) -> PipelineStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Current snapshots for known players, default priors for first-timers
    fn resolve_team(
        &self,
        roster: &[PlayerId],
        stored: &HashMap<PlayerId, PlayerRating>,
        expected: &mut HashMap<PlayerId, Option<ExpectedVersion>>,
        played_at: DateTime<Utc>,
    ) -> Vec<PlayerRating> {
        roster
            .iter()
            .map(|player_id| match stored.get(player_id) {
                Some(record) => {
                    expected.insert(player_id.clone(), Some(ExpectedVersion::from(record)));
                    record.clone()
                }
                None => {
                    expected.insert(player_id.clone(), None);
                    PlayerRating::new(
                        player_id.clone(),
                        self.calculator.initial_rating(),
                        played_at,
                    )
                }
            })
            .collect()
    }

    async fn already_processed(&self, result: &MatchResult) -> Result<SubmissionOutcome> {
        self.bump(|stats| stats.duplicate_submissions += 1);
        debug!(match_id = %result.match_id, "duplicate submission, returning stored ratings");

        let participants = result.participants();
        let stored = self.store.load_ratings(&participants).await?;
        let updated = participants
            .iter()
            .filter_map(|player_id| stored.get(player_id).cloned())
            .collect();

        Ok(SubmissionOutcome {
            updated,
            already_processed: true,
        })
    }

    fn bump<F: FnOnce(&mut PipelineStats)>(&self, apply: F) {
        if let Ok(mut stats) = self.stats.write() {
            apply(&mut stats);
        }
    }
}
