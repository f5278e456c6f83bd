//! Engine facade
//!
//! Wires the calculator, storage collaborator, leaderboard cache, and
//! ingestion pipeline together and exposes the operations the web layer
//! consumes.

use crate::config::EngineConfig;
use crate::error::{RatingEngineError, Result};
use crate::ingest::pipeline::{validate_rosters, IngestionPipeline, PipelineStats};
use crate::leaderboard::cache::LeaderboardCache;
use crate::rating::calculator::RatingCalculator;
use crate::rating::storage::RatingStore;
use crate::rating::trueskill::TrueSkillRatingCalculator;
use crate::types::{MatchResult, PlayerId, PlayerRating, RankedEntry, Rating, SubmissionOutcome};
use std::sync::Arc;

/// The rating engine: skill updates, matchup quality, and leaderboards
pub struct RatingEngine {
    store: Arc<dyn RatingStore>,
    calculator: Arc<dyn RatingCalculator>,
    leaderboard: Arc<LeaderboardCache>,
    pipeline: IngestionPipeline,
    config: EngineConfig,
}

impl RatingEngine {
    /// Create an engine with the TrueSkill calculator
    pub fn new(store: Arc<dyn RatingStore>, config: EngineConfig) -> Result<Self> {
        let calculator: Arc<dyn RatingCalculator> =
            Arc::new(TrueSkillRatingCalculator::new(config.clone())?);
        Self::with_calculator(store, calculator, config)
    }

    /// Create an engine with a custom rating calculator
    pub fn with_calculator(
        store: Arc<dyn RatingStore>,
        calculator: Arc<dyn RatingCalculator>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let leaderboard = Arc::new(LeaderboardCache::new());
        let pipeline = IngestionPipeline::new(
            Arc::clone(&store),
            Arc::clone(&calculator),
            Arc::clone(&leaderboard),
            config.clone(),
        );

        Ok(Self {
            store,
            calculator,
            leaderboard,
            pipeline,
            config,
        })
    }

    /// Ingest a completed match exactly once
    pub async fn submit_match(&self, result: MatchResult) -> Result<SubmissionOutcome> {
        self.pipeline.submit_match(result).await
    }

    /// Draw-likelihood score in [0, 1] for a prospective pairing
    ///
    /// Players without a stored rating are evaluated at the default prior,
    /// matching how the pipeline treats their first real match.
    pub async fn estimate_match_quality(
        &self,
        team_a: &[PlayerId],
        team_b: &[PlayerId],
    ) -> Result<f64> {
        validate_rosters(team_a, team_b)?;

        let participants: Vec<PlayerId> = team_a.iter().chain(team_b.iter()).cloned().collect();
        let stored = self.store.load_ratings(&participants).await?;
        let resolve = |player_id: &PlayerId| -> Rating {
            stored
                .get(player_id)
                .map(|record| record.rating)
                .unwrap_or_else(|| self.calculator.initial_rating())
        };

        let ratings_a: Vec<Rating> = team_a.iter().map(resolve).collect();
        let ratings_b: Vec<Rating> = team_b.iter().map(resolve).collect();

        self.calculator.match_quality(&ratings_a, &ratings_b)
    }

    /// A page of the current leaderboard, possibly one update-cycle stale
    pub async fn get_leaderboard(&self, limit: usize, offset: usize) -> Result<Vec<RankedEntry>> {
        self.leaderboard
            .page(self.store.as_ref(), &self.config, limit, offset)
            .await
    }

    /// A single player's stored rating
    pub async fn get_player_rating(&self, player_id: &PlayerId) -> Result<PlayerRating> {
        match self.store.get_rating(player_id).await? {
            Some(record) => Ok(record),
            None => Err(RatingEngineError::PlayerNotFound {
                player_id: player_id.clone(),
            }
            .into()),
        }
    }

    /// Snapshot of pipeline statistics
    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// The active tuning profile
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
