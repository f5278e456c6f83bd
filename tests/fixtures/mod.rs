//! Test fixtures and mock implementations for integration testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use varsity_ladder::error::Result;
use varsity_ladder::rating::storage::{
    InMemoryRatingStore, RatingBatch, RatingStore, SaveOutcome,
};
use varsity_ladder::types::{MatchId, MatchOutcome, MatchResult, PlayerId, PlayerRating};
use varsity_ladder::utils::{current_timestamp, generate_match_id};

/// Install a tracing subscriber once for test output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Build a roster of player ids with a common prefix
pub fn roster(prefix: &str, size: usize) -> Vec<PlayerId> {
    (0..size).map(|i| format!("{}_{}", prefix, i)).collect()
}

/// Build a match result between two rosters, played now
pub fn match_between(
    team_a: &[PlayerId],
    team_b: &[PlayerId],
    outcome: MatchOutcome,
) -> MatchResult {
    MatchResult {
        match_id: generate_match_id(),
        team_a: team_a.to_vec(),
        team_b: team_b.to_vec(),
        outcome,
        played_at: current_timestamp(),
    }
}

/// Store wrapper that injects a fixed number of optimistic save conflicts
/// before delegating to a real in-memory store
#[derive(Debug, Default)]
pub struct ConflictInjectingStore {
    inner: InMemoryRatingStore,
    conflicts_left: AtomicU32,
}

impl ConflictInjectingStore {
    pub fn new(conflicts: u32) -> Self {
        Self {
            inner: InMemoryRatingStore::new(),
            conflicts_left: AtomicU32::new(conflicts),
        }
    }

    /// Direct access to the wrapped store
    pub fn inner(&self) -> &InMemoryRatingStore {
        &self.inner
    }
}

#[async_trait]
impl RatingStore for ConflictInjectingStore {
    async fn load_ratings(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, PlayerRating>> {
        self.inner.load_ratings(player_ids).await
    }

    async fn save_ratings(&self, batch: RatingBatch) -> Result<SaveOutcome> {
        if self
            .conflicts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
        {
            return Ok(SaveOutcome::Conflict);
        }
        self.inner.save_ratings(batch).await
    }

    async fn is_match_processed(&self, match_id: &MatchId) -> Result<bool> {
        self.inner.is_match_processed(match_id).await
    }

    async fn mark_match_processed(&self, match_id: MatchId) -> Result<()> {
        self.inner.mark_match_processed(match_id).await
    }

    async fn get_rating(&self, player_id: &PlayerId) -> Result<Option<PlayerRating>> {
        self.inner.get_rating(player_id).await
    }

    async fn all_ratings(&self) -> Result<Vec<PlayerRating>> {
        self.inner.all_ratings().await
    }

    async fn player_count(&self) -> Result<usize> {
        self.inner.player_count().await
    }
}
