//! Rating storage interface and implementations
//!
//! This module defines the outbound interface toward the persistence
//! collaborator, with an in-memory reference implementation. Commits are
//! atomic: a match's rating updates and its processed-marker land together
//! or not at all.

use crate::error::{RatingEngineError, Result};
use crate::types::{MatchId, PlayerId, PlayerRating};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Per-player version captured at fetch time, checked again at commit time
///
/// `games_played` increments on every update, so together with `updated_at`
/// it acts as a monotonic row version for optimistic concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedVersion {
    pub games_played: u64,
    pub updated_at: DateTime<Utc>,
}

impl From<&PlayerRating> for ExpectedVersion {
    fn from(record: &PlayerRating) -> Self {
        Self {
            games_played: record.games_played,
            updated_at: record.updated_at,
        }
    }
}

/// Atomic unit of persistence for one ingested match
#[derive(Debug, Clone)]
pub struct RatingBatch {
    pub match_id: MatchId,
    /// Versions the update was computed from; `None` means the player did
    /// not exist at fetch time
    pub expected: HashMap<PlayerId, Option<ExpectedVersion>>,
    /// New snapshots for every participant
    pub updated: Vec<PlayerRating>,
}

/// Result of attempting to commit a rating batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// All ratings written and the match recorded as processed
    Committed,
    /// A participant changed since fetch; nothing was written
    Conflict,
    /// The match id was already recorded as processed; nothing was written
    AlreadyProcessed,
}

/// Trait for rating persistence operations
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Load current ratings for the given players; unknown ids are simply
    /// absent from the returned map
    async fn load_ratings(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, PlayerRating>>;

    /// Atomically commit a match's rating updates and processed-marker
    async fn save_ratings(&self, batch: RatingBatch) -> Result<SaveOutcome>;

    /// Whether a match id has already been applied
    async fn is_match_processed(&self, match_id: &MatchId) -> Result<bool>;

    /// Record a match id as applied without touching ratings
    async fn mark_match_processed(&self, match_id: MatchId) -> Result<()>;

    /// Get a single player's rating
    async fn get_rating(&self, player_id: &PlayerId) -> Result<Option<PlayerRating>>;

    /// Snapshot of the whole rated population (for leaderboard builds)
    async fn all_ratings(&self) -> Result<Vec<PlayerRating>>;

    /// Total number of rated players
    async fn player_count(&self) -> Result<usize>;
}

#[derive(Debug, Default)]
struct StoreInner {
    ratings: HashMap<PlayerId, PlayerRating>,
    processed: HashSet<MatchId>,
}

/// In-memory rating store
///
/// A single lock over ratings and the processed set makes every commit
/// serializable, which is the transactional discipline a database-backed
/// implementation must reproduce.
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryRatingStore {
    /// Create an empty in-memory rating store
    pub fn new() -> Self {
        Self::default()
    }

    fn read_inner(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|_| {
                RatingEngineError::InternalError {
                    message: "Failed to acquire store read lock".to_string(),
                }
                .into()
            })
    }

    fn write_inner(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|_| {
                RatingEngineError::InternalError {
                    message: "Failed to acquire store write lock".to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn load_ratings(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, PlayerRating>> {
        let inner = self.read_inner()?;

        let mut result = HashMap::new();
        for player_id in player_ids {
            if let Some(record) = inner.ratings.get(player_id) {
                result.insert(player_id.clone(), record.clone());
            }
        }

        Ok(result)
    }

    async fn save_ratings(&self, batch: RatingBatch) -> Result<SaveOutcome> {
        let mut inner = self.write_inner()?;

        if inner.processed.contains(&batch.match_id) {
            return Ok(SaveOutcome::AlreadyProcessed);
        }

        for (player_id, expected) in &batch.expected {
            let current = inner.ratings.get(player_id).map(ExpectedVersion::from);
            if current != *expected {
                return Ok(SaveOutcome::Conflict);
            }
        }

        for record in batch.updated {
            inner.ratings.insert(record.player_id.clone(), record);
        }
        inner.processed.insert(batch.match_id);

        Ok(SaveOutcome::Committed)
    }

    async fn is_match_processed(&self, match_id: &MatchId) -> Result<bool> {
        let inner = self.read_inner()?;
        Ok(inner.processed.contains(match_id))
    }

    async fn mark_match_processed(&self, match_id: MatchId) -> Result<()> {
        let mut inner = self.write_inner()?;
        inner.processed.insert(match_id);
        Ok(())
    }

    async fn get_rating(&self, player_id: &PlayerId) -> Result<Option<PlayerRating>> {
        let inner = self.read_inner()?;
        Ok(inner.ratings.get(player_id).cloned())
    }

    async fn all_ratings(&self) -> Result<Vec<PlayerRating>> {
        let inner = self.read_inner()?;
        Ok(inner.ratings.values().cloned().collect())
    }

    async fn player_count(&self) -> Result<usize> {
        let inner = self.read_inner()?;
        Ok(inner.ratings.len())
    }
}
