//! Process-wide leaderboard cache
//!
//! Reads serve a cached board and never block writers; ingestion invalidates
//! the cache after every successful commit. The staleness bound is exactly
//! the updates committed since the last invalidation-triggered rebuild.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::leaderboard::builder::{annotate_movement, build_leaderboard};
use crate::rating::storage::RatingStore;
use crate::types::RankedEntry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct CacheState {
    board: Option<Arc<Vec<RankedEntry>>>,
    dirty: bool,
}

/// Cached leaderboard with explicit invalidation
#[derive(Debug)]
pub struct LeaderboardCache {
    state: RwLock<CacheState>,
}

impl LeaderboardCache {
    /// Create an empty cache; the first read triggers a build
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState {
                board: None,
                dirty: true,
            }),
        }
    }

    /// Mark the cached board stale; called after every successful commit
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.dirty = true;
    }

    /// Current board, rebuilt from a fresh store snapshot when stale
    ///
    /// Rebuilds keep the prior board around to annotate position movement.
    pub async fn board(
        &self,
        store: &dyn RatingStore,
        config: &EngineConfig,
    ) -> Result<Arc<Vec<RankedEntry>>> {
        {
            let state = self.state.read().await;
            if !state.dirty {
                if let Some(board) = &state.board {
                    return Ok(Arc::clone(board));
                }
            }
        }

        let mut state = self.state.write().await;
        // Another reader may have rebuilt while we waited for the write lock
        if !state.dirty {
            if let Some(board) = &state.board {
                return Ok(Arc::clone(board));
            }
        }

        let ratings = store.all_ratings().await?;
        let mut board = build_leaderboard(&ratings, config);
        let previous: &[RankedEntry] = state.board.as_ref().map(|b| b.as_slice()).unwrap_or(&[]);
        annotate_movement(&mut board, previous);
        debug!(entries = board.len(), "rebuilt leaderboard");

        let board = Arc::new(board);
        state.board = Some(Arc::clone(&board));
        state.dirty = false;
        Ok(board)
    }

    /// A page of the current board
    pub async fn page(
        &self,
        store: &dyn RatingStore,
        config: &EngineConfig,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RankedEntry>> {
        let board = self.board(store, config).await?;
        Ok(board.iter().skip(offset).take(limit).cloned().collect())
    }
}

impl Default for LeaderboardCache {
    fn default() -> Self {
        Self::new()
    }
}
