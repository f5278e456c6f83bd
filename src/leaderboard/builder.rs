//! Leaderboard builder
//!
//! Pure functions from a rating snapshot to an ordered board. Ordering is a
//! total order: conservative score descending, then more games played, then
//! lexicographic player id, so no two entries ever share a rank.

use crate::config::EngineConfig;
use crate::types::{PlayerId, PlayerRating, RankedEntry};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Build a fully ranked board from a population snapshot
pub fn build_leaderboard(ratings: &[PlayerRating], config: &EngineConfig) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = ratings
        .iter()
        .map(|record| RankedEntry {
            player_id: record.player_id.clone(),
            conservative_score: record.rating.conservative(config.conservative_k),
            rank: 0,
            rating: record.rating,
            games_played: record.games_played,
            rank_delta: None,
            is_new: false,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.conservative_score
            .partial_cmp(&a.conservative_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.games_played.cmp(&a.games_played))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = (index + 1) as u32;
    }

    entries
}

/// Fill in position movement against a previously built board
pub fn annotate_movement(current: &mut [RankedEntry], previous: &[RankedEntry]) {
    let previous_ranks: HashMap<&PlayerId, u32> = previous
        .iter()
        .map(|entry| (&entry.player_id, entry.rank))
        .collect();

    for entry in current.iter_mut() {
        match previous_ranks.get(&entry.player_id) {
            // Positive delta = climbed the board
            Some(previous_rank) => {
                entry.rank_delta = Some(*previous_rank as i64 - entry.rank as i64);
                entry.is_new = false;
            }
            None => {
                entry.rank_delta = None;
                entry.is_new = true;
            }
        }
    }
}
