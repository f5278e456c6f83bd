//! TrueSkill rating update implementation
//!
//! This module provides the concrete update rule and quality estimator using
//! the TrueSkill algorithm from the skillratings crate. Team performance is
//! the sum of member skill Gaussians plus per-member observation noise;
//! higher-uncertainty players absorb a larger share of each correction.

use crate::config::EngineConfig;
use crate::error::{RatingEngineError, Result};
use crate::rating::calculator::RatingCalculator;
use crate::types::{MatchOutcome, PlayerRating, Rating};
use chrono::{DateTime, Utc};
use skillratings::trueskill::{
    expected_score_two_teams, match_quality_two_teams, trueskill_two_teams, TrueSkillConfig,
    TrueSkillRating,
};
use skillratings::Outcomes;
use std::collections::HashSet;
use tracing::debug;

/// TrueSkill-based rating calculator
#[derive(Debug)]
pub struct TrueSkillRatingCalculator {
    config: EngineConfig,
}

impl TrueSkillRatingCalculator {
    /// Create a new TrueSkill rating calculator
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    fn trueskill_config(&self) -> TrueSkillConfig {
        TrueSkillConfig {
            draw_probability: self.config.draw_probability,
            beta: self.config.beta,
            default_dynamics: self.config.tau,
        }
    }

    /// Pre-update transform: inflate sigma for players idle past the decay
    /// period. Capped at the prior sigma0, a player never becomes less
    /// certain than a fresh entrant.
    fn decayed_rating(&self, record: &PlayerRating, played_at: DateTime<Utc>) -> Rating {
        let mut rating = record.rating;
        if record.games_played > 0
            && played_at - record.updated_at >= self.config.decay_period()
        {
            let inflated = (rating.sigma * self.config.decay_factor).min(self.config.sigma0);
            debug!(
                player_id = %record.player_id,
                sigma = rating.sigma,
                inflated,
                "applying inactivity decay"
            );
            rating.sigma = inflated;
        }
        rating
    }

    /// Combined team-performance variance across both sides. At or below the
    /// configured epsilon the update is refused: the floor policy makes this
    /// unreachable unless the configuration itself is broken.
    fn check_combined_variance(&self, team_a: &[Rating], team_b: &[Rating]) -> Result<f64> {
        let members = (team_a.len() + team_b.len()) as f64;
        let variance = team_a
            .iter()
            .chain(team_b.iter())
            .map(|r| r.sigma * r.sigma)
            .sum::<f64>()
            + members * self.config.beta * self.config.beta;

        if variance <= self.config.variance_epsilon {
            return Err(RatingEngineError::NumericInstability {
                message: format!(
                    "combined team variance {} collapsed to epsilon {}",
                    variance, self.config.variance_epsilon
                ),
            }
            .into());
        }

        Ok(variance)
    }

    fn validate_team_shapes(len_a: usize, len_b: usize) -> Result<()> {
        if len_a == 0 || len_b == 0 {
            return Err(RatingEngineError::InvalidMatch {
                reason: "teams must not be empty".to_string(),
            }
            .into());
        }
        if len_a != len_b {
            return Err(RatingEngineError::InvalidMatch {
                reason: format!("team sizes differ: {} vs {}", len_a, len_b),
            }
            .into());
        }
        Ok(())
    }

    /// Sigma is bounded above by its (decayed) input value and below by the
    /// configured floor.
    fn clamp_sigma(&self, input: Rating, mut posterior: Rating) -> Rating {
        posterior.sigma = posterior.sigma.min(input.sigma).max(self.config.sigma_min);
        posterior
    }
}

impl RatingCalculator for TrueSkillRatingCalculator {
    fn rate_match(
        &self,
        team_a: &[PlayerRating],
        team_b: &[PlayerRating],
        outcome: MatchOutcome,
        played_at: DateTime<Utc>,
    ) -> Result<Vec<PlayerRating>> {
        Self::validate_team_shapes(team_a.len(), team_b.len())?;

        let mut seen = HashSet::new();
        for record in team_a.iter().chain(team_b.iter()) {
            if !seen.insert(record.player_id.as_str()) {
                return Err(RatingEngineError::InvalidMatch {
                    reason: format!("player {} appears more than once", record.player_id),
                }
                .into());
            }
        }

        let inputs_a: Vec<Rating> = team_a
            .iter()
            .map(|r| self.decayed_rating(r, played_at))
            .collect();
        let inputs_b: Vec<Rating> = team_b
            .iter()
            .map(|r| self.decayed_rating(r, played_at))
            .collect();

        self.check_combined_variance(&inputs_a, &inputs_b)?;

        let ts_a: Vec<TrueSkillRating> = inputs_a.iter().copied().map(Into::into).collect();
        let ts_b: Vec<TrueSkillRating> = inputs_b.iter().copied().map(Into::into).collect();
        let ts_outcome: Outcomes = outcome.into();

        let (new_a, new_b) =
            trueskill_two_teams(&ts_a, &ts_b, &ts_outcome, &self.trueskill_config());

        let mut updated = Vec::with_capacity(team_a.len() + team_b.len());
        for ((record, input), posterior) in team_a.iter().zip(&inputs_a).zip(&new_a) {
            let rating = self.clamp_sigma(*input, (*posterior).into());
            updated.push(record.with_rating(rating, played_at));
        }
        for ((record, input), posterior) in team_b.iter().zip(&inputs_b).zip(&new_b) {
            let rating = self.clamp_sigma(*input, (*posterior).into());
            updated.push(record.with_rating(rating, played_at));
        }

        Ok(updated)
    }

    fn match_quality(&self, team_a: &[Rating], team_b: &[Rating]) -> Result<f64> {
        Self::validate_team_shapes(team_a.len(), team_b.len())?;
        self.check_combined_variance(team_a, team_b)?;

        let ts_a: Vec<TrueSkillRating> = team_a.iter().copied().map(Into::into).collect();
        let ts_b: Vec<TrueSkillRating> = team_b.iter().copied().map(Into::into).collect();

        let quality = match_quality_two_teams(&ts_a, &ts_b, &self.trueskill_config());
        Ok(quality.clamp(0.0, 1.0))
    }

    fn expected_score(&self, team_a: &[Rating], team_b: &[Rating]) -> Result<(f64, f64)> {
        Self::validate_team_shapes(team_a.len(), team_b.len())?;
        self.check_combined_variance(team_a, team_b)?;

        let ts_a: Vec<TrueSkillRating> = team_a.iter().copied().map(Into::into).collect();
        let ts_b: Vec<TrueSkillRating> = team_b.iter().copied().map(Into::into).collect();

        Ok(expected_score_two_teams(
            &ts_a,
            &ts_b,
            &self.trueskill_config(),
        ))
    }

    fn initial_rating(&self) -> Rating {
        Rating {
            mu: self.config.mu0,
            sigma: self.config.sigma0,
        }
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let new_config: EngineConfig = serde_json::from_value(config).map_err(|e| {
            RatingEngineError::ConfigurationError {
                message: format!("Invalid engine configuration: {}", e),
            }
        })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
