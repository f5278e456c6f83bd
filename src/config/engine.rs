//! Engine tuning configuration
//!
//! All numeric constants of the rating model live here as named options and
//! are threaded explicitly through every pure function, so the engine is
//! reproducible under differing tuning profiles within the same process.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Tuning constants for the rating engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prior skill mean for unseen players
    pub mu0: f64,
    /// Prior skill uncertainty for unseen players
    pub sigma0: f64,
    /// Per-player performance noise within a single match
    pub beta: f64,
    /// Additive dynamics noise applied by the update
    pub tau: f64,
    /// Lower bound on post-update sigma
    pub sigma_min: f64,
    /// Combined team variance at or below this value is a fatal configuration bug
    pub variance_epsilon: f64,
    /// Modeled probability of a drawn match
    pub draw_probability: f64,
    /// Days without a match before sigma decay kicks in
    pub decay_period_days: i64,
    /// Multiplier applied to sigma after the idle period
    pub decay_factor: f64,
    /// The k in the conservative leaderboard score `mu - k * sigma`
    pub conservative_k: f64,
    /// Bounded retries for optimistic persistence conflicts
    pub max_save_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mu0: 25.0,
            sigma0: 25.0 / 3.0,
            beta: 25.0 / 6.0,
            tau: 25.0 / 300.0,
            sigma_min: 0.1,
            variance_epsilon: 1e-6,
            draw_probability: 0.1,
            decay_period_days: 30,
            decay_factor: 1.25,
            conservative_k: 3.0,
            max_save_attempts: 3,
        }
    }
}

impl EngineConfig {
    /// Create conservative configuration (slower rating changes)
    pub fn conservative() -> Self {
        Self {
            beta: 25.0 / 8.0,
            tau: 25.0 / 600.0,
            decay_factor: 1.1,
            ..Self::default()
        }
    }

    /// Create aggressive configuration (faster rating changes)
    pub fn aggressive() -> Self {
        Self {
            beta: 25.0 / 4.0,
            tau: 25.0 / 150.0,
            decay_factor: 1.5,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.sigma0 <= 0.0 {
            return Err(anyhow!("sigma0 must be positive"));
        }
        if self.beta <= 0.0 {
            return Err(anyhow!("beta must be positive"));
        }
        if self.tau < 0.0 {
            return Err(anyhow!("tau must be non-negative"));
        }
        if self.sigma_min <= 0.0 || self.sigma_min > self.sigma0 {
            return Err(anyhow!("sigma_min must be in (0, sigma0]"));
        }
        if self.variance_epsilon <= 0.0 {
            return Err(anyhow!("variance_epsilon must be positive"));
        }
        if !(0.0..1.0).contains(&self.draw_probability) {
            return Err(anyhow!("draw_probability must be in [0, 1)"));
        }
        if self.decay_period_days <= 0 {
            return Err(anyhow!("decay_period_days must be positive"));
        }
        if self.decay_factor < 1.0 {
            return Err(anyhow!("decay_factor must be at least 1.0"));
        }
        if self.conservative_k < 0.0 {
            return Err(anyhow!("conservative_k must be non-negative"));
        }
        if self.max_save_attempts == 0 {
            return Err(anyhow!("max_save_attempts must be greater than 0"));
        }
        Ok(())
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(mu0) = env::var("RATING_MU0") {
            config.mu0 = mu0
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_MU0 value: {}", mu0))?;
        }
        if let Ok(sigma0) = env::var("RATING_SIGMA0") {
            config.sigma0 = sigma0
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_SIGMA0 value: {}", sigma0))?;
        }
        if let Ok(beta) = env::var("RATING_BETA") {
            config.beta = beta
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_BETA value: {}", beta))?;
        }
        if let Ok(tau) = env::var("RATING_TAU") {
            config.tau = tau
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_TAU value: {}", tau))?;
        }
        if let Ok(sigma_min) = env::var("RATING_SIGMA_MIN") {
            config.sigma_min = sigma_min
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_SIGMA_MIN value: {}", sigma_min))?;
        }
        if let Ok(draw) = env::var("RATING_DRAW_PROBABILITY") {
            config.draw_probability = draw
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_DRAW_PROBABILITY value: {}", draw))?;
        }
        if let Ok(period) = env::var("RATING_DECAY_PERIOD_DAYS") {
            config.decay_period_days = period
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_DECAY_PERIOD_DAYS value: {}", period))?;
        }
        if let Ok(factor) = env::var("RATING_DECAY_FACTOR") {
            config.decay_factor = factor
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_DECAY_FACTOR value: {}", factor))?;
        }
        if let Ok(k) = env::var("RATING_CONSERVATIVE_K") {
            config.conservative_k = k
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_CONSERVATIVE_K value: {}", k))?;
        }
        if let Ok(attempts) = env::var("RATING_MAX_SAVE_ATTEMPTS") {
            config.max_save_attempts = attempts
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_MAX_SAVE_ATTEMPTS value: {}", attempts))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a tuning profile from TOML; missing keys fall back to defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| anyhow!("Invalid engine config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a tuning profile from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow!(
                "Failed to read engine config {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        Self::from_toml_str(&raw)
    }

    /// Idle period after which sigma decay applies
    pub fn decay_period(&self) -> chrono::Duration {
        chrono::Duration::days(self.decay_period_days)
    }
}
