//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating-engine scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingEngineError {
    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Numeric instability: {message}")]
    NumericInstability { message: String },

    #[error("Concurrency conflict: {message}")]
    ConcurrencyConflict { message: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal engine error: {message}")]
    InternalError { message: String },
}
