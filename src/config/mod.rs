//! Configuration management for the rating engine
//!
//! This module handles configuration loading from environment variables and
//! TOML profiles, validation, and default tuning values.

pub mod engine;

// Re-export commonly used types
pub use engine::EngineConfig;
