//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid scoring band: {0}")]
    InvalidBand(String),

    #[error("Aggregation alpha must lie in [0, 1], got {0}")]
    AlphaOutOfRange(f64),

    #[error("Aggregation epsilon must lie in (0, 1), got {0}")]
    EpsilonOutOfRange(f64),

    #[error("Consistency threshold must lie in (0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("Unknown log level '{0}'")]
    InvalidLogLevel(String),
}
