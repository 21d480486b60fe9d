//! Core error types for serene-core.
//!
//! Controller commands never fail; these types cover the fallible edges:
//! building a session, arming the tokio tick producer, and the config file.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for serene-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The tokio tick producer was created outside a runtime
    #[error("No async runtime available: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No usable configuration directory
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dotted key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Session totals must be positive
    #[error("Session duration must be positive")]
    ZeroDuration,

    /// Remaining time beyond the session total
    #[error("Remaining time {remaining_secs}s exceeds session total {total_secs}s")]
    RemainingExceedsTotal { remaining_secs: u64, total_secs: u64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
