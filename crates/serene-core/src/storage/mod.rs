mod config;

pub use config::{
    BreathingConfig, Config, FeedbackConfig, ProgressConfig, SessionConfig, CYCLE_SECS_RANGE,
    MAX_TICK_INTERVAL_MS, MAX_TRANSITION_MS,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the configuration directory.
///
/// `SERENE_CONFIG_DIR` wins when set. Otherwise `~/.config/serene/`, or
/// `~/.config/serene-dev/` when `SERENE_ENV=dev`. The directory is created
/// if missing.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SERENE_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(".config");
            let env = std::env::var("SERENE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("serene-dev")
            } else {
                base_dir.join("serene")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
