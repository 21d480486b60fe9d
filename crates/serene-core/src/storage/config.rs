//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default session length and tick cadence
//! - Progress ring transition length
//! - Breathing rhythm
//! - Haptic and completion notice toggles
//!
//! Configuration is stored at `~/.config/serene/config.toml`.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::data_dir;
use crate::error::ConfigError;
use crate::pacer::DEFAULT_CYCLE;
use crate::session::{DEFAULT_MINUTES, MAX_MINUTES, MIN_MINUTES};

/// Longest accepted `session.tick_interval_ms`.
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;
/// Longest accepted `progress.transition_ms`.
pub const MAX_TRANSITION_MS: u64 = 10_000;
/// Accepted `breathing.cycle_secs`.
pub const CYCLE_SECS_RANGE: RangeInclusive<f64> = 1.0..=3600.0;

/// Session-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_duration_min")]
    pub default_duration_min: u32,
    /// Lower end of the duration slider.
    #[serde(default = "default_min_duration_min")]
    pub min_duration_min: u32,
    /// Upper end of the duration slider.
    #[serde(default = "default_max_duration_min")]
    pub max_duration_min: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingConfig {
    /// One full breath (in and out), seconds.
    #[serde(default = "default_cycle_secs")]
    pub cycle_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_true")]
    pub haptics: bool,
    #[serde(default = "default_true")]
    pub completion_notice: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/serene/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

// Default functions
fn default_duration_min() -> u32 {
    DEFAULT_MINUTES
}
fn default_min_duration_min() -> u32 {
    MIN_MINUTES
}
fn default_max_duration_min() -> u32 {
    MAX_MINUTES
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_transition_ms() -> u64 {
    500
}
fn default_cycle_secs() -> f64 {
    8.0
}
fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration_min: default_duration_min(),
            min_duration_min: default_min_duration_min(),
            max_duration_min: default_max_duration_min(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
        }
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            cycle_secs: default_cycle_secs(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            haptics: true,
            completion_notice: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Check value ranges that the types alone do not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.into(),
            message,
        };

        let session = &self.session;
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&session.min_duration_min) {
            return Err(invalid(
                "session.min_duration_min",
                format!("{} is outside {MIN_MINUTES}..={MAX_MINUTES}", session.min_duration_min),
            ));
        }
        if !(session.min_duration_min..=MAX_MINUTES).contains(&session.max_duration_min) {
            return Err(invalid(
                "session.max_duration_min",
                format!(
                    "{} is outside {}..={MAX_MINUTES}",
                    session.max_duration_min, session.min_duration_min
                ),
            ));
        }
        let minutes = session.default_duration_min;
        if !self.duration_range().contains(&minutes) {
            return Err(invalid(
                "session.default_duration_min",
                format!(
                    "{minutes} is outside {}..={}",
                    session.min_duration_min, session.max_duration_min
                ),
            ));
        }
        if !(1..=MAX_TICK_INTERVAL_MS).contains(&session.tick_interval_ms) {
            return Err(invalid(
                "session.tick_interval_ms",
                format!("{} is outside 1..={MAX_TICK_INTERVAL_MS}", session.tick_interval_ms),
            ));
        }
        if self.progress.transition_ms > MAX_TRANSITION_MS {
            return Err(invalid(
                "progress.transition_ms",
                format!("{} exceeds {MAX_TRANSITION_MS}", self.progress.transition_ms),
            ));
        }
        let cycle = self.breathing.cycle_secs;
        if !CYCLE_SECS_RANGE.contains(&cycle) {
            return Err(invalid(
                "breathing.cycle_secs",
                format!(
                    "{cycle} is outside {}..={} seconds",
                    CYCLE_SECS_RANGE.start(),
                    CYCLE_SECS_RANGE.end()
                ),
            ));
        }
        Ok(())
    }

    /// Minutes the duration slider may select.
    pub fn duration_range(&self) -> RangeInclusive<u32> {
        self.session.min_duration_min..=self.session.max_duration_min
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The change is validated but not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or is out of range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.session.tick_interval_ms)
    }

    pub fn progress_transition(&self) -> Duration {
        Duration::from_millis(self.progress.transition_ms)
    }

    /// Falls back to the default rhythm when the stored value is not a
    /// representable duration.
    pub fn breathing_cycle(&self) -> Duration {
        Duration::try_from_secs_f64(self.breathing.cycle_secs).unwrap_or_else(|e| {
            warn!(cycle_secs = self.breathing.cycle_secs, "ignoring breathing cycle: {e}");
            DEFAULT_CYCLE
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.session.default_duration_min, 5);
        assert_eq!(cfg.tick_interval(), Duration::from_secs(1));
        assert_eq!(cfg.progress_transition(), Duration::from_millis(500));
        assert_eq!(cfg.breathing_cycle(), Duration::from_secs(8));
        assert!(cfg.feedback.haptics);
        assert!(cfg.feedback.completion_notice);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[breathing]\ncycle_secs = 6.0\n").unwrap();
        assert_eq!(parsed.breathing.cycle_secs, 6.0);
        assert_eq!(parsed.session, SessionConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("feedback.haptics").as_deref(), Some("true"));
        assert_eq!(cfg.get("session.default_duration_min").as_deref(), Some("5"));
        assert!(cfg.get("session").is_none());
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("feedback.haptics", "false").unwrap();
        cfg.set("session.default_duration_min", "20").unwrap();
        cfg.set("breathing.cycle_secs", "6").unwrap();
        assert!(!cfg.feedback.haptics);
        assert_eq!(cfg.session.default_duration_min, 20);
        assert_eq!(cfg.breathing.cycle_secs, 6.0);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set("session", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type_and_range() {
        let mut cfg = Config::default();
        assert!(cfg.set("feedback.haptics", "not_a_bool").is_err());
        assert!(cfg.set("session.default_duration_min", "0").is_err());
        assert!(cfg.set("session.default_duration_min", "61").is_err());
        assert!(cfg.set("session.tick_interval_ms", "0").is_err());
        assert!(cfg.set("breathing.cycle_secs", "-1").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_values_beyond_upper_bounds() {
        let mut cfg = Config::default();
        assert!(cfg.set("breathing.cycle_secs", "1e19").is_err());
        assert!(cfg.set("breathing.cycle_secs", "1e30").is_err());
        assert!(cfg.set("breathing.cycle_secs", "3600.5").is_err());
        assert!(cfg.set("breathing.cycle_secs", "0.5").is_err());
        assert!(cfg
            .set("session.tick_interval_ms", &u64::MAX.to_string())
            .is_err());
        assert!(cfg.set("session.tick_interval_ms", "60001").is_err());
        assert!(cfg.set("progress.transition_ms", "10001").is_err());
        assert_eq!(cfg, Config::default());

        cfg.set("breathing.cycle_secs", "3600").unwrap();
        cfg.set("session.tick_interval_ms", "60000").unwrap();
        cfg.set("progress.transition_ms", "10000").unwrap();
        assert_eq!(cfg.breathing_cycle(), Duration::from_secs(3600));
        assert_eq!(cfg.tick_interval(), Duration::from_secs(60));
    }

    #[test]
    fn load_rejects_oversized_values_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[breathing]\ncycle_secs = 1e30\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unrepresentable_cycle_falls_back_to_default() {
        let mut cfg = Config::default();
        cfg.breathing.cycle_secs = 1e30;
        assert_eq!(cfg.breathing_cycle(), DEFAULT_CYCLE);
        cfg.breathing.cycle_secs = f64::NAN;
        assert_eq!(cfg.breathing_cycle(), DEFAULT_CYCLE);
    }

    #[test]
    fn duration_bounds_are_configurable() {
        let mut cfg = Config::default();
        assert_eq!(cfg.session.min_duration_min, 1);
        assert_eq!(cfg.session.max_duration_min, 60);
        assert_eq!(cfg.duration_range(), 1..=60);

        cfg.set("session.max_duration_min", "30").unwrap();
        cfg.set("session.min_duration_min", "3").unwrap();
        assert_eq!(cfg.duration_range(), 3..=30);

        // The default must stay inside the bounds.
        assert!(cfg.set("session.default_duration_min", "45").is_err());
        assert!(cfg.set("session.min_duration_min", "6").is_err());
        assert!(cfg.set("session.max_duration_min", "4").is_err());
        assert!(cfg.set("session.max_duration_min", "61").is_err());
        assert!(cfg.set("session.min_duration_min", "0").is_err());
        assert_eq!(cfg.duration_range(), 3..=30);
    }

    #[test]
    fn load_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("progress.transition_ms", "250").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().progress.transition_ms, 250);
    }

    #[test]
    fn load_reports_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "session = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
