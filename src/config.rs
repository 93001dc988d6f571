//! Application configuration.
//!
//! Defaults come from [`crate::constants`]. A JSON file named by the
//! `SPIN_WHEEL_CONFIG` environment variable can override any subset of the
//! fields; unknown fields are rejected so typos do not pass silently.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animator::PhaseTable;
use crate::constants::*;
use crate::error::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SPIN_WHEEL_CONFIG";

/// Startup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Folder holding `images/` and `sounds/`
    pub assets_dir: PathBuf,
    /// Initial spin duration in seconds
    pub spin_seconds: u32,
    /// Initial sector-crossing sound
    pub spin_sound: String,
    /// Initial winner sound
    pub winning_sound: String,
    /// Entries shown on first launch, one per line
    pub initial_entries: String,
    /// Initial window size
    pub window_size: (f32, f32),
    /// Duration-to-phase table for the animator
    pub phase_table: PhaseTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            spin_seconds: DEFAULT_SPIN_SECONDS,
            spin_sound: DEFAULT_SPIN_SOUND.to_string(),
            winning_sound: DEFAULT_WINNING_SOUND.to_string(),
            initial_entries: String::new(),
            window_size: (1280.0, 860.0),
            phase_table: PhaseTable::default(),
        }
    }
}

impl AppConfig {
    /// Reads a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses config JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        Ok(config)
    }

    /// Loads from `SPIN_WHEEL_CONFIG` if set, falling back to defaults when the
    /// variable is unset or the file is unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        let path = PathBuf::from(path);
        match Self::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Brings out-of-range values back into range.
    fn normalize(&mut self) {
        self.spin_seconds = self.spin_seconds.clamp(MIN_SPIN_SECONDS, MAX_SPIN_SECONDS);
        if !SPIN_SOUNDS.contains(&self.spin_sound.as_str()) {
            log::warn!("unknown spin sound {}, using default", self.spin_sound);
            self.spin_sound = DEFAULT_SPIN_SOUND.to_string();
        }
        if !WINNING_SOUNDS.contains(&self.winning_sound.as_str()) {
            log::warn!("unknown winning sound {}, using default", self.winning_sound);
            self.winning_sound = DEFAULT_WINNING_SOUND.to_string();
        }
        self.phase_table
            .bands
            .sort_by_key(|band| band.up_to_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_override_and_clamp() {
        let config = AppConfig::from_json(r#"{"spin_seconds": 99, "winning_sound": "yes-victory"}"#).unwrap();
        assert_eq!(config.spin_seconds, MAX_SPIN_SECONDS);
        assert_eq!(config.winning_sound, "yes-victory");
        assert_eq!(config.spin_sound, DEFAULT_SPIN_SOUND);
    }

    #[test]
    fn test_unknown_sound_falls_back() {
        let config = AppConfig::from_json(r#"{"spin_sound": "kazoo"}"#).unwrap();
        assert_eq!(config.spin_sound, DEFAULT_SPIN_SOUND);
    }

    #[test]
    fn test_custom_phase_table_is_sorted() {
        let json = r#"{"phase_table": {"bands": [
            {"up_to_seconds": 40, "accel_seconds": 4, "base_decel_seconds": 6, "extra_slow_seconds": 8},
            {"up_to_seconds": 5, "accel_seconds": 1, "base_decel_seconds": 1, "extra_slow_seconds": 1}
        ]}}"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.phase_table.bands[0].up_to_seconds, 5);
        assert_eq!(config.phase_table.lookup(20).accel_ms, 4000.0);
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(AppConfig::from_json("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            AppConfig::from_json(r#"{"nope": 1}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            AppConfig::load(Path::new("/definitely/not/here.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
