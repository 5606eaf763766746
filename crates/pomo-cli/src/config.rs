//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pomo_core::level::DEFAULT_LEVEL_THRESHOLDS;
use pomo_core::{Engine, LevelTableError};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Profile whose progress commands read and write.
    pub profile: String,

    /// Minimum XP for each level, starting with level 1.
    pub level_thresholds: Vec<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("pomo.db"),
            profile: "default".to_string(),
            level_thresholds: DEFAULT_LEVEL_THRESHOLDS.to_vec(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (POMO_*)
        figment = figment.merge(Env::prefixed("POMO_"));

        figment.extract()
    }

    /// Builds the engine, rejecting malformed level thresholds.
    pub fn engine(&self) -> Result<Engine, LevelTableError> {
        Engine::with_level_thresholds(&self.level_thresholds)
    }
}

/// Returns the platform-specific config directory for pomo.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pomo"))
}

/// Returns the platform-specific data directory for pomo.
///
/// On Linux: `~/.local/share/pomo`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("pomo"))
}
