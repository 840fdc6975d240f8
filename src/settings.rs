//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/chainrs/settings.toml (or platform equivalent)

use crate::config::EngineConfig;
use crate::versus::VersusSettings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Persistent settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board and scoring rules
    pub engine: EngineConfig,
    /// Match setup
    pub versus: VersusSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "chainrs", "chainrs").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => {
                info!(path = %path.display(), "loading settings");
                Self::from_toml(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    /// Parse settings; anything unusable is replaced by defaults
    pub fn from_toml(contents: &str) -> Self {
        let mut settings: Settings = match toml::from_str(contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Invalid settings file, using defaults: {}", e);
                return Self::default();
            }
        };

        if let Err(e) = settings.engine.validate() {
            warn!("Invalid engine settings, using defaults: {}", e);
            settings.engine = EngineConfig::default();
        }
        settings
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        // Create directory if needed
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents = self.to_toml()?;
        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        info!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))
    }
}
