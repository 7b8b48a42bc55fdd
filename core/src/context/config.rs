//! Application configuration
//!
//! This module re-exports shared types from dodger-types and provides
//! persistence for AppConfig.

use std::path::{Path, PathBuf};

pub use dodger_types::{
    AppConfig, AutomationSettings, ChatPhrases, Color, DisplaySettings, NotifySettings,
    PredictionSettings, ZoneSettings, overlay_colors,
};

use super::error::ConfigError;

const APP_NAME: &str = "dodger";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    /// Load the user config, falling back to defaults on any error
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    /// Where `save` writes, if the platform has a config directory
    fn config_path() -> Option<PathBuf>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(|source| ConfigError::LoadPath {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(|source| ConfigError::SavePath {
            path: path.to_path_buf(),
            source,
        })
    }

    fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }
}
