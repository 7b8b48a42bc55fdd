mod config;
mod definitions;
mod error;

pub use config::{
    AppConfig, AppConfigExt, AutomationSettings, ChatPhrases, Color, DisplaySettings,
    NotifySettings, PredictionSettings, ZoneSettings, overlay_colors,
};
pub use definitions::load_registry;
pub use error::ConfigError;
