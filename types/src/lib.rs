//! Shared configuration types for dodger
//!
//! This crate contains serializable configuration types that are shared between
//! the frame engine (dodger-core) and the front ends that host it (dodger-cli).
//! Every field carries a serde default so partially written config files load.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Color Type
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color as [r, g, b, a] bytes
pub type Color = [u8; 4];

/// Colors used by the hazard and path overlays
pub mod overlay_colors {
    use super::Color;

    pub const IMMINENT: Color = [255, 0, 0, 255]; // Red
    pub const SAFE: Color = [255, 255, 0, 255]; // Yellow
    pub const MOVE_NOW: Color = [0, 255, 0, 255]; // Green
    pub const WAIT: Color = [255, 0, 0, 255]; // Red
    pub const ROUTE: Color = [255, 255, 0, 255]; // Yellow
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Default Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_join_delay() -> f32 {
    0.5
}

fn default_leave_delay() -> f32 {
    3.0
}

fn default_leave_limit() -> u32 {
    1
}

fn default_action_cooldown() -> f32 {
    2.0
}

fn default_window_padding() -> f32 {
    0.1
}

fn default_lookahead() -> f32 {
    2.5
}

fn default_travel_speed() -> f32 {
    6.0
}

fn default_lobby_zone() -> u32 {
    1197
}

fn default_arena_zone() -> u32 {
    1165
}

fn default_round_starting() -> Vec<String> {
    vec!["节目马上就要开始了".to_string()]
}

fn default_reward_granted() -> Vec<String> {
    vec!["获得了{n}个金碟声誉。".to_string(), "You obtain {n} MGF.".to_string()]
}

fn default_notify_max_players() -> u32 {
    1
}

// ─────────────────────────────────────────────────────────────────────────────
// Automation
// ─────────────────────────────────────────────────────────────────────────────

/// Join/leave automation toggles and debounce delays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// Queue for the duty automatically while standing in the lobby
    #[serde(default)]
    pub auto_join: bool,

    /// Seconds the join condition must hold before queueing
    #[serde(default = "default_join_delay")]
    pub auto_join_delay_secs: f32,

    /// Leave the duty when more players than `auto_leave_player_limit` are present
    #[serde(default)]
    pub auto_leave_if_not_solo: bool,

    #[serde(default = "default_leave_delay")]
    pub auto_leave_delay_secs: f32,

    #[serde(default = "default_leave_limit")]
    pub auto_leave_player_limit: u32,

    /// Leave as soon as a round reward is announced (pairs with `auto_join`)
    #[serde(default)]
    pub farming_mode: bool,

    /// Leave after the reward of the final stage only
    #[serde(default)]
    pub leave_after_final_stage: bool,

    /// How long the duty automation stays busy after issuing a command
    #[serde(default = "default_action_cooldown")]
    pub action_cooldown_secs: f32,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            auto_join: false,
            auto_join_delay_secs: default_join_delay(),
            auto_leave_if_not_solo: false,
            auto_leave_delay_secs: default_leave_delay(),
            auto_leave_player_limit: default_leave_limit(),
            farming_mode: false,
            leave_after_final_stage: false,
            action_cooldown_secs: default_action_cooldown(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────

/// Which overlay layers are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Hazard outlines
    #[serde(default = "default_true")]
    pub show_hazards: bool,

    /// Countdown text next to each hazard
    #[serde(default = "default_true")]
    pub show_hazard_text: bool,

    /// Recommended route
    #[serde(default = "default_true")]
    pub show_path: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_hazards: true,
            show_hazard_text: true,
            show_path: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Prediction
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning for hazard prediction.
///
/// These values are tuned against observed encounter timing rather than
/// derived, so they stay configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSettings {
    /// Padding applied to both ends of the travel-time window (seconds)
    #[serde(default = "default_window_padding")]
    pub window_padding_secs: f32,

    /// Hazards activating later than this are not evaluated (seconds)
    #[serde(default = "default_lookahead")]
    pub lookahead_secs: f32,

    /// Nominal player travel speed used to turn distances into times (units/s)
    #[serde(default = "default_travel_speed")]
    pub travel_speed: f32,
}

impl PredictionSettings {
    /// Seconds per distance unit at the nominal travel speed
    pub fn inv_speed(&self) -> f32 {
        if self.travel_speed > 0.0 {
            1.0 / self.travel_speed
        } else {
            0.0
        }
    }
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            window_padding_secs: default_window_padding(),
            lookahead_secs: default_lookahead(),
            travel_speed: default_travel_speed(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Zones
// ─────────────────────────────────────────────────────────────────────────────

/// Zone identities the overlay is active in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSettings {
    /// Queueing area where auto-join operates
    #[serde(default = "default_lobby_zone")]
    pub lobby_zone: u32,

    /// Instanced arena where hazards are predicted
    #[serde(default = "default_arena_zone")]
    pub arena_zone: u32,
}

impl ZoneSettings {
    /// The overlay is shown in either zone
    pub fn is_tracked(&self, zone: u32) -> bool {
        zone == self.lobby_zone || zone == self.arena_zone
    }
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            lobby_zone: default_lobby_zone(),
            arena_zone: default_arena_zone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat & Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// Chat phrases the automation reacts to. Locale specific, so user editable.
///
/// A phrase matches as a substring. `{n}` inside a phrase stands for a run of
/// digits, which becomes the reward amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPhrases {
    /// Announcement that a round is about to start
    #[serde(default = "default_round_starting")]
    pub round_starting: Vec<String>,

    /// Announcement that a reward was granted at the end of a round
    #[serde(default = "default_reward_granted")]
    pub reward_granted: Vec<String>,
}

impl Default for ChatPhrases {
    fn default() -> Self {
        Self {
            round_starting: default_round_starting(),
            reward_granted: default_reward_granted(),
        }
    }
}

/// Recipient pair and limits for match notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifySettings {
    #[serde(default)]
    pub enabled: bool,

    /// Name of this account as shown in messages
    #[serde(default)]
    pub account_name: String,

    /// Identity receiving the message
    #[serde(default)]
    pub recipient: String,

    /// Identity of the bot relaying the message
    #[serde(default)]
    pub sender: String,

    /// Notify only for matches with at most this many players
    #[serde(default = "default_notify_max_players")]
    pub max_players: u32,
}

impl NotifySettings {
    /// All identities are filled in
    pub fn is_complete(&self) -> bool {
        !self.account_name.trim().is_empty()
            && !self.recipient.trim().is_empty()
            && !self.sender.trim().is_empty()
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            account_name: String::new(),
            recipient: String::new(),
            sender: String::new(),
            max_players: default_notify_max_players(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub automation: AutomationSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub prediction: PredictionSettings,
    #[serde(default)]
    pub zones: ZoneSettings,
    #[serde(default)]
    pub chat: ChatPhrases,
    #[serde(default)]
    pub notify: NotifySettings,

    /// Directory containing arena definition files
    #[serde(default)]
    pub definitions_directory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.automation.auto_join_delay_secs, 0.5);
        assert_eq!(config.automation.auto_leave_delay_secs, 3.0);
        assert_eq!(config.prediction.window_padding_secs, 0.1);
        assert_eq!(config.prediction.lookahead_secs, 2.5);
        assert!(config.display.show_path);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[automation]
auto_join = true
auto_leave_player_limit = 3

[prediction]
travel_speed = 10.0
"#,
        )
        .expect("partial config parses");

        assert!(config.automation.auto_join);
        assert_eq!(config.automation.auto_leave_player_limit, 3);
        assert_eq!(config.automation.auto_join_delay_secs, 0.5);
        assert!((config.prediction.inv_speed() - 0.1).abs() < 1e-6);
        assert_eq!(config.zones.arena_zone, 1165);
    }

    #[test]
    fn test_chat_phrases_default_to_game_announcements() {
        let config: AppConfig = toml::from_str("[chat]\nround_starting = []\n").expect("parses");
        assert!(config.chat.round_starting.is_empty());
        assert_eq!(config.chat.reward_granted, ChatPhrases::default().reward_granted);
        assert!(
            ChatPhrases::default()
                .reward_granted
                .iter()
                .all(|p| p.contains("{n}"))
        );
    }

    #[test]
    fn test_notify_completeness() {
        let mut notify = NotifySettings::default();
        assert!(!notify.is_complete());
        notify.account_name = "Alt".to_string();
        notify.recipient = "1001".to_string();
        notify.sender = "  ".to_string();
        assert!(!notify.is_complete());
        notify.sender = "2002".to_string();
        assert!(notify.is_complete());
    }

    #[test]
    fn test_zero_travel_speed_has_no_inverse() {
        let prediction = PredictionSettings {
            travel_speed: 0.0,
            ..Default::default()
        };
        assert_eq!(prediction.inv_speed(), 0.0);
    }
}
