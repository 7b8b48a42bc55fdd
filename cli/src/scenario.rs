//! Frame scenarios
//!
//! A scenario is a TOML script of frames replayed through the orchestrator.
//! State set by a frame (zone, position, flags, player count, velocity) carries
//! over to later frames until changed. A frame with `until` repeats every
//! `frame_secs` up to that time, moving the player by its velocity.
//!
//! ```toml
//! [scenario]
//! name = "approach"
//! frame_secs = 0.1
//!
//! [config.prediction]
//! travel_speed = 10.0
//!
//! [[frame]]
//! at = 0.0
//! until = 2.0
//! zone = 1165
//! bound_by_duty = true
//! position = [-12.0, 0.0, -330.0]
//! velocity = [0.0, 0.0, 6.0]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use dodger_core::arena::{ArenaPhase, DefinitionError, MapRegistry};
use dodger_core::context::ConfigError;
use dodger_core::frame::FrameOrchestrator;
use dodger_core::host::NotificationSink;
use dodger_core::timing::add_secs;
use dodger_types::AppConfig;

use crate::host::{DutyCommand, ScriptRender, ScriptedDuty, ScriptedPlayer, ScriptedWorld};

/// Small slack so accumulated f32 steps still reach `until`
const STEP_EPSILON: f32 = 1e-4;

/// Longest scenario accepted, in seconds
const MAX_SCENARIO_SECS: f32 = 86_400.0;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid scenario {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error(transparent)]
    Definitions(#[from] DefinitionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Script Types
// ─────────────────────────────────────────────────────────────────────────────

fn default_frame_secs() -> f32 {
    0.1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub scenario: ScenarioHeader,

    /// Inline settings, replaced entirely by an explicit config file
    #[serde(default)]
    pub config: AppConfig,

    #[serde(default, rename = "frame")]
    pub frames: Vec<FrameScript>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioHeader {
    #[serde(default)]
    pub name: String,

    /// Tick length for repeated frames (seconds)
    #[serde(default = "default_frame_secs")]
    pub frame_secs: f32,
}

impl Default for ScenarioHeader {
    fn default() -> Self {
        Self {
            name: String::new(),
            frame_secs: default_frame_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameScript {
    /// Seconds since scenario start
    pub at: f32,
    #[serde(default)]
    pub until: Option<f32>,

    #[serde(default)]
    pub zone: Option<u32>,
    #[serde(default)]
    pub position: Option<Vec3>,
    /// Character not loaded from this frame on
    #[serde(default)]
    pub no_position: bool,
    #[serde(default)]
    pub velocity: Option<Vec3>,
    #[serde(default)]
    pub player_count: Option<u32>,

    #[serde(default)]
    pub bound_by_duty: Option<bool>,
    #[serde(default)]
    pub between_areas: Option<bool>,
    #[serde(default)]
    pub waiting_for_duty: Option<bool>,

    /// Chat lines delivered after the first tick
    #[serde(default)]
    pub chat: Vec<String>,
    /// Hazard sequence groups started after the first tick
    #[serde(default)]
    pub trigger: Vec<String>,
}

impl Scenario {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(content).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        scenario
            .validate()
            .map_err(|reason| ScenarioError::Invalid {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path).map_err(|source| ScenarioError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn validate(&self) -> Result<(), String> {
        let step = self.scenario.frame_secs;
        if !step.is_finite() || step <= 0.0 {
            return Err("frame_secs must be positive".to_string());
        }
        let mut last = 0.0;
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.at.is_nan() || frame.at < last {
                return Err(format!("frame {i} starts before the previous one"));
            }
            let end = frame.until.unwrap_or(frame.at);
            if end.is_nan() || end < frame.at {
                return Err(format!("frame {i} ends before it starts"));
            }
            if end > MAX_SCENARIO_SECS {
                return Err(format!("frame {i} runs past {MAX_SCENARIO_SECS}s"));
            }
            last = end;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runner
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub ticks: usize,
    pub lines: usize,
    pub texts: usize,
    pub outlines: usize,
    /// Duty commands with the scenario time they were issued at
    pub duty_commands: Vec<(f32, DutyCommand)>,
    pub phases: Vec<(f32, Option<ArenaPhase>)>,
    pub status: Vec<String>,
}

/// Fixed origin for scenario time; only offsets matter
fn scenario_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn apply_world(frame: &FrameScript, world: &mut ScriptedWorld) {
    if let Some(zone) = frame.zone {
        world.zone = zone;
    }
    if let Some(v) = frame.bound_by_duty {
        world.conditions.bound_by_duty = v;
    }
    if let Some(v) = frame.between_areas {
        world.conditions.between_areas = v;
    }
    if let Some(v) = frame.waiting_for_duty {
        world.conditions.waiting_for_duty = v;
    }
}

fn apply_player(frame: &FrameScript, player: &mut ScriptedPlayer) {
    if let Some(count) = frame.player_count {
        player.player_count = count;
    }
    if let Some(velocity) = frame.velocity {
        player.velocity = velocity;
    }
    if frame.no_position {
        player.position = None;
    } else if let Some(position) = frame.position {
        player.position = Some(position);
    }
}

/// Replay `scenario` through a fresh orchestrator
pub fn run<N: NotificationSink>(
    scenario: &Scenario,
    config: AppConfig,
    registry: MapRegistry,
    notifier: N,
    render: &mut ScriptRender,
) -> RunReport {
    let start = scenario_start();
    let step = scenario.scenario.frame_secs;

    let mut orchestrator = FrameOrchestrator::new(
        config,
        registry,
        ScriptedWorld::default(),
        ScriptedPlayer::default(),
        ScriptedDuty::default(),
        notifier,
    );

    let mut report = RunReport::default();
    let mut last_tick: Option<f32> = None;
    let mut phase: Option<ArenaPhase> = None;

    for frame in &scenario.frames {
        apply_world(frame, orchestrator.world_mut());
        apply_player(frame, orchestrator.player_mut());
        let pinned = frame.position.is_some() || frame.no_position;
        let end = frame.until.unwrap_or(frame.at);

        let mut t = frame.at;
        let mut first = true;
        loop {
            let dt = last_tick.map_or(step, |last| t - last);
            if !(first && pinned) {
                let player = orchestrator.player_mut();
                let velocity = player.velocity;
                if let Some(pos) = &mut player.position {
                    *pos += velocity * dt;
                }
            }

            let Some(now) = add_secs(start, t) else {
                tracing::warn!(t, "Frame time out of range, skipping");
                break;
            };
            let issued_before = orchestrator.duty().issued.len();

            render.set_time(t);
            orchestrator.frame(now, dt, render);

            if first {
                for group in &frame.trigger {
                    let count = orchestrator.trigger_sequence(group, now);
                    tracing::debug!(group, count, "Scripted sequence trigger");
                }
                for line in &frame.chat {
                    orchestrator.on_chat_line(now, line);
                }
            }

            report.duty_commands.extend(
                orchestrator.duty().issued[issued_before..]
                    .iter()
                    .map(|cmd| (t, *cmd)),
            );
            if orchestrator.phase() != phase {
                phase = orchestrator.phase();
                report.phases.push((t, phase));
            }

            report.ticks += 1;
            last_tick = Some(t);
            first = false;

            t += step;
            if t > end + STEP_EPSILON {
                break;
            }
        }
    }

    if let Some(now) = last_tick.and_then(|last| add_secs(start, last)) {
        report.status = orchestrator.status_lines(now);
    }

    let counts = render.counts();
    report.lines = counts.lines;
    report.texts = counts.texts;
    report.outlines = counts.outlines;
    report
}
