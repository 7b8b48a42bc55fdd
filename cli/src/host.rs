//! Scripted collaborators
//!
//! Stand-ins for the game client, driven by a scenario file instead of
//! memory reads. Duty commands are recorded, draw calls are counted (and
//! optionally echoed), notifications go onto a tokio channel.

use glam::Vec3;
use tokio::sync::mpsc::UnboundedSender;

use dodger_core::hazard::Outline;
use dodger_core::host::{
    Conditions, DutyActions, DutyError, NotificationSink, NotifyError, PlayerState, RenderSink,
    WorldState,
};
use dodger_types::Color;

// ─────────────────────────────────────────────────────────────────────────────
// World & Player
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ScriptedWorld {
    pub zone: u32,
    pub conditions: Conditions,
}

impl WorldState for ScriptedWorld {
    fn zone(&self) -> u32 {
        self.zone
    }

    fn conditions(&self) -> Conditions {
        self.conditions
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    pub position: Option<Vec3>,
    /// Applied every tick the script does not pin the position
    pub velocity: Vec3,
    pub player_count: u32,
}

impl Default for ScriptedPlayer {
    fn default() -> Self {
        Self {
            position: None,
            velocity: Vec3::ZERO,
            player_count: 1,
        }
    }
}

impl PlayerState for ScriptedPlayer {
    fn position(&self) -> Option<Vec3> {
        self.position
    }

    fn player_count(&self) -> u32 {
        self.player_count
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Duty
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyCommand {
    Register,
    Leave,
}

impl DutyCommand {
    pub fn label(&self) -> &'static str {
        match self {
            DutyCommand::Register => "register",
            DutyCommand::Leave => "leave",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedDuty {
    pub issued: Vec<DutyCommand>,
}

impl DutyActions for ScriptedDuty {
    fn register_for_duty(&mut self) -> Result<(), DutyError> {
        self.issued.push(DutyCommand::Register);
        Ok(())
    }

    fn leave_duty(&mut self) -> Result<(), DutyError> {
        self.issued.push(DutyCommand::Leave);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCounts {
    pub lines: usize,
    pub texts: usize,
    pub outlines: usize,
}

/// Counts draw calls; with `echo` also prints them to stdout
#[derive(Debug, Default)]
pub struct ScriptRender {
    echo: bool,
    time_secs: f32,
    counts: DrawCounts,
}

impl ScriptRender {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            ..Default::default()
        }
    }

    /// Timestamp prefixed to echoed calls
    pub fn set_time(&mut self, secs: f32) {
        self.time_secs = secs;
    }

    pub fn counts(&self) -> DrawCounts {
        self.counts
    }

    fn emit(&self, what: std::fmt::Arguments<'_>) {
        if self.echo {
            println!("[{:>8.3}] {}", self.time_secs, what);
        }
    }
}

fn hex(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        color[0], color[1], color[2], color[3]
    )
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl RenderSink for ScriptRender {
    fn draw_world_line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.counts.lines += 1;
        self.emit(format_args!(
            "line {} -> {} {}",
            fmt_vec(from),
            fmt_vec(to),
            hex(color)
        ));
    }

    fn draw_world_text(&mut self, at: Vec3, color: Color, text: &str) {
        self.counts.texts += 1;
        self.emit(format_args!("text {} {} {}", fmt_vec(at), hex(color), text));
    }

    fn draw_outline(&mut self, outline: &Outline, color: Color) {
        self.counts.outlines += 1;
        let shape = match outline {
            Outline::Circle { center, radius } => {
                format!("circle {} r={:.2}", fmt_vec(*center), radius)
            }
            Outline::Donut {
                center,
                inner_radius,
                outer_radius,
            } => format!(
                "donut {} r={:.2}..{:.2}",
                fmt_vec(*center),
                inner_radius,
                outer_radius
            ),
            Outline::Polygon(points) => format!("polygon {} points", points.len()),
        };
        self.emit(format_args!("outline {} {}", shape, hex(color)));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub recipient: String,
    pub sender: String,
}

/// Queues notifications for an async delivery task
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelNotifier {
    fn send(&mut self, message: &str, recipient: &str, sender: &str) -> Result<(), NotifyError> {
        self.tx
            .send(Notification {
                message: message.to_string(),
                recipient: recipient.to_string(),
                sender: sender.to_string(),
            })
            .map_err(|_| NotifyError::Closed)
    }
}
