//! Recording fakes for the host traits

use glam::Vec3;

use super::{
    Conditions, DutyActions, DutyError, NotificationSink, NotifyError, PlayerState, RenderSink,
    WorldState,
};
use crate::hazard::Outline;
use dodger_types::Color;

#[derive(Debug, Clone, Default)]
pub struct FakeWorld {
    pub zone: u32,
    pub conditions: Conditions,
}

impl WorldState for FakeWorld {
    fn zone(&self) -> u32 {
        self.zone
    }

    fn conditions(&self) -> Conditions {
        self.conditions
    }
}

#[derive(Debug, Clone)]
pub struct FakePlayer {
    pub position: Option<Vec3>,
    pub player_count: u32,
}

impl Default for FakePlayer {
    fn default() -> Self {
        Self {
            position: Some(Vec3::ZERO),
            player_count: 1,
        }
    }
}

impl PlayerState for FakePlayer {
    fn position(&self) -> Option<Vec3> {
        self.position
    }

    fn player_count(&self) -> u32 {
        self.player_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyCall {
    Register,
    Leave,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDuty {
    pub calls: Vec<DutyCall>,
    /// Reject every command with this reason
    pub reject: Option<String>,
}

impl RecordingDuty {
    pub fn count(&self, call: DutyCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn record(&mut self, call: DutyCall) -> Result<(), DutyError> {
        self.calls.push(call);
        match &self.reject {
            Some(reason) => Err(DutyError(reason.clone())),
            None => Ok(()),
        }
    }
}

impl DutyActions for RecordingDuty {
    fn register_for_duty(&mut self) -> Result<(), DutyError> {
        self.record(DutyCall::Register)
    }

    fn leave_duty(&mut self) -> Result<(), DutyError> {
        self.record(DutyCall::Leave)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line { from: Vec3, to: Vec3, color: Color },
    Text { at: Vec3, color: Color, text: String },
    Outline { outline: Outline, color: Color },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingRender {
    pub calls: Vec<DrawCall>,
}

impl RecordingRender {
    pub fn lines(&self) -> Vec<(Vec3, Vec3, Color)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Line { from, to, color } => Some((*from, *to, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(Vec3, Color, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { at, color, text } => Some((*at, *color, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn outlines(&self) -> Vec<(Outline, Color)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Outline { outline, color } => Some((outline.clone(), *color)),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingRender {
    fn draw_world_line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn draw_world_text(&mut self, at: Vec3, color: Color, text: &str) {
        self.calls.push(DrawCall::Text {
            at,
            color,
            text: text.to_string(),
        });
    }

    fn draw_outline(&mut self, outline: &Outline, color: Color) {
        self.calls.push(DrawCall::Outline {
            outline: outline.clone(),
            color,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message: String,
    pub recipient: String,
    pub sender: String,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Vec<SentMessage>,
    pub closed: bool,
}

impl NotificationSink for RecordingNotifier {
    fn send(&mut self, message: &str, recipient: &str, sender: &str) -> Result<(), NotifyError> {
        if self.closed {
            return Err(NotifyError::Closed);
        }
        self.sent.push(SentMessage {
            message: message.to_string(),
            recipient: recipient.to_string(),
            sender: sender.to_string(),
        });
        Ok(())
    }
}
