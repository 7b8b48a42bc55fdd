//! Host seams
//!
//! The core never talks to the game directly. Everything it reads (zone,
//! player position, duty conditions) and everything it does (duty commands,
//! drawing, notifications) goes through these traits, which the embedding
//! host implements and hands to the orchestrator at construction.

#[cfg(test)]
pub mod testing;

use glam::Vec3;
use thiserror::Error;

use crate::hazard::Outline;
use dodger_types::Color;

/// Duty-related flags of the local character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conditions {
    pub bound_by_duty: bool,
    pub between_areas: bool,
    pub waiting_for_duty: bool,
}

/// Current zone and character conditions
pub trait WorldState {
    fn zone(&self) -> u32;
    fn conditions(&self) -> Conditions;
}

/// Local player and the players around it
pub trait PlayerState {
    /// `None` while no character is loaded
    fn position(&self) -> Option<Vec3>;
    /// Player-type entities currently present in the encounter, including
    /// the local player (not the party size)
    fn player_count(&self) -> u32;
}

#[derive(Debug, Error)]
#[error("duty command rejected: {0}")]
pub struct DutyError(pub String);

/// Fire-and-forget duty commands. Completion is observed through
/// [`Conditions`] on later frames.
pub trait DutyActions {
    fn register_for_duty(&mut self) -> Result<(), DutyError>;
    fn leave_duty(&mut self) -> Result<(), DutyError>;
}

/// Immediate-mode world-space drawing. Calls only happen inside a frame.
pub trait RenderSink {
    fn draw_world_line(&mut self, from: Vec3, to: Vec3, color: Color);
    fn draw_world_text(&mut self, at: Vec3, color: Color, text: &str);
    fn draw_outline(&mut self, outline: &Outline, color: Color);
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel closed")]
    Closed,

    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// Outbound messages. Delivery happens off the frame loop; only enqueue
/// failures are visible here.
pub trait NotificationSink {
    fn send(&mut self, message: &str, recipient: &str, sender: &str) -> Result<(), NotifyError>;
}
