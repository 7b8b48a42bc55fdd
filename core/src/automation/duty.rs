//! Duty command wrapper
//!
//! Duty commands are fire-and-forget; the game applies them some frames
//! later. After issuing one the automation stays busy for a short cooldown
//! so a second command never overlaps the first.

use chrono::NaiveDateTime;

use crate::host::DutyActions;
use crate::timing::add_secs;

#[derive(Debug)]
pub struct DutyAutomation<D> {
    actions: D,
    cooldown_secs: f32,
    busy_until: Option<NaiveDateTime>,
}

impl<D: DutyActions> DutyAutomation<D> {
    pub fn new(actions: D, cooldown_secs: f32) -> Self {
        Self {
            actions,
            cooldown_secs: cooldown_secs.max(0.0),
            busy_until: None,
        }
    }

    pub fn actions(&self) -> &D {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut D {
        &mut self.actions
    }

    pub fn set_cooldown(&mut self, cooldown_secs: f32) {
        self.cooldown_secs = cooldown_secs.max(0.0);
    }

    pub fn is_idle(&self) -> bool {
        self.busy_until.is_none()
    }

    /// Clear the busy flag once the cooldown has passed
    pub fn update(&mut self, now: NaiveDateTime) {
        if self.busy_until.is_some_and(|until| now >= until) {
            self.busy_until = None;
        }
    }

    /// Queue for the duty. Returns whether the command was issued.
    pub fn register_for_duty(&mut self, now: NaiveDateTime) -> bool {
        self.issue(now, "register", |actions| actions.register_for_duty())
    }

    /// Leave the current duty. Returns whether the command was issued.
    pub fn leave_duty(&mut self, now: NaiveDateTime) -> bool {
        self.issue(now, "leave", |actions| actions.leave_duty())
    }

    fn issue<F>(&mut self, now: NaiveDateTime, command: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut D) -> Result<(), crate::host::DutyError>,
    {
        if !self.is_idle() {
            tracing::debug!(command, "Duty automation busy, skipping");
            return false;
        }

        match f(&mut self.actions) {
            Ok(()) => {
                tracing::info!(command, "Duty command issued");
                self.busy_until = add_secs(now, self.cooldown_secs);
                if self.busy_until.is_none() {
                    tracing::warn!(
                        cooldown_secs = self.cooldown_secs,
                        "Cooldown out of range, staying idle"
                    );
                }
                true
            }
            Err(e) => {
                tracing::warn!(command, error = %e, "Duty command failed");
                false
            }
        }
    }
}
