//! Debounced trigger
//!
//! A single-slot timer that fires an action once its gating condition has
//! held continuously for a configured delay.
//!
//! # Lifecycle
//!
//! 1. Idle: condition false, or true but already fired for this run
//! 2. Condition turns true → Armed with `fire_at = now + delay`
//! 3. Condition turns false while armed → Cancelled, back to Idle
//! 4. `now >= fire_at` while still true → Fired, back to Idle
//!
//! Re-arming needs the condition to go false and then true again, so a
//! condition that stays true fires exactly once.

use chrono::NaiveDateTime;

use crate::timing::{add_secs, secs_between};

/// What a tick did to the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Nothing armed, nothing happened
    Idle,
    /// Armed this tick
    Armed { fire_at: NaiveDateTime },
    /// Still armed, waiting for `fire_at`
    Waiting,
    /// Condition dropped while armed
    Cancelled,
    /// Delay elapsed; the caller runs the action
    Fired,
}

#[derive(Debug, Clone)]
pub struct DebouncedTrigger {
    name: &'static str,
    delay_secs: f32,
    fire_at: Option<NaiveDateTime>,
    last_condition: bool,
}

impl DebouncedTrigger {
    pub fn new(name: &'static str, delay_secs: f32) -> Self {
        Self {
            name,
            delay_secs: delay_secs.max(0.0),
            fire_at: None,
            last_condition: false,
        }
    }

    /// Takes effect the next time the trigger arms
    pub fn set_delay(&mut self, delay_secs: f32) {
        self.delay_secs = delay_secs.max(0.0);
    }

    pub fn is_armed(&self) -> bool {
        self.fire_at.is_some()
    }

    pub fn fire_at(&self) -> Option<NaiveDateTime> {
        self.fire_at
    }

    /// Seconds until firing, if armed
    pub fn remaining_secs(&self, now: NaiveDateTime) -> Option<f32> {
        self.fire_at.map(|at| secs_between(now, at).max(0.0))
    }

    /// Drop any armed state, e.g. when the feature is switched off
    pub fn reset(&mut self) {
        self.fire_at = None;
        self.last_condition = false;
    }

    /// Evaluate the gating condition for this frame
    pub fn tick(&mut self, now: NaiveDateTime, condition: bool) -> TriggerEvent {
        let rising = condition && !self.last_condition;
        self.last_condition = condition;

        if !condition {
            if self.fire_at.take().is_some() {
                tracing::debug!(trigger = self.name, "Auto-{} cancelled", self.name);
                return TriggerEvent::Cancelled;
            }
            return TriggerEvent::Idle;
        }

        let armed_now = match self.fire_at {
            Some(_) => None,
            None if rising => {
                let Some(fire_at) = add_secs(now, self.delay_secs) else {
                    tracing::warn!(
                        trigger = self.name,
                        delay_secs = self.delay_secs,
                        "Auto-{} delay out of range, not arming",
                        self.name
                    );
                    return TriggerEvent::Idle;
                };
                tracing::debug!(
                    trigger = self.name,
                    delay_secs = self.delay_secs,
                    "Auto-{} in {:.2}s...",
                    self.name,
                    self.delay_secs
                );
                self.fire_at = Some(fire_at);
                Some(fire_at)
            }
            // Already fired during this run of the condition
            None => return TriggerEvent::Idle,
        };

        match self.fire_at {
            Some(fire_at) if now >= fire_at => {
                self.fire_at = None;
                tracing::debug!(trigger = self.name, "Auto-{} firing", self.name);
                TriggerEvent::Fired
            }
            _ => match armed_now {
                Some(fire_at) => TriggerEvent::Armed { fire_at },
                None => TriggerEvent::Waiting,
            },
        }
    }
}
