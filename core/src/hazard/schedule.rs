//! Hazard activation schedule
//!
//! # Lifecycle
//!
//! 1. Hazard starts unscheduled, or scheduled relative to the phase start
//! 2. A sequence trigger (or the definition) sets the next activation
//! 3. Every tick `advance` rolls a passed activation forward by the repeat
//!    interval, or clears it for one-shot hazards

use chrono::{Duration, NaiveDateTime};

use crate::timing::{add_secs, secs_between, secs_to_micros};

/// When a hazard goes live
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    /// Next activation instant. Strictly in the future after `advance`.
    pub next_activation: Option<NaiveDateTime>,

    /// Interval between repeats in seconds (0 = one-shot)
    pub repeat_secs: f32,

    /// Stagger added when the hazard is triggered as part of a sequence
    pub sequence_delay_secs: f32,
}

impl Schedule {
    pub fn new(repeat_secs: f32, sequence_delay_secs: f32) -> Self {
        Self {
            next_activation: None,
            repeat_secs: repeat_secs.max(0.0),
            sequence_delay_secs: sequence_delay_secs.max(0.0),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.next_activation.is_some()
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat_secs > 0.0
    }

    /// Schedule the first activation for a sequence starting at `at`
    pub fn trigger(&mut self, at: NaiveDateTime) {
        self.next_activation = add_secs(at, self.sequence_delay_secs);
        if self.next_activation.is_none() {
            tracing::warn!(
                sequence_delay_secs = self.sequence_delay_secs,
                "Sequence delay out of range, hazard left unscheduled"
            );
        }
    }

    /// Seconds until the next activation, if scheduled
    pub fn secs_until_next(&self, now: NaiveDateTime) -> Option<f32> {
        self.next_activation.map(|next| secs_between(now, next))
    }

    /// Roll the schedule forward once `now` has reached the next activation.
    ///
    /// Repeating hazards skip ahead by whole intervals so the next activation
    /// is strictly after `now`; one-shot hazards become unscheduled. Calling
    /// this again with the same `now` changes nothing.
    pub fn advance(&mut self, now: NaiveDateTime) {
        let Some(next) = self.next_activation else {
            return;
        };
        if now < next {
            return;
        }
        if !self.is_repeating() {
            self.next_activation = None;
            return;
        }

        // Whole microsecond steps, at least one, so the result is strictly after `now`
        let step = secs_to_micros(self.repeat_secs).unwrap_or(i64::MAX).max(1);
        self.next_activation = now
            .signed_duration_since(next)
            .num_microseconds()
            .and_then(|overdue| (overdue / step + 1).checked_mul(step))
            .and_then(|offset| next.checked_add_signed(Duration::microseconds(offset)));
        if self.next_activation.is_none() {
            tracing::warn!(
                repeat_secs = self.repeat_secs,
                "Repeat interval out of range, hazard left unscheduled"
            );
        }
    }

    /// Delay until the first activation inside `[t_min, t_max]`.
    ///
    /// The window is given as offsets in seconds from `now`, both bounds
    /// inclusive. Returns 0.0 when no activation falls inside the window or
    /// the hazard is unscheduled.
    pub fn activates_between(&self, now: NaiveDateTime, t_min: f32, t_max: f32) -> f32 {
        let Some(next) = self.next_activation else {
            return 0.0;
        };
        if t_min.is_nan() || t_max.is_nan() {
            return 0.0;
        }

        let mut t = secs_between(now, next);
        if self.is_repeating() && t < t_min {
            let cycles = ((t_min - t) / self.repeat_secs).ceil();
            t += cycles * self.repeat_secs;
        }

        if t >= t_min && t <= t_max {
            t.max(0.0)
        } else {
            0.0
        }
    }
}
