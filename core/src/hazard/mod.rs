//! Area hazards
//!
//! This module provides:
//! - **Shapes**: circle, donut, cone, rectangle and line extents
//! - **Schedules**: when a hazard goes live, and how it repeats
//! - **Hazard**: a shape placed in the arena with its schedule
//!
//! Intersection is computed in distance space (positions along the player's
//! heading). Callers convert to time with the inverse travel speed and then
//! ask the schedule whether an activation lands inside that time window.

mod schedule;
mod shape;


pub use schedule::Schedule;
pub use shape::{Outline, Shape};

use chrono::NaiveDateTime;
use glam::{Vec2, Vec3};

use crate::geometry::{Span, xz};

/// A hazard placed in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    /// Display label
    pub name: String,

    /// Sequence group this hazard is triggered with, if any
    pub group: Option<String>,

    pub shape: Shape,

    /// World position; only X/Z matter for queries
    pub origin: Vec3,

    /// Unit ground-plane facing for directional shapes
    pub facing: Vec2,

    pub schedule: Schedule,
}

impl Hazard {
    pub fn new(name: impl Into<String>, shape: Shape, origin: Vec3, facing: Vec2) -> Self {
        let unit = facing.normalize_or_zero();
        let facing = if unit == Vec2::ZERO { Vec2::Y } else { unit };
        Self {
            name: name.into(),
            group: None,
            shape,
            origin,
            facing,
            schedule: Schedule::default(),
        }
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn next_activation(&self) -> Option<NaiveDateTime> {
        self.schedule.next_activation
    }

    /// Whether a stationary point lies inside the hazard
    pub fn contains(&self, point: Vec3) -> bool {
        self.shape.contains(xz(self.origin), self.facing, xz(point))
    }

    /// Distances along the ray where it overlaps the hazard.
    /// [`Span::NONE`] when it never does or `ray_dir` is zero.
    pub fn intersect(&self, ray_origin: Vec3, ray_dir: Vec3) -> Span {
        self.shape
            .intersect(xz(self.origin), self.facing, xz(ray_origin), xz(ray_dir))
    }

    /// Overlap of the player's trajectory with the hazard.
    ///
    /// A moving player is tested along `direction`; a stationary one falls
    /// back to containment, yielding [`Span::INSIDE`] or [`Span::NONE`].
    pub fn trajectory(&self, position: Vec3, direction: Vec3, moving: bool) -> Span {
        if moving {
            self.intersect(position, direction)
        } else if self.contains(position) {
            Span::INSIDE
        } else {
            Span::NONE
        }
    }

    /// See [`Schedule::activates_between`]
    pub fn activates_between(&self, now: NaiveDateTime, t_min: f32, t_max: f32) -> f32 {
        self.schedule.activates_between(now, t_min, t_max)
    }

    /// See [`Schedule::advance`]
    pub fn advance_schedule(&mut self, now: NaiveDateTime) {
        self.schedule.advance(now);
    }

    pub fn outline(&self) -> Outline {
        self.shape.outline(xz(self.origin), self.facing, self.origin.y)
    }
}
