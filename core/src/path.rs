//! Recommended route through the arena
//!
//! A path is an ordered list of waypoints, each with the moment the player
//! should start moving towards it. Progress only moves forward: once a
//! waypoint is reached it is skipped for the rest of the phase.

use chrono::NaiveDateTime;
use glam::Vec3;

use crate::geometry::distance_xz;
use crate::timing::secs_between;

/// Default horizontal distance at which a waypoint counts as reached
pub const DEFAULT_ARRIVAL_TOLERANCE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub dest: Vec3,
    /// When to start moving towards `dest`
    pub start_move_at: NaiveDateTime,
}

/// One leg of the remaining route, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct PathLeg {
    /// Index of the waypoint this leg leads to
    pub index: usize,
    pub from: Vec3,
    pub to: Vec3,
    /// Seconds until the player should start moving (non-positive = move now)
    pub delay_secs: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    skip: usize,
    tolerance: f32,
}

impl Path {
    pub fn new(waypoints: Vec<Waypoint>, tolerance: f32) -> Self {
        Self {
            waypoints,
            skip: 0,
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the first waypoint not yet reached
    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn is_complete(&self) -> bool {
        self.skip >= self.waypoints.len()
    }

    pub fn remaining(&self) -> &[Waypoint] {
        &self.waypoints[self.skip.min(self.waypoints.len())..]
    }

    /// Skip past every consecutive waypoint the player is standing on
    pub fn advance(&mut self, player_pos: Vec3) {
        while let Some(next) = self.waypoints.get(self.skip) {
            if distance_xz(player_pos, next.dest) > self.tolerance {
                break;
            }
            self.skip += 1;
        }
    }

    /// Remaining route as legs starting from the player's position
    pub fn legs(&self, player_pos: Vec3, now: NaiveDateTime) -> Vec<PathLeg> {
        let mut from = player_pos;
        self.remaining()
            .iter()
            .enumerate()
            .map(|(offset, wp)| {
                let leg = PathLeg {
                    index: self.skip + offset,
                    from,
                    to: wp.dest,
                    delay_secs: secs_between(now, wp.start_move_at),
                };
                from = wp.dest;
                leg
            })
            .collect()
    }
}
