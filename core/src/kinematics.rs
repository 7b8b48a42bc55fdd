//! Player movement sampling
//!
//! Direction and speed are derived from the position delta between two
//! consecutive frames. Missing data never fails a frame: no position means a
//! stationary player at the origin, and a non-positive frame time means zero
//! speed.

use glam::Vec3;

use crate::geometry::normalized_xz;

/// Movement of the local player during the last frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicSample {
    pub position: Vec3,
    /// Unit ground-plane heading, zero when not moving
    pub direction: Vec3,
    /// Units per second
    pub speed: f32,
}

impl KinematicSample {
    pub const STILL: KinematicSample = KinematicSample {
        position: Vec3::ZERO,
        direction: Vec3::ZERO,
        speed: 0.0,
    };

    pub fn is_moving(&self) -> bool {
        self.speed > 0.0 && self.direction != Vec3::ZERO
    }
}

impl Default for KinematicSample {
    fn default() -> Self {
        Self::STILL
    }
}

#[derive(Debug, Clone, Default)]
pub struct Kinematics {
    prev_pos: Option<Vec3>,
    last: KinematicSample,
}

impl Kinematics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> KinematicSample {
        self.last
    }

    /// Sample one frame
    pub fn sample(&mut self, position: Option<Vec3>, dt_secs: f32) -> KinematicSample {
        let Some(position) = position else {
            self.prev_pos = None;
            self.last = KinematicSample::STILL;
            return self.last;
        };

        let sample = match self.prev_pos {
            Some(prev) if dt_secs > 0.0 => {
                let delta = position - prev;
                KinematicSample {
                    position,
                    direction: normalized_xz(delta),
                    speed: delta.length() / dt_secs,
                }
            }
            _ => KinematicSample {
                position,
                ..KinematicSample::STILL
            },
        };

        self.prev_pos = Some(position);
        self.last = sample;
        sample
    }
}
