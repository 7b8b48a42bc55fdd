//! Arena definition types
//!
//! Definitions are static per-stage data loaded from TOML files and describe
//! where a stage is, which hazards it contains and the recommended route.
//!
//! ```toml
//! [arena]
//! phase = "stage3"
//! name = "Final Stage"
//! zone = 1165
//! region = { min_x = -40.0, max_x = 40.0, min_z = 100.0, max_z = 350.0 }
//!
//! [[hazard]]
//! name = "Bumper"
//! shape = { type = "circle", radius = 5.0 }
//! origin = [0.0, 0.0, 150.0]
//! first_activation_secs = 3.0
//! repeat_secs = 4.0
//!
//! [[waypoint]]
//! dest = [0.0, 0.0, 160.0]
//! start_move_secs = 4.5
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ArenaPhase;
use crate::hazard::Shape;
use crate::path::DEFAULT_ARRIVAL_TOLERANCE;

fn default_tolerance() -> f32 {
    DEFAULT_ARRIVAL_TOLERANCE
}

// ═══════════════════════════════════════════════════════════════════════════
// Root Config Structure
// ═══════════════════════════════════════════════════════════════════════════

/// Root structure of an arena definition file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub arena: ArenaHeader,

    #[serde(default, rename = "hazard")]
    pub hazards: Vec<HazardDefinition>,

    #[serde(default, rename = "waypoint")]
    pub waypoints: Vec<WaypointDefinition>,
}

/// Stage metadata and detection region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaHeader {
    pub phase: ArenaPhase,

    /// Display name; falls back to the phase label
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Zone identity the stage lives in
    pub zone: u32,

    pub region: Region,

    /// Horizontal distance at which a waypoint counts as reached
    #[serde(default = "default_tolerance")]
    pub arrival_tolerance: f32,

    /// Strategy hints shown with the overlay status
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ArenaHeader {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.phase.label()
        } else {
            &self.name
        }
    }
}

/// Ground-plane rectangle, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Region {
    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.z >= self.min_z && pos.z <= self.max_z
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Hazards & Route
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardDefinition {
    pub name: String,

    pub shape: Shape,

    pub origin: Vec3,

    /// Facing angle in degrees, 0 = +Z
    #[serde(default)]
    pub facing_deg: f32,

    /// First activation relative to the stage start. Hazards without one
    /// wait for their sequence group to be triggered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_activation_secs: Option<f32>,

    #[serde(default)]
    pub repeat_secs: f32,

    #[serde(default)]
    pub sequence_delay_secs: f32,

    /// Sequence group, see `ArenaMap::trigger_sequence`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointDefinition {
    pub dest: Vec3,

    /// When to start moving towards `dest`, relative to the stage start
    #[serde(default)]
    pub start_move_secs: f32,
}

impl ArenaConfig {
    /// Check extents and timings; returns the first problem found
    pub fn validate(&self) -> Result<(), String> {
        let region = &self.arena.region;
        if region.min_x > region.max_x || region.min_z > region.max_z {
            return Err("region bounds are inverted".to_string());
        }
        if self.arena.arrival_tolerance < 0.0 {
            return Err("arrival_tolerance must not be negative".to_string());
        }

        for hazard in &self.hazards {
            validate_shape(&hazard.shape).map_err(|reason| format!("hazard '{}': {}", hazard.name, reason))?;
            let timings = [
                ("repeat_secs", Some(hazard.repeat_secs)),
                ("sequence_delay_secs", Some(hazard.sequence_delay_secs)),
                ("first_activation_secs", hazard.first_activation_secs),
            ];
            for (field, value) in timings {
                let Some(value) = value else { continue };
                check_timing(field, value)
                    .map_err(|reason| format!("hazard '{}': {}", hazard.name, reason))?;
            }
            if hazard.repeat_secs > 0.0 && hazard.repeat_secs < MIN_REPEAT_SECS {
                return Err(format!(
                    "hazard '{}': repeat_secs must be 0 (one-shot) or at least {}",
                    hazard.name, MIN_REPEAT_SECS
                ));
            }
        }

        let mut last_start = f32::NEG_INFINITY;
        for (i, wp) in self.waypoints.iter().enumerate() {
            check_timing("start_move_secs", wp.start_move_secs)
                .map_err(|reason| format!("waypoint {}: {}", i, reason))?;
            if wp.start_move_secs < last_start {
                return Err(format!("waypoint {} starts before the previous one", i));
            }
            last_start = wp.start_move_secs;
        }
        Ok(())
    }
}

/// Longest offset accepted for any definition timing
pub const MAX_TIMING_SECS: f32 = 86_400.0;

/// Shortest non-zero repeat interval
pub const MIN_REPEAT_SECS: f32 = 0.001;

fn check_timing(field: &str, value: f32) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be finite", field));
    }
    if !(0.0..=MAX_TIMING_SECS).contains(&value) {
        return Err(format!("{} must be within 0..={}", field, MAX_TIMING_SECS));
    }
    Ok(())
}

fn validate_shape(shape: &Shape) -> Result<(), &'static str> {
    match *shape {
        Shape::Circle { radius } if radius <= 0.0 => Err("radius must be positive"),
        Shape::Donut {
            inner_radius,
            outer_radius,
        } if inner_radius < 0.0 || outer_radius <= inner_radius => {
            Err("donut needs 0 <= inner_radius < outer_radius")
        }
        Shape::Cone {
            radius,
            half_angle_deg,
        } if radius <= 0.0 || half_angle_deg <= 0.0 || half_angle_deg > 180.0 => {
            Err("cone needs a positive radius and 0 < half_angle_deg <= 180")
        }
        Shape::Rect {
            length_front,
            length_back,
            half_width,
        } if half_width <= 0.0 || length_front + length_back <= 0.0 => {
            Err("rect needs a positive width and length")
        }
        Shape::Line { length, half_width } if length <= 0.0 || half_width <= 0.0 => {
            Err("line needs a positive width and length")
        }
        _ => Ok(()),
    }
}
