//! Hazard shapes
//!
//! Each variant carries its own extents; position and orientation are passed
//! in by the owning [`Hazard`](super::Hazard). All math happens on the ground
//! plane, see [`crate::geometry`].

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Span, from_xz, ray_circle, ray_slab, rotate};

/// Number of segments used to approximate a cone's arc in outlines
const ARC_SEGMENTS: usize = 16;

/// Area covered by a hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Circle {
        radius: f32,
    },
    /// Ring between two radii; the inner disc is safe
    Donut {
        inner_radius: f32,
        outer_radius: f32,
    },
    /// Circular sector centered on the facing direction
    Cone {
        radius: f32,
        /// Half of the opening angle, in degrees
        half_angle_deg: f32,
    },
    /// Rectangle around the origin, extending `length_front` along the facing
    /// and `length_back` against it
    Rect {
        length_front: f32,
        length_back: f32,
        half_width: f32,
    },
    /// Rectangle starting at the origin and extending along the facing
    Line {
        length: f32,
        half_width: f32,
    },
}

/// What the renderer should draw for a shape
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Circle {
        center: Vec3,
        radius: f32,
    },
    Donut {
        center: Vec3,
        inner_radius: f32,
        outer_radius: f32,
    },
    /// Closed polygon; the last point connects back to the first
    Polygon(Vec<Vec3>),
}

impl Shape {
    /// Whether a ground-plane point lies inside the shape
    pub fn contains(&self, origin: Vec2, facing: Vec2, point: Vec2) -> bool {
        let offset = point - origin;
        match *self {
            Shape::Circle { radius } => offset.length_squared() <= radius * radius,
            Shape::Donut {
                inner_radius,
                outer_radius,
            } => {
                let dist_sq = offset.length_squared();
                dist_sq >= inner_radius * inner_radius && dist_sq <= outer_radius * outer_radius
            }
            Shape::Cone {
                radius,
                half_angle_deg,
            } => {
                let dist = offset.length();
                dist <= radius
                    && facing.dot(offset) >= dist * half_angle_deg.to_radians().cos()
            }
            Shape::Rect {
                length_front,
                length_back,
                half_width,
            } => {
                let local = to_local(offset, facing);
                local.x.abs() <= half_width && local.y >= -length_back && local.y <= length_front
            }
            Shape::Line { length, half_width } => {
                let local = to_local(offset, facing);
                local.x.abs() <= half_width && local.y >= 0.0 && local.y <= length
            }
        }
    }

    /// Distance interval along a ray where it overlaps the shape
    pub fn intersect(&self, origin: Vec2, facing: Vec2, ray_origin: Vec2, ray_dir: Vec2) -> Span {
        match *self {
            Shape::Circle { radius } => ray_circle(ray_origin, ray_dir, origin, radius),
            Shape::Donut {
                inner_radius,
                outer_radius,
            } => {
                let outer = ray_circle(ray_origin, ray_dir, origin, outer_radius);
                let inner = ray_circle(ray_origin, ray_dir, origin, inner_radius);
                outer.subtract(inner)
            }
            Shape::Cone {
                radius,
                half_angle_deg,
            } => {
                let circle = ray_circle(ray_origin, ray_dir, origin, radius);
                let half_angle = half_angle_deg.to_radians();
                if circle.is_none() || half_angle >= PI {
                    return circle;
                }
                let rel = ray_origin - origin;
                if half_angle <= FRAC_PI_2 {
                    clip_wedge(circle, rel, ray_dir, facing, half_angle)
                } else {
                    // Reflex sector: remove the convex wedge pointing backwards
                    let behind = clip_wedge(Span::UNBOUNDED, rel, ray_dir, -facing, PI - half_angle);
                    circle.subtract(behind)
                }
            }
            Shape::Rect {
                length_front,
                length_back,
                half_width,
            } => ray_slab(
                to_local(ray_origin - origin, facing),
                to_local(ray_dir, facing),
                Vec2::new(-half_width, -length_back),
                Vec2::new(half_width, length_front),
            ),
            Shape::Line { length, half_width } => ray_slab(
                to_local(ray_origin - origin, facing),
                to_local(ray_dir, facing),
                Vec2::new(-half_width, 0.0),
                Vec2::new(half_width, length),
            ),
        }
    }

    /// Outline in world space at height `y`
    pub fn outline(&self, origin: Vec2, facing: Vec2, y: f32) -> Outline {
        match *self {
            Shape::Circle { radius } => Outline::Circle {
                center: from_xz(origin, y),
                radius,
            },
            Shape::Donut {
                inner_radius,
                outer_radius,
            } => Outline::Donut {
                center: from_xz(origin, y),
                inner_radius,
                outer_radius,
            },
            Shape::Cone {
                radius,
                half_angle_deg,
            } => {
                let half_angle = half_angle_deg.to_radians();
                let mut points = Vec::with_capacity(ARC_SEGMENTS + 2);
                points.push(from_xz(origin, y));
                for i in 0..=ARC_SEGMENTS {
                    let angle = -half_angle + 2.0 * half_angle * i as f32 / ARC_SEGMENTS as f32;
                    points.push(from_xz(origin + rotate(facing, angle) * radius, y));
                }
                Outline::Polygon(points)
            }
            Shape::Rect {
                length_front,
                length_back,
                half_width,
            } => rect_outline(origin, facing, -length_back, length_front, half_width, y),
            Shape::Line { length, half_width } => {
                rect_outline(origin, facing, 0.0, length, half_width, y)
            }
        }
    }
}

/// Right-hand side of a facing direction
fn right_of(facing: Vec2) -> Vec2 {
    Vec2::new(facing.y, -facing.x)
}

/// Express a ground-plane vector as (right, forward) components
fn to_local(v: Vec2, facing: Vec2) -> Vec2 {
    Vec2::new(v.dot(right_of(facing)), v.dot(facing))
}

/// Clip a span to the convex wedge of `half_angle` (at most 90°) around `facing`.
/// `rel` is the ray origin relative to the wedge apex.
fn clip_wedge(span: Span, rel: Vec2, dir: Vec2, facing: Vec2, half_angle: f32) -> Span {
    let mut span = span;
    for edge in [rotate(facing, half_angle), rotate(facing, -half_angle)] {
        // Keep the side of the edge line that the facing direction is on
        let side = edge.perp_dot(facing).signum();
        span = span.clip_half_plane(side * edge.perp_dot(rel), side * edge.perp_dot(dir));
    }
    span
}

fn rect_outline(origin: Vec2, facing: Vec2, back: f32, front: f32, half_width: f32, y: f32) -> Outline {
    let right = right_of(facing) * half_width;
    let corners = [
        origin + facing * front - right,
        origin + facing * front + right,
        origin + facing * back + right,
        origin + facing * back - right,
    ];
    Outline::Polygon(corners.iter().map(|c| from_xz(*c, y)).collect())
}
