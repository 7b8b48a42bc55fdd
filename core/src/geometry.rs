//! Ground-plane geometry
//!
//! World positions are `Vec3` with Y as the vertical axis. Every query here
//! works on the XZ ground plane, projected to `Vec2(x, z)`.
//!
//! Ray queries return a [`Span`]: the signed distances along the ray at which
//! it enters and leaves a shape. A ray that never overlaps the shape, or a
//! degenerate (zero) direction, yields [`Span::NONE`] whose bounds are NaN.

use glam::{Vec2, Vec3};

/// Directions shorter than this are treated as "not moving"
const DIRECTION_EPSILON: f32 = 1e-6;

/// Project a world position onto the ground plane
pub fn xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a ground-plane point back to world space at height `y`
pub fn from_xz(v: Vec2, y: f32) -> Vec3 {
    Vec3::new(v.x, y, v.y)
}

/// Normalize ignoring the vertical axis. Zero stays zero.
pub fn normalized_xz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Horizontal distance between two world positions
pub fn distance_xz(a: Vec3, b: Vec3) -> f32 {
    xz(a).distance(xz(b))
}

/// Unit ground-plane direction for a facing angle in radians.
/// Angle 0 faces +Z, positive angles turn towards +X.
pub fn direction_from_angle(radians: f32) -> Vec2 {
    Vec2::new(radians.sin(), radians.cos())
}

/// Rotate a ground-plane vector by `radians` (same convention as [`direction_from_angle`])
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos + v.y * sin, v.y * cos - v.x * sin)
}

// ─────────────────────────────────────────────────────────────────────────────
// Span
// ─────────────────────────────────────────────────────────────────────────────

/// Distance interval along a ray where it overlaps a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub enter: f32,
    pub exit: f32,
}

impl Span {
    /// No overlap
    pub const NONE: Span = Span {
        enter: f32::NAN,
        exit: f32::NAN,
    };

    /// A stationary point inside a shape: overlapping from now on
    pub const INSIDE: Span = Span {
        enter: 0.0,
        exit: f32::INFINITY,
    };

    /// The whole line, used as the starting point for clipping
    pub const UNBOUNDED: Span = Span {
        enter: f32::NEG_INFINITY,
        exit: f32::INFINITY,
    };

    pub fn new(enter: f32, exit: f32) -> Self {
        if enter > exit || enter.is_nan() || exit.is_nan() {
            Self::NONE
        } else {
            Self { enter, exit }
        }
    }

    pub fn is_none(&self) -> bool {
        self.enter.is_nan()
    }

    pub fn as_tuple(&self) -> (f32, f32) {
        (self.enter, self.exit)
    }

    /// Scale both bounds, e.g. distance to time
    pub fn scaled(&self, factor: f32) -> Span {
        if self.is_none() {
            return Self::NONE;
        }
        Span {
            enter: self.enter * factor,
            exit: self.exit * factor,
        }
    }

    /// Keep the part of the span where `a + b * t >= 0`
    pub fn clip_half_plane(self, a: f32, b: f32) -> Span {
        if self.is_none() {
            return Self::NONE;
        }
        if b.abs() < DIRECTION_EPSILON {
            return if a >= 0.0 { self } else { Self::NONE };
        }
        let t = -a / b;
        if b > 0.0 {
            Span::new(self.enter.max(t), self.exit)
        } else {
            Span::new(self.enter, self.exit.min(t))
        }
    }

    /// Remove `hole` from this span.
    ///
    /// When the hole splits the span in two, the first piece that is not
    /// entirely behind the ray origin is returned; if both are behind, the
    /// later one.
    pub fn subtract(self, hole: Span) -> Span {
        if self.is_none() {
            return Self::NONE;
        }
        if hole.is_none() || hole.exit <= self.enter || hole.enter >= self.exit {
            return self;
        }

        let before = (hole.enter > self.enter).then(|| Span::new(self.enter, hole.enter));
        let after = (hole.exit < self.exit).then(|| Span::new(hole.exit, self.exit));

        match (before, after) {
            (Some(b), _) if b.exit >= 0.0 => b,
            (_, Some(a)) => a,
            (Some(b), None) => b,
            (None, None) => Self::NONE,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ray Primitives
// ─────────────────────────────────────────────────────────────────────────────

/// Ray against a circle (standard quadratic)
pub fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Span {
    let a = dir.length_squared();
    if a < DIRECTION_EPSILON {
        return Span::NONE;
    }
    let oc = origin - center;
    let half_b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return Span::NONE;
    }
    let root = discriminant.sqrt();
    Span::new((-half_b - root) / a, (-half_b + root) / a)
}

/// Ray against an axis-aligned box `[min, max]`, both given in the same frame as the ray
pub fn ray_slab(origin: Vec2, dir: Vec2, min: Vec2, max: Vec2) -> Span {
    if dir.length_squared() < DIRECTION_EPSILON {
        return Span::NONE;
    }

    let mut span = Span::UNBOUNDED;
    for (o, d, lo, hi) in [
        (origin.x, dir.x, min.x, max.x),
        (origin.y, dir.y, min.y, max.y),
    ] {
        if d.abs() < DIRECTION_EPSILON {
            if o < lo || o > hi {
                return Span::NONE;
            }
            continue;
        }
        let (t1, t2) = ((lo - o) / d, (hi - o) / d);
        let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        span = Span::new(span.enter.max(near), span.exit.min(far));
        if span.is_none() {
            return Span::NONE;
        }
    }
    span
}
