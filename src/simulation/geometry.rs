//! 2-D vector and line-segment primitives used for motion and sensing.
//!
//! Coordinates follow the screen convention: the y axis points down, and the
//! canonical forward direction at rotation zero is `(0, -1)` ("up").

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// An immutable 2-D vector / point.
///
/// Equality is component-wise; all operations return new values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component (positive is down).
    pub y: f32,
}

impl Vec2 {
    /// Creates a vector from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rotates the vector by `angle` radians about the origin.
    ///
    /// Standard mathematical rotation: `rotate(0.0)` is the identity and
    /// `v.rotate(a).rotate(b)` equals `v.rotate(a + b)` up to floating error.
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Returns the Euclidean magnitude of the vector.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns the Euclidean distance to another point.
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Returns the 2-D cross product (z component of the 3-D cross product).
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, k: f32) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// A finite line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
}

impl Segment {
    /// Creates a segment from its endpoints.
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Returns the crossing point of two finite segments, if any.
    ///
    /// Solves the parametric line equations and requires both parameters to
    /// land in `[0, 1]`, so segments whose infinite extensions cross beyond
    /// their extents do not intersect. Parallel, collinear, and zero-length
    /// inputs are degenerate and resolve to `None` (the near-zero denominator
    /// is guarded, so no NaN or infinity can escape). The result is symmetric
    /// in its arguments.
    pub fn intersection(&self, other: &Segment) -> Option<Vec2> {
        let r = self.end - self.start;
        let s = other.end - other.start;

        let denom = r.cross(s);
        if denom.abs() <= f32::EPSILON {
            return None;
        }

        let offset = other.start - self.start;
        let t = offset.cross(s) / denom;
        let u = offset.cross(r) / denom;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.start + r * t)
        } else {
            None
        }
    }

    /// Whether two finite segments cross.
    ///
    /// Agrees with [`Segment::intersection`] by construction: this is true
    /// exactly when `intersection` returns a point.
    pub fn intersects(&self, other: &Segment) -> bool {
        self.intersection(other).is_some()
    }
}
