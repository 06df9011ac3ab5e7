//! Minimal 3D math for pose analysis — vectors and unit quaternions.
//!
//! Only the operations the analyzers need: subtraction, scalar division,
//! dot product, length, zero-guarded normalization, Euclidean distance,
//! and quaternion rotation of a vector.

use std::ops::{Add, Div, Sub};

// ── Vec3 ────────────────────────────────────────────────────

/// Immutable 3D vector value type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Canonical forward direction in the viewer's local frame.
    pub const FORWARD: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: -1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared length of the vector.
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length (magnitude) of the vector.
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Dot product with another vector.
    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Normalized copy, or `None` if the length is effectively zero.
    ///
    /// Callers treat `None` as "no usable direction" rather than dividing
    /// through and propagating NaN.
    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        if len <= f64::EPSILON {
            None
        } else {
            Some(self / len)
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Vec3) -> f64 {
        (other - self).length()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;

    fn div(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

// ── Quat ────────────────────────────────────────────────────

/// Unit rotation quaternion (x, y, z, w).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Build a rotation of `angle_rad` radians around a unit `axis`.
    pub fn from_axis_angle(axis: Vec3, angle_rad: f64) -> Self {
        let half = angle_rad * 0.5;
        let s = half.sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Rotate a vector by this quaternion.
    ///
    /// Uses the expanded `v' = v + 2w(q×v) + 2(q×(q×v))` form so no
    /// intermediate quaternion multiplications are allocated.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = cross(qv, v);
        let uuv = cross(qv, uv);
        Vec3::new(
            v.x + 2.0 * (self.w * uv.x + uuv.x),
            v.y + 2.0 * (self.w * uv.y + uuv.y),
            v.z + 2.0 * (self.w * uv.z + uuv.z),
        )
    }
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

// ── Tests ───────────────────────────────────────────────────
