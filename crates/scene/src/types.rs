use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; 3] {
        bytemuck::cast_ref(self)
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[must_use]
    pub fn distance(self, other: Vec3) -> f64 {
        (self - other).norm()
    }

    /// Distance in the horizontal (x, y) plane.
    #[must_use]
    pub fn planar_distance(self, other: Vec3) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Distance in the vertical (x, z) plane.
    #[must_use]
    pub fn xz_distance(self, other: Vec3) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// Component-wise product.
    #[must_use]
    pub fn scale(self, factors: Vec3) -> Self {
        Self::new(self.x * factors.x, self.y * factors.y, self.z * factors.z)
    }

    #[must_use]
    pub fn clamp(self, low: Vec3, high: Vec3) -> Self {
        Self::new(
            self.x.clamp(low.x, high.x),
            self.y.clamp(low.y, high.y),
            self.z.clamp(low.z, high.z),
        )
    }

    #[must_use]
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Unit quaternion, scalar first.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    /// Rotation of `angle` radians about the world z axis.
    #[must_use]
    pub fn from_yaw(angle: f64) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self { w: cos, x: 0.0, y: 0.0, z: sin }
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; 4] {
        bytemuck::cast_ref(self)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }
}
