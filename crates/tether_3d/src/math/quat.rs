//! Quaternion for 3D rotations

use super::extensions::Mat4Ext;
use tether_animation::Approach;
use tether_core::{Mat4, Vec3};

/// Unit quaternion rotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create from Euler angles in radians, XYZ order
    pub fn from_euler(x: f32, y: f32, z: f32) -> Self {
        let (sx, cx) = (x * 0.5).sin_cos();
        let (sy, cy) = (y * 0.5).sin_cos();
        let (sz, cz) = (z * 0.5).sin_cos();

        Self {
            x: sx * cy * cz - cx * sy * sz,
            y: cx * sy * cz + sx * cy * sz,
            z: cx * cy * sz - sx * sy * cz,
            w: cx * cy * cz + sx * sy * sz,
        }
    }

    pub fn from_euler_vec(euler: Vec3) -> Self {
        Self::from_euler(euler.x, euler.y, euler.z)
    }

    /// Create from axis-angle representation
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let len = axis.length();
        if len < 1e-6 {
            return Self::IDENTITY;
        }

        let (s, c) = (angle * 0.5).sin_cos();
        let axis = axis * (1.0 / len);
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: c,
        }
    }

    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Normalize the quaternion; degenerate input becomes identity
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len < 1e-6 {
            return Self::IDENTITY;
        }
        let inv_len = 1.0 / len;
        Self {
            x: self.x * inv_len,
            y: self.y * inv_len,
            z: self.z * inv_len,
            w: self.w * inv_len,
        }
    }

    pub fn is_normalized(&self) -> bool {
        (self.length() - 1.0).abs() < 1e-4
    }

    /// Conjugate (inverse for unit quaternions)
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Hamilton product `self * other`
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        }
    }

    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let qv = Self::new(v.x, v.y, v.z, 0.0);
        let result = self.mul(&qv).mul(&self.conjugate());
        Vec3::new(result.x, result.y, result.z)
    }

    /// Rotation angle in radians from `self` to `other` along the shorter arc
    pub fn angle_to(&self, other: Self) -> f32 {
        let rel = self.conjugate().mul(&other);
        let v = Vec3::new(rel.x, rel.y, rel.z).length();
        2.0 * v.atan2(rel.w.abs())
    }

    /// Spherical linear interpolation along the shorter arc
    pub fn slerp(&self, other: Self, t: f32) -> Self {
        let mut cos_half_theta = self.dot(other);

        let mut b = other;
        if cos_half_theta < 0.0 {
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
            cos_half_theta = -cos_half_theta;
        }

        // Nearly parallel, fall back to normalized lerp
        if cos_half_theta > 0.9995 {
            return Self::new(
                self.x + t * (b.x - self.x),
                self.y + t * (b.y - self.y),
                self.z + t * (b.z - self.z),
                self.w + t * (b.w - self.w),
            )
            .normalize();
        }

        let half_theta = cos_half_theta.acos();
        let sin_half_theta = (1.0 - cos_half_theta * cos_half_theta).sqrt();

        let ratio_a = ((1.0 - t) * half_theta).sin() / sin_half_theta;
        let ratio_b = (t * half_theta).sin() / sin_half_theta;

        Self::new(
            self.x * ratio_a + b.x * ratio_b,
            self.y * ratio_a + b.y * ratio_b,
            self.z * ratio_a + b.z * ratio_b,
            self.w * ratio_a + b.w * ratio_b,
        )
        .normalize()
    }

    /// Convert to a 4x4 rotation matrix
    pub fn to_mat4(&self) -> Mat4 {
        let x2 = self.x + self.x;
        let y2 = self.y + self.y;
        let z2 = self.z + self.z;

        let xx = self.x * x2;
        let xy = self.x * y2;
        let xz = self.x * z2;
        let yy = self.y * y2;
        let yz = self.y * z2;
        let zz = self.z * z2;
        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        #[rustfmt::skip]
        let m = <Mat4 as Mat4Ext>::from_cols_array(&[
            1.0 - (yy + zz), xy + wz, xz - wy, 0.0,
            xy - wz, 1.0 - (xx + zz), yz + wx, 0.0,
            xz + wy, yz - wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        m
    }

    /// Extract the rotation of an affine matrix with positive scale
    pub fn from_mat4(m: &Mat4) -> Self {
        let c0 = Vec3::new(m.cols[0][0], m.cols[0][1], m.cols[0][2]).normalize();
        let c1 = Vec3::new(m.cols[1][0], m.cols[1][1], m.cols[1][2]).normalize();
        let c2 = Vec3::new(m.cols[2][0], m.cols[2][1], m.cols[2][2]).normalize();

        let trace = c0.x + c1.y + c2.z;
        let q = if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new((c1.z - c2.y) * s, (c2.x - c0.z) * s, (c0.y - c1.x) * s, 0.25 / s)
        } else if c0.x > c1.y && c0.x > c2.z {
            let s = 2.0 * (1.0 + c0.x - c1.y - c2.z).sqrt();
            Self::new(0.25 * s, (c1.x + c0.y) / s, (c2.x + c0.z) / s, (c1.z - c2.y) / s)
        } else if c1.y > c2.z {
            let s = 2.0 * (1.0 + c1.y - c0.x - c2.z).sqrt();
            Self::new((c1.x + c0.y) / s, 0.25 * s, (c2.y + c1.z) / s, (c2.x - c0.z) / s)
        } else {
            let s = 2.0 * (1.0 + c2.z - c0.x - c1.y).sqrt();
            Self::new((c2.x + c0.z) / s, (c2.y + c1.z) / s, 0.25 * s, (c0.y - c1.x) / s)
        };
        q.normalize()
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Quat::mul(&self, &rhs)
    }
}

/// Slerp by `ratio`; the step magnitude is the angle covered
impl Approach for Quat {
    fn approach(&self, goal: &Self, ratio: f32) -> (Self, f32) {
        let next = self.slerp(*goal, ratio);
        (next, self.angle_to(*goal) * ratio)
    }
}
