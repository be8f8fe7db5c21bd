//! Local transform of a scene node

use crate::math::{Mat4Ext, Quat};
use tether_core::{Mat4, Vec3};

/// Position, rotation and scale of a node plus its visibility flag
///
/// Rotation is held either as Euler angles or, once set, as a quaternion.
/// When a quaternion is present it wins and the Euler angles are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Object3D {
    pub position: Vec3,
    /// Euler rotation in radians (XYZ)
    pub rotation: Vec3,
    pub rotation_quaternion: Option<Quat>,
    pub scaling: Vec3,
    pub visible: bool,
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            rotation_quaternion: None,
            scaling: Vec3::ONE,
            visible: true,
        }
    }
}

impl Object3D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with position
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Set rotation from Euler angles (radians)
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn with_quaternion(mut self, q: Quat) -> Self {
        self.rotation_quaternion = Some(q);
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scaling = Vec3::new(x, y, z);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Effective rotation
    pub fn orientation(&self) -> Quat {
        self.rotation_quaternion
            .unwrap_or_else(|| Quat::from_euler_vec(self.rotation))
    }

    /// Compute local transformation matrix
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_trs(self.position, self.orientation(), self.scaling)
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.orientation().rotate_vec3(Vec3::new(0.0, 0.0, -1.0))
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.orientation().rotate_vec3(Vec3::UP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn quaternion_overrides_euler() {
        let obj = Object3D::new()
            .with_rotation(0.0, FRAC_PI_2, 0.0)
            .with_quaternion(Quat::IDENTITY);
        assert_eq!(obj.orientation(), Quat::IDENTITY);
        assert_eq!(obj.local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn default_looks_down_negative_z() {
        let obj = Object3D::at(1.0, 2.0, 3.0);
        assert_eq!(obj.forward(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(obj.local_matrix().get_translation(), Vec3::new(1.0, 2.0, 3.0));
    }
}
