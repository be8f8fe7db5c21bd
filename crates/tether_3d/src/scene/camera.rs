//! Camera projection parameters

use super::Object3D;
use crate::math::Mat4Ext;
use tether_core::Mat4;

/// Perspective projection with a vertical field of view
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Field of view in radians (vertical)
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
        }
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Projection matrix (depth 0 at `near`, 1 at `far`)
    pub fn projection_matrix(&self) -> Mat4 {
        <Mat4 as Mat4Ext>::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// View matrix from a camera transform
    pub fn view_matrix(&self, transform: &Object3D) -> Mat4 {
        let eye = transform.position;
        let target = eye + transform.forward();
        <Mat4 as Mat4Ext>::look_at_rh(eye, target, transform.up())
    }

    pub fn view_projection(&self, transform: &Object3D) -> Mat4 {
        self.projection_matrix().mul(&self.view_matrix(transform))
    }
}
