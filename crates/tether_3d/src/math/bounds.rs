//! Bounding volumes in local and world space

use super::extensions::Mat4Ext;
use tether_core::{Mat4, Vec3};

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Create an empty bounding box
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis (width, height, depth)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Get the 8 corner vertices
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Axis-aligned box enclosing this box after `matrix` is applied
    pub fn transformed(&self, matrix: &Mat4) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let mut out = BoundingBox::empty();
        for corner in self.corners() {
            out.expand_to_include(matrix.transform_point(corner));
        }
        out
    }
}

/// Bounding sphere
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Smallest sphere centered on the box that contains it
    pub fn from_box(bbox: &BoundingBox) -> Self {
        Self {
            center: bbox.center(),
            radius: bbox.half_extents().length(),
        }
    }
}

/// World-space bounds of a mesh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingInfo {
    pub bounding_box: BoundingBox,
    pub bounding_sphere: BoundingSphere,
}

impl BoundingInfo {
    /// Bounds of `local` placed by `world`
    pub fn from_local(local: &BoundingBox, world: &Mat4) -> Self {
        let bounding_box = local.transformed(world);
        Self {
            bounding_box,
            bounding_sphere: BoundingSphere::from_box(&bounding_box),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quat;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn center_and_size() {
        let b = BoundingBox::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 2.0, 4.0));
        assert_eq!(b.center(), Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(b.size(), Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn transformed_box_follows_translation_and_scale() {
        let local = BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let world = Mat4::from_trs(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY, Vec3::new(2.0, 1.0, 4.0));
        let info = BoundingInfo::from_local(&local, &world);
        assert_eq!(info.bounding_box.center(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(info.bounding_box.size(), Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(info.bounding_sphere.center, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn rotated_box_swaps_extents() {
        let local = BoundingBox::new(Vec3::new(-2.0, -0.5, -0.5), Vec3::new(2.0, 0.5, 0.5));
        let world = Mat4::from_trs(Vec3::ZERO, Quat::from_axis_angle(Vec3::UP, FRAC_PI_2), Vec3::ONE);
        let size = local.transformed(&world).size();
        assert!((size.x - 1.0).abs() < 1e-5);
        assert!((size.z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn empty_box_stays_empty() {
        assert!(BoundingBox::empty().transformed(&Mat4::IDENTITY).is_empty());
    }
}
