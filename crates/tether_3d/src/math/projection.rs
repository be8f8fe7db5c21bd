//! World-to-viewport projection

use tether_core::{Mat4, Rect, Vec3};

/// Project a world-space point onto a pixel viewport
///
/// Returns `(x, y)` in pixels (y down, origin at the top-left of the render
/// target) and `z` as normalized depth. A point in front of the camera and
/// inside the frustum depth range has `0 < z < 1`. Points on the camera plane
/// project with non-finite depth.
pub fn project(point: Vec3, view_projection: &Mat4, viewport: Rect) -> Vec3 {
    let [cx, cy, cz, w] = view_projection.transform_homogeneous(point);
    let inv_w = 1.0 / w;
    let (nx, ny, nz) = (cx * inv_w, cy * inv_w, cz * inv_w);

    Vec3::new(
        viewport.x() + (nx + 1.0) * 0.5 * viewport.width(),
        viewport.y() + (1.0 - ny) * 0.5 * viewport.height(),
        nz,
    )
}

/// A projected target counts only when enabled and strictly inside the depth range
pub fn depth_eligible(enabled: bool, depth: f32) -> bool {
    enabled && depth > 0.0 && depth < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4Ext;

    #[test]
    fn identity_projection_maps_ndc_to_pixels() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let p = project(Vec3::new(0.0, 0.0, 0.5), &Mat4::IDENTITY, viewport);
        assert_eq!(p, Vec3::new(400.0, 300.0, 0.5));

        let corner = project(Vec3::new(-1.0, 1.0, 0.5), &Mat4::IDENTITY, viewport);
        assert_eq!((corner.x, corner.y), (0.0, 0.0));
    }

    #[test]
    fn viewport_offset_is_applied() {
        let viewport = Rect::new(100.0, 50.0, 200.0, 100.0);
        let p = project(Vec3::ZERO, &Mat4::IDENTITY, viewport);
        assert_eq!((p.x, p.y), (200.0, 100.0));
    }

    #[test]
    fn depth_bounds_are_exclusive() {
        assert!(!depth_eligible(true, 0.0));
        assert!(!depth_eligible(true, 1.0));
        assert!(depth_eligible(true, 0.5));
        assert!(!depth_eligible(false, 0.5));
        assert!(!depth_eligible(true, f32::NAN));
    }

    #[test]
    fn points_behind_the_camera_are_out_of_range() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::UP);
        let vp = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0).mul(&view);
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        let front = project(Vec3::ZERO, &vp, viewport);
        assert!(depth_eligible(true, front.z));
        assert!((front.x - 50.0).abs() < 1e-3 && (front.y - 50.0).abs() < 1e-3);

        let behind = project(Vec3::new(0.0, 0.0, 10.0), &vp, viewport);
        assert!(!depth_eligible(true, behind.z));
    }
}
