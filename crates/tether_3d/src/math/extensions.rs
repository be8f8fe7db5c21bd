//! Transform and camera matrix constructors for `Mat4`

use super::Quat;
use tether_core::{Mat4, Vec3};

/// Extension trait for Mat4
pub trait Mat4Ext {
    fn from_translation(v: Vec3) -> Mat4;
    fn from_scale(v: Vec3) -> Mat4;
    /// Create from column-major array
    fn from_cols_array(arr: &[f32; 16]) -> Mat4;
    /// Compose translation, rotation and scale (`T * R * S`)
    fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4;
    /// Transform a point (affine, no perspective divide)
    fn transform_point(&self, p: Vec3) -> Vec3;
    /// Length of each basis column
    fn scale_factors(&self) -> Vec3;
    /// Create a perspective projection matrix (right-handed, depth 0 to 1)
    fn perspective_rh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;
    /// Create a look-at view matrix (right-handed)
    fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn from_translation(v: Vec3) -> Mat4 {
        Mat4::translation(v.x, v.y, v.z)
    }

    fn from_scale(v: Vec3) -> Mat4 {
        Mat4::scale(v.x, v.y, v.z)
    }

    fn from_cols_array(arr: &[f32; 16]) -> Mat4 {
        Mat4 {
            cols: [
                [arr[0], arr[1], arr[2], arr[3]],
                [arr[4], arr[5], arr[6], arr[7]],
                [arr[8], arr[9], arr[10], arr[11]],
                [arr[12], arr[13], arr[14], arr[15]],
            ],
        }
    }

    fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
        Mat4::from_translation(translation)
            .mul(&rotation.to_mat4())
            .mul(&Mat4::from_scale(scale))
    }

    fn transform_point(&self, p: Vec3) -> Vec3 {
        let [x, y, z, _] = self.transform_homogeneous(p);
        Vec3::new(x, y, z)
    }

    fn scale_factors(&self) -> Vec3 {
        let col_len = |c: [f32; 4]| Vec3::new(c[0], c[1], c[2]).length();
        Vec3::new(
            col_len(self.cols[0]),
            col_len(self.cols[1]),
            col_len(self.cols[2]),
        )
    }

    fn perspective_rh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let h = 1.0 / (fov_y * 0.5).tan();
        let w = h / aspect;
        let r = far / (near - far);

        Mat4 {
            cols: [
                [w, 0.0, 0.0, 0.0],
                [0.0, h, 0.0, 0.0],
                [0.0, 0.0, r, -1.0],
                [0.0, 0.0, near * r, 0.0],
            ],
        }
    }

    fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let f = (target - eye).normalize();
        let s = f.cross(up);
        let s = if s.length() > 0.0 {
            s.normalize()
        } else {
            Vec3::new(1.0, 0.0, 0.0)
        };
        let u = s.cross(f);

        Mat4 {
            cols: [
                [s.x, u.x, -f.x, 0.0],
                [s.y, u.y, -f.y, 0.0],
                [s.z, u.z, -f.z, 0.0],
                [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
            ],
        }
    }
}
