//! Scene engine interfaces
//!
//! The rendering engine is opaque to tether. Anchors and behaviors only see
//! these traits: nodes with world transforms and hooks, meshes with world
//! bounds, a camera, and a before-render hook. [`super::HeadlessScene`] is an
//! in-process implementation.

use crate::math::{project, BoundingInfo, Quat};
use std::rc::Rc;
use tether_core::{Enableable, Mat4, Rect, Size, Subscribable, Vec3};

/// Passed to before-render observers
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInfo {
    /// Frame counter, starting at 1 for the first rendered frame
    pub index: u64,
    /// Simulated time since the previous frame
    pub delta_ms: f32,
}

/// A transform node in the scene graph
pub trait SceneNode: Enableable {
    fn name(&self) -> &str;

    /// Last computed world matrix
    fn world_matrix(&self) -> Mat4;

    fn absolute_position(&self) -> Vec3 {
        self.world_matrix().get_translation()
    }

    fn absolute_rotation(&self) -> Quat {
        Quat::from_mat4(&self.world_matrix())
    }

    fn is_visible(&self) -> bool;

    /// Fired with the new world matrix each time it is recomputed
    fn on_world_matrix_updated(&self) -> &dyn Subscribable<Mat4>;

    /// Fired with the new flag when the enabled state changes
    fn on_enabled_changed(&self) -> &dyn Subscribable<bool>;
}

/// A node with renderable geometry
pub trait SceneMesh: SceneNode {
    /// World-space bounds as of the last world matrix computation
    fn bounding_info(&self) -> BoundingInfo;
}

/// A node whose transform is written from outside
pub trait ProxyNode: SceneNode {
    fn scaling(&self) -> Vec3;
    /// Euler rotation (radians), used when no quaternion is set
    fn rotation(&self) -> Vec3;
    fn rotation_quaternion(&self) -> Option<Quat>;

    fn set_absolute_position(&self, position: Vec3);
    fn set_scaling(&self, scaling: Vec3);
    fn set_rotation_quaternion(&self, rotation: Quat);
    fn set_visible(&self, visible: bool);

    /// Recompute the world matrix; `force` recomputes even when nothing changed
    fn compute_world_matrix(&self, force: bool) -> Mat4;
}

/// The active view into the scene
pub trait Camera {
    fn view_projection(&self) -> Mat4;

    /// Viewport as fractions (0..1) of the render target
    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// The rendering engine as seen by anchors and behaviors
pub trait SceneEngine {
    /// Fired once per rendered frame, after world matrices are updated
    fn before_render(&self) -> &dyn Subscribable<FrameInfo>;

    fn active_camera(&self) -> Option<Rc<dyn Camera>>;

    /// Render target size in pixels
    fn render_size(&self) -> Size;

    /// Project a world point through the active camera
    ///
    /// Returns render-target pixels plus normalized depth, or `None` when no
    /// camera is active.
    fn project_point(&self, point: Vec3) -> Option<Vec3> {
        let camera = self.active_camera()?;
        let viewport = camera.viewport().to_global(self.render_size());
        Some(project(point, &camera.view_projection(), viewport))
    }
}
