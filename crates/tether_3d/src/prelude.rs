//! Common imports for working with tether scenes

pub use crate::behaviors::{GhostBehavior, GhostPose, GhostState};
pub use crate::math::{depth_eligible, project, BoundingBox, BoundingInfo, BoundingSphere, Mat4Ext, Quat};
pub use crate::scene::{
    Camera, FrameInfo, HeadlessCamera, HeadlessNode, HeadlessScene, Object3D, PerspectiveCamera,
    ProxyNode, SceneEngine, SceneMesh, SceneNode,
};
pub use tether_core::{Enableable, GhostConfig, Mat4, Rect, Size, Subscribable, Vec3};
