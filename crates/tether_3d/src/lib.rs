//! # Tether 3D
//!
//! The scene side of tether.
//!
//! This crate provides:
//! - **Scene engine interfaces** that anchors and behaviors depend on
//! - **Projection math** from world space to viewport pixels and depth
//! - **A headless backend** that runs the frame loop without a GPU
//! - **`GhostBehavior`**, which drags a proxy node after a target mesh
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use tether_3d::prelude::*;
//!
//! let scene = Rc::new(HeadlessScene::new(Size::new(800.0, 600.0)));
//! let target = Rc::new(HeadlessNode::mesh(
//!     "crate",
//!     BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
//! ));
//! let proxy = Rc::new(HeadlessNode::new("ghost"));
//! scene.add_node(&target, Some("crate"), "mesh");
//!
//! let ghost = GhostBehavior::new(scene.clone(), &GhostConfig::default()).unwrap();
//! ghost.attach(proxy.clone(), Some(target.clone())).unwrap();
//!
//! target.set_position(Vec3::new(4.0, 0.0, 0.0));
//! scene.render_frame();
//! assert!(ghost.is_converging());
//! ```

// Math utilities
pub mod math;

// Scene engine interfaces and headless backend
pub mod scene;

// Behaviors
pub mod behaviors;

// Prelude for common imports
pub mod prelude;

pub use behaviors::{GhostBehavior, GhostPose, GhostState};
pub use math::{BoundingBox, BoundingInfo, BoundingSphere, Quat};
pub use scene::{
    Camera, FrameInfo, HeadlessCamera, HeadlessNode, HeadlessScene, Object3D, PerspectiveCamera,
    ProxyNode, SceneEngine, SceneMesh, SceneNode,
};
