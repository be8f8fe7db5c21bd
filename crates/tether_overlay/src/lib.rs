//! # Tether Overlay
//!
//! 2D controls pinned to 3D scene targets.
//!
//! An [`Overlay`] hosts [`Control`]s over one scene. Each anchored control
//! owns one or two [`Anchor`]s which, every before-render frame, project
//! their target into overlay pixels and flag the control dirty when it moved.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use tether_3d::{HeadlessCamera, HeadlessNode, HeadlessScene, Object3D};
//! use tether_core::{AnchorConfig, Mat4, Size};
//! use tether_overlay::{Marker, MarkerKind, Overlay};
//!
//! let scene = Rc::new(HeadlessScene::new(Size::new(800.0, 600.0)));
//! scene.set_active_camera(Some(Rc::new(HeadlessCamera::new(Mat4::IDENTITY))));
//! let overlay = Overlay::new(scene.clone());
//!
//! let node = Rc::new(HeadlessNode::new("beacon").with_object(Object3D::at(0.0, 0.0, 0.5)));
//! scene.add_node(&node, Some("beacon"), "node");
//!
//! let marker = Marker::new(
//!     MarkerKind::Label("Beacon".into()),
//!     Size::new(60.0, 20.0),
//!     &AnchorConfig::default(),
//! );
//! overlay.add_control(marker.control());
//! marker.anchor().link_node(node).unwrap();
//!
//! scene.render_frame();
//! let frame = marker.layout().unwrap();
//! assert_eq!((frame.x(), frame.y()), (370.0, 290.0));
//! ```

pub mod anchor;
pub mod control;
pub mod controls;
pub mod overlay;

pub use anchor::{Anchor, AnchorTarget};
pub use control::Control;
pub use controls::{
    BridgeLine, Callout, DimensionLabel, HalfSegment, Line2D, Marker, MarkerKind, PLACEHOLDER,
};
pub use overlay::{Overlay, OverlayHost};
