//! Tether Core
//!
//! Foundational pieces shared by the tether crates:
//!
//! - **Geometry**: overlay-space points and rects, scene-space vectors and matrices
//! - **Observers**: hook lists with RAII [`Subscription`] handles
//! - **Selectors**: `#id` and tag lookup over registered elements
//! - **Configuration**: TOML-backed settings for anchors and ghost behaviors
//!
//! # Example
//!
//! ```rust
//! use tether_core::{Registry, TetherConfig};
//! use std::rc::Rc;
//!
//! let config = TetherConfig::from_toml_str("[ghost]\nauto_hide = true\n").unwrap();
//! assert!(config.ghost.auto_hide);
//!
//! let registry = Registry::<str>::new();
//! registry.register(Some("pump"), "mesh", Rc::from("pump-01"));
//! assert_eq!(registry.query("#pump").unwrap().as_deref(), Some("pump-01"));
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod geometry;
pub mod observable;
pub mod query;

pub use capability::Enableable;
pub use config::{AnchorConfig, GhostConfig, TetherConfig};
pub use error::{Result, TetherError};
pub use geometry::{Mat4, Point, Rect, Size, Vec3};
pub use observable::{Observable, ObserverId, Subscribable, Subscription};
pub use query::{Registry, Selector};
