//! Math utilities for scene-space transforms and projection

mod bounds;
mod extensions;
mod projection;
mod quat;

pub use bounds::{BoundingBox, BoundingInfo, BoundingSphere};
pub use extensions::Mat4Ext;
pub use projection::{depth_eligible, project};
pub use quat::Quat;

// Re-export common math types from tether_core
pub use tether_core::{Mat4, Vec3};
