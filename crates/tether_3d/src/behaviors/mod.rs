//! Behaviors attached to scene nodes

mod ghost;

pub use ghost::{GhostBehavior, GhostPose, GhostState};
