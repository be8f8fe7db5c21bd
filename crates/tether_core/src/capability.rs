//! Capabilities shared by scene nodes and overlay controls

/// Anything with an enabled flag
///
/// Implemented by scene nodes (which also notify on change) and by overlay
/// controls, so eligibility checks can treat both the same way.
pub trait Enableable {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}
