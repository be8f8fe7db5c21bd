//! Overlay control state shared by every 2D element

use crate::overlay::OverlayHost;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tether_3d::SceneEngine;
use tether_core::{Enableable, Point, Rect, Result, TetherError};

/// A 2D element living in an overlay
///
/// Drawing is external; a control only carries what layout and anchoring
/// need: its frame, pixel offset, visibility, enabled and renderability
/// flags, and a dirty bit the renderer consumes.
pub struct Control {
    id: Option<String>,
    tag: String,
    offset: Cell<Point>,
    frame: Cell<Rect>,
    visible: Cell<bool>,
    enabled: Cell<bool>,
    not_renderable: Cell<bool>,
    dirty: Cell<bool>,
    host: RefCell<Option<Weak<dyn OverlayHost>>>,
}

impl Control {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: None,
            tag: tag.into(),
            offset: Cell::new(Point::ZERO),
            frame: Cell::new(Rect::ZERO),
            visible: Cell::new(true),
            enabled: Cell::new(true),
            not_renderable: Cell::new(false),
            dirty: Cell::new(true),
            host: RefCell::new(None),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Pixel offset added to anchored coordinates
    pub fn with_offset(self, offset: Point) -> Self {
        self.offset.set(offset);
        self
    }

    pub fn with_frame(self, frame: Rect) -> Self {
        self.frame.set(frame);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Id if set, tag otherwise
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.tag)
    }

    pub fn offset(&self) -> Point {
        self.offset.get()
    }

    pub fn set_offset(&self, offset: Point) {
        if self.offset.replace(offset) != offset {
            self.mark_as_dirty();
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame.get()
    }

    pub fn set_frame(&self, frame: Rect) {
        if self.frame.replace(frame) != frame {
            self.mark_as_dirty();
        }
    }

    pub fn center(&self) -> Point {
        self.frame.get().center()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) != visible {
            self.mark_as_dirty();
        }
    }

    /// Whether the renderer should draw this control
    pub fn is_renderable(&self) -> bool {
        self.visible.get() && !self.not_renderable.get()
    }

    pub fn is_not_renderable(&self) -> bool {
        self.not_renderable.get()
    }

    /// Force the control out of (or back into) rendering; returns true on change
    pub fn set_not_renderable(&self, not_renderable: bool) -> bool {
        let changed = self.not_renderable.replace(not_renderable) != not_renderable;
        if changed {
            self.mark_as_dirty();
        }
        changed
    }

    pub fn mark_as_dirty(&self) {
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Clear the dirty bit, returning its previous value
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn host(&self) -> Option<Rc<dyn OverlayHost>> {
        self.host.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn set_host(&self, host: Option<Weak<dyn OverlayHost>>) {
        *self.host.borrow_mut() = host;
    }

    /// Host overlay, or `UnresolvedHost` when the control is not attached
    pub fn resolve_host(&self) -> Result<Rc<dyn OverlayHost>> {
        self.host()
            .ok_or_else(|| TetherError::UnresolvedHost(self.label().to_string()))
    }

    /// Scene of the host overlay
    pub fn scene(&self) -> Result<Rc<dyn SceneEngine>> {
        Ok(self.resolve_host()?.scene())
    }
}

impl Enableable for Control {
    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        if self.enabled.replace(enabled) != enabled {
            self.mark_as_dirty();
        }
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("frame", &self.frame.get())
            .field("visible", &self.visible.get())
            .field("not_renderable", &self.not_renderable.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderability_combines_visibility_and_flag() {
        let control = Control::new("label");
        assert!(control.is_renderable());

        assert!(control.set_not_renderable(true));
        assert!(!control.set_not_renderable(true));
        assert!(!control.is_renderable());

        control.set_not_renderable(false);
        control.set_visible(false);
        assert!(!control.is_renderable());
    }

    #[test]
    fn dirty_bit_is_consumed() {
        let control = Control::new("label");
        assert!(control.take_dirty());
        assert!(!control.is_dirty());

        control.set_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(control.take_dirty());
        control.set_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!control.take_dirty());
    }

    #[test]
    fn detached_control_has_no_scene() {
        let control = Control::new("label").with_id("price");
        let err = control.scene().map(|_| ()).unwrap_err();
        assert!(matches!(err, TetherError::UnresolvedHost(ref name) if name == "price"));
    }
}
