//! Single-anchor markers: a text label or a spot pinned to a target

use crate::anchor::Anchor;
use crate::control::Control;
use std::cell::Cell;
use std::rc::Rc;
use tether_core::{AnchorConfig, Rect, Size};

#[derive(Clone, Debug, PartialEq)]
pub enum MarkerKind {
    Label(String),
    Spot,
}

impl MarkerKind {
    fn tag(&self) -> &'static str {
        match self {
            MarkerKind::Label(_) => "label",
            MarkerKind::Spot => "spot",
        }
    }
}

/// A control centered on its anchor point
#[derive(Debug)]
pub struct Marker {
    control: Rc<Control>,
    anchor: Anchor,
    kind: MarkerKind,
    size: Cell<Size>,
}

impl Marker {
    pub fn new(kind: MarkerKind, size: Size, config: &AnchorConfig) -> Self {
        Self::with_control(Rc::new(Control::new(kind.tag())), kind, size, config)
    }

    /// Wrap an existing control, e.g. one carrying an id
    pub fn with_control(
        control: Rc<Control>,
        kind: MarkerKind,
        size: Size,
        config: &AnchorConfig,
    ) -> Self {
        let anchor = Anchor::new(control.clone(), config);
        Self {
            control,
            anchor,
            kind,
            size: Cell::new(size),
        }
    }

    pub fn control(&self) -> &Rc<Control> {
        &self.control
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            MarkerKind::Label(text) => Some(text),
            MarkerKind::Spot => None,
        }
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn set_size(&self, size: Size) {
        if self.size.replace(size) != size {
            self.control.mark_as_dirty();
        }
    }

    /// Center the frame on the anchor; `None` (frame untouched) while unresolved
    pub fn layout(&self) -> Option<Rect> {
        let center = self.anchor.position()?;
        let frame = Rect::from_center(center, self.size.get());
        self.control.set_frame(frame);
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Overlay;
    use tether_3d::{HeadlessCamera, HeadlessNode, HeadlessScene, Object3D};
    use tether_core::{Mat4, Point};

    #[test]
    fn layout_centers_on_anchor() {
        let scene = Rc::new(HeadlessScene::new(Size::new(800.0, 600.0)));
        scene.set_active_camera(Some(Rc::new(HeadlessCamera::new(Mat4::IDENTITY))));
        let overlay = Overlay::new(scene.clone());

        let marker = Marker::new(
            MarkerKind::Label("Engine".into()),
            Size::new(40.0, 20.0),
            &AnchorConfig::default(),
        );
        overlay.add_control(marker.control());
        assert_eq!(marker.layout(), None);
        assert_eq!(marker.control().frame(), Rect::ZERO);

        let node = Rc::new(HeadlessNode::new("engine").with_object(Object3D::at(0.0, 0.0, 0.5)));
        marker.anchor().link_node(node).unwrap();
        assert_eq!(marker.layout(), Some(Rect::new(380.0, 290.0, 40.0, 20.0)));
        assert_eq!(marker.control().center(), Point::new(400.0, 300.0));
        assert_eq!(marker.text(), Some("Engine"));
    }

    #[test]
    fn unresolved_keeps_prior_frame() {
        let marker = Marker::new(MarkerKind::Spot, Size::new(8.0, 8.0), &AnchorConfig::default());
        marker.control().set_frame(Rect::new(1.0, 2.0, 8.0, 8.0));
        assert!(marker.layout().is_none());
        assert_eq!(marker.control().frame(), Rect::new(1.0, 2.0, 8.0, 8.0));
        assert_eq!(marker.control().tag(), "spot");
    }
}
