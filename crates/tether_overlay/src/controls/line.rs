//! A straight line between two anchors

use crate::anchor::Anchor;
use crate::control::Control;
use std::cell::Cell;
use std::rc::Rc;
use tether_core::{AnchorConfig, Point, Rect};

#[derive(Debug)]
pub struct Line2D {
    control: Rc<Control>,
    start: Anchor,
    end: Anchor,
    thickness: Cell<f32>,
    endpoints: Cell<Option<(Point, Point)>>,
}

impl Line2D {
    pub fn new(config: &AnchorConfig) -> Self {
        Self::with_control(Rc::new(Control::new("line")), config)
    }

    pub fn with_control(control: Rc<Control>, config: &AnchorConfig) -> Self {
        Self {
            start: Anchor::new(control.clone(), config),
            end: Anchor::new(control.clone(), config),
            control,
            thickness: Cell::new(1.0),
            endpoints: Cell::new(None),
        }
    }

    pub fn control(&self) -> &Rc<Control> {
        &self.control
    }

    pub fn start(&self) -> &Anchor {
        &self.start
    }

    pub fn end(&self) -> &Anchor {
        &self.end
    }

    pub fn thickness(&self) -> f32 {
        self.thickness.get()
    }

    pub fn set_thickness(&self, thickness: f32) {
        if self.thickness.replace(thickness) != thickness {
            self.control.mark_as_dirty();
        }
    }

    /// Last measured endpoints
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        self.endpoints.get()
    }

    /// Both anchors linked and holding coordinates
    pub fn is_resolved(&self) -> bool {
        self.start.is_resolved() && self.end.is_resolved()
    }

    /// Recompute endpoints and frame from the anchors
    ///
    /// Returns false and keeps the previous measurement unless both anchors
    /// are resolved.
    pub fn measure(&self) -> bool {
        let (Some(a), Some(b)) = (resolved(&self.start), resolved(&self.end)) else {
            return false;
        };
        self.endpoints.set(Some((a, b)));
        let frame = Rect::from_points(a, b).inflate(self.thickness.get() / 2.0);
        self.control.set_frame(frame);
        true
    }

    pub fn length(&self) -> Option<f32> {
        self.endpoints.get().map(|(a, b)| a.distance(b))
    }
}

pub(crate) fn resolved(anchor: &Anchor) -> Option<Point> {
    if anchor.is_linked() {
        anchor.position()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_requires_both_anchors() {
        let line = Line2D::new(&AnchorConfig::default());
        line.start().update(0.0, 0.0);
        line.end().update(30.0, 40.0);

        // Coordinates alone are not enough without a link
        assert!(!line.measure());
        assert_eq!(line.endpoints(), None);
        assert_eq!(line.control().frame(), Rect::ZERO);
    }

    #[test]
    fn measure_uses_linked_anchors() {
        use crate::overlay::Overlay;
        use tether_3d::{HeadlessCamera, HeadlessNode, HeadlessScene, Object3D};
        use tether_core::{Mat4, Size};

        let scene = Rc::new(HeadlessScene::new(Size::new(800.0, 600.0)));
        scene.set_active_camera(Some(Rc::new(HeadlessCamera::new(Mat4::IDENTITY))));
        let overlay = Overlay::new(scene.clone());
        let line = Line2D::new(&AnchorConfig::default());
        overlay.add_control(line.control());

        let left = Rc::new(HeadlessNode::new("left").with_object(Object3D::at(-0.5, 0.0, 0.5)));
        let right = Rc::new(HeadlessNode::new("right").with_object(Object3D::at(0.5, 0.0, 0.5)));
        line.start().link_node(left).unwrap();
        assert!(!line.measure());

        line.end().link_node(right.clone()).unwrap();
        assert!(line.measure());
        assert_eq!(
            line.endpoints(),
            Some((Point::new(200.0, 300.0), Point::new(600.0, 300.0)))
        );
        assert_eq!(line.length(), Some(400.0));
        assert_eq!(line.control().frame(), Rect::new(199.5, 299.5, 401.0, 1.0));

        // Losing one anchor keeps the last good measurement
        line.end().unlink();
        assert!(!line.measure());
        assert_eq!(line.length(), Some(400.0));
    }
}
