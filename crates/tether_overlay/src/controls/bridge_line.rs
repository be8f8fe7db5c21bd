//! A line drawn as two halves meeting at the midpoint of its anchors
//!
//! Each half is expressed in a coordinate frame translated to its anchor, so
//! a gradient stroked from the midpoint outward starts at the same color on
//! both sides.

use super::line::resolved;
use crate::anchor::Anchor;
use crate::control::Control;
use std::cell::Cell;
use std::rc::Rc;
use tether_core::{AnchorConfig, Point, Rect};

/// One half of a bridge line, relative to `origin`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfSegment {
    /// Anchor point the draw origin is translated to
    pub origin: Point,
    /// Midpoint, relative to `origin`
    pub start: Point,
    /// Always the origin itself
    pub end: Point,
}

impl HalfSegment {
    fn toward(origin: Point, midpoint: Point) -> Self {
        Self {
            origin,
            start: midpoint - origin,
            end: Point::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct BridgeLine {
    control: Rc<Control>,
    first: Anchor,
    second: Anchor,
    halves: Cell<Option<[HalfSegment; 2]>>,
}

impl BridgeLine {
    pub fn new(config: &AnchorConfig) -> Self {
        let control = Rc::new(Control::new("bridge"));
        Self {
            first: Anchor::new(control.clone(), config),
            second: Anchor::new(control.clone(), config),
            control,
            halves: Cell::new(None),
        }
    }

    pub fn control(&self) -> &Rc<Control> {
        &self.control
    }

    pub fn first(&self) -> &Anchor {
        &self.first
    }

    pub fn second(&self) -> &Anchor {
        &self.second
    }

    pub fn midpoint(&self) -> Option<Point> {
        Some(Point::midpoint(resolved(&self.first)?, resolved(&self.second)?))
    }

    pub fn halves(&self) -> Option<[HalfSegment; 2]> {
        self.halves.get()
    }

    /// Same contract as [`super::Line2D::measure`]
    pub fn measure(&self) -> bool {
        let (Some(a), Some(b)) = (resolved(&self.first), resolved(&self.second)) else {
            return false;
        };
        let mid = Point::midpoint(a, b);
        self.halves
            .set(Some([HalfSegment::toward(a, mid), HalfSegment::toward(b, mid)]));
        self.control.set_frame(Rect::from_points(a, b));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Overlay;
    use tether_3d::{HeadlessCamera, HeadlessNode, HeadlessScene, Object3D};
    use tether_core::{Mat4, Size};

    #[test]
    fn halves_meet_at_midpoint() {
        let scene = Rc::new(HeadlessScene::new(Size::new(800.0, 600.0)));
        scene.set_active_camera(Some(Rc::new(HeadlessCamera::new(Mat4::IDENTITY))));
        let overlay = Overlay::new(scene.clone());
        let bridge = BridgeLine::new(&AnchorConfig::default());
        overlay.add_control(bridge.control());
        assert!(!bridge.measure());
        assert_eq!(bridge.midpoint(), None);

        let a = Rc::new(HeadlessNode::new("a").with_object(Object3D::at(-0.5, 0.5, 0.5)));
        let b = Rc::new(HeadlessNode::new("b").with_object(Object3D::at(0.5, -0.5, 0.5)));
        bridge.first().link_node(a).unwrap();
        bridge.second().link_node(b).unwrap();

        assert!(bridge.measure());
        assert_eq!(bridge.midpoint(), Some(Point::new(400.0, 300.0)));

        let [left, right] = bridge.halves().unwrap();
        assert_eq!(left.origin, Point::new(200.0, 150.0));
        assert_eq!(left.start, Point::new(200.0, 150.0));
        assert_eq!(right.origin, Point::new(600.0, 450.0));
        assert_eq!(right.start, Point::new(-200.0, -150.0));
        assert_eq!(left.end, Point::ZERO);
        assert_eq!(bridge.control().frame(), Rect::new(200.0, 150.0, 400.0, 300.0));
    }
}
