//! Callout: an anchored control tied to another overlay control by a leader

use crate::anchor::Anchor;
use crate::control::Control;
use std::cell::RefCell;
use std::rc::Rc;
use tether_core::{AnchorConfig, Point};

#[derive(Debug)]
pub struct Callout {
    control: Rc<Control>,
    anchor: Anchor,
    target: RefCell<Option<Rc<Control>>>,
}

impl Callout {
    pub fn new(config: &AnchorConfig) -> Self {
        let control = Rc::new(Control::new("callout"));
        control.set_visible(false);
        Self {
            anchor: Anchor::new(control.clone(), config),
            control,
            target: RefCell::new(None),
        }
    }

    pub fn control(&self) -> &Rc<Control> {
        &self.control
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn target(&self) -> Option<Rc<Control>> {
        self.target.borrow().clone()
    }

    pub fn set_target(&self, target: Option<Rc<Control>>) {
        *self.target.borrow_mut() = target;
        self.refresh();
    }

    /// Mirror the target's visibility; hidden without a target
    pub fn refresh(&self) {
        let visible = self.target.borrow().as_ref().is_some_and(|t| t.is_visible());
        self.control.set_visible(visible);
    }

    /// Segment from the target's center to the anchor point
    pub fn leader(&self) -> Option<(Point, Point)> {
        let target = self.target.borrow().clone()?;
        if !self.anchor.is_linked() {
            return None;
        }
        Some((target.center(), self.anchor.position()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Overlay;
    use tether_3d::{HeadlessCamera, HeadlessNode, HeadlessScene, Object3D};
    use tether_core::{Mat4, Rect, Size};

    #[test]
    fn visibility_follows_target() {
        let callout = Callout::new(&AnchorConfig::default());
        assert!(!callout.control().is_visible());

        let target = Rc::new(Control::new("panel"));
        callout.set_target(Some(target.clone()));
        assert!(callout.control().is_visible());

        target.set_visible(false);
        callout.refresh();
        assert!(!callout.control().is_visible());

        target.set_visible(true);
        callout.set_target(None);
        assert!(!callout.control().is_visible());
    }

    #[test]
    fn leader_runs_from_target_to_anchor() {
        let scene = Rc::new(HeadlessScene::new(Size::new(800.0, 600.0)));
        scene.set_active_camera(Some(Rc::new(HeadlessCamera::new(Mat4::IDENTITY))));
        let overlay = Overlay::new(scene.clone());

        let callout = Callout::new(&AnchorConfig::default());
        overlay.add_control(callout.control());
        let panel = Rc::new(Control::new("panel").with_frame(Rect::new(0.0, 0.0, 100.0, 50.0)));
        callout.set_target(Some(panel));
        assert_eq!(callout.leader(), None);

        let node = Rc::new(HeadlessNode::new("pin").with_object(Object3D::at(0.0, 0.0, 0.5)));
        callout.anchor().link_node(node).unwrap();
        assert_eq!(
            callout.leader(),
            Some((Point::new(50.0, 25.0), Point::new(400.0, 300.0)))
        );
    }
}
