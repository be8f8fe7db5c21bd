//! Distance readout between two scene nodes

use crate::control::Control;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tether_3d::SceneNode;
use tether_core::{Registry, Result, Subscription};

/// Text shown until two targets are available
pub const PLACEHOLDER: &str = "...";

struct DimensionInner {
    control: Rc<Control>,
    targets: SmallVec<[Rc<dyn SceneNode>; 2]>,
    subscriptions: SmallVec<[Subscription; 2]>,
    text: String,
    distance: Option<f32>,
}

/// A label showing the world-space distance between its first two targets
///
/// The text refreshes whenever a target's world matrix is recomputed.
pub struct DimensionLabel {
    inner: Rc<RefCell<DimensionInner>>,
}

impl DimensionLabel {
    pub fn new() -> Self {
        Self::with_control(Rc::new(Control::new("dimension")))
    }

    pub fn with_control(control: Rc<Control>) -> Self {
        control.set_visible(false);
        Self {
            inner: Rc::new(RefCell::new(DimensionInner {
                control,
                targets: SmallVec::new(),
                subscriptions: SmallVec::new(),
                text: PLACEHOLDER.to_string(),
                distance: None,
            })),
        }
    }

    pub fn control(&self) -> Rc<Control> {
        self.inner.borrow().control.clone()
    }

    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    pub fn distance(&self) -> Option<f32> {
        self.inner.borrow().distance
    }

    pub fn target_count(&self) -> usize {
        self.inner.borrow().targets.len()
    }

    /// Replace the measured targets and recompute
    pub fn set_targets(&self, targets: Vec<Rc<dyn SceneNode>>) {
        let subscriptions: SmallVec<[Subscription; 2]> = targets
            .iter()
            .take(2)
            .map(|target| {
                let weak = Rc::downgrade(&self.inner);
                target
                    .on_world_matrix_updated()
                    .subscribe(Box::new(move |_| recompute(&weak)))
            })
            .collect();
        let stale = {
            let mut inner = self.inner.borrow_mut();
            inner.targets = targets.into_iter().collect();
            std::mem::replace(&mut inner.subscriptions, subscriptions)
        };
        drop(stale);
        tracing::debug!(targets = self.target_count(), "dimension targets set");
        recompute(&Rc::downgrade(&self.inner));
    }

    /// Resolve `selectors` against `registry` and measure what was found
    ///
    /// Selectors that match nothing count as missing targets. Unsupported
    /// selector syntax is an error and leaves the current targets untouched.
    pub fn set_selectors(
        &self,
        registry: &Registry<dyn SceneNode>,
        selectors: &[&str],
    ) -> Result<()> {
        let mut found = Vec::with_capacity(selectors.len());
        for selector in selectors {
            match registry.query(selector)? {
                Some(node) => found.push(node),
                None => tracing::debug!(selector, "dimension target not found"),
            }
        }
        self.set_targets(found);
        Ok(())
    }

    pub fn clear(&self) {
        self.set_targets(Vec::new());
    }
}

impl Default for DimensionLabel {
    fn default() -> Self {
        Self::new()
    }
}

fn recompute(inner: &Weak<RefCell<DimensionInner>>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.borrow_mut();

    let distance = match inner.targets.as_slice() {
        [a, b, ..] => Some(a.absolute_position().distance(b.absolute_position())),
        _ => None,
    };
    let text = match distance {
        Some(d) => format!("{d:.2}"),
        None => PLACEHOLDER.to_string(),
    };

    inner.distance = distance;
    inner.control.set_visible(distance.is_some());
    if inner.text != text {
        tracing::trace!(%text, "dimension updated");
        inner.text = text;
        inner.control.mark_as_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_3d::{HeadlessNode, HeadlessScene, Object3D, ProxyNode};
    use tether_core::{Size, Vec3};

    fn node(name: &str, x: f32, y: f32, z: f32) -> Rc<HeadlessNode> {
        Rc::new(HeadlessNode::new(name).with_object(Object3D::at(x, y, z)))
    }

    fn targets(nodes: &[&Rc<HeadlessNode>]) -> Vec<Rc<dyn SceneNode>> {
        nodes.iter().map(|n| Rc::clone(n) as Rc<dyn SceneNode>).collect()
    }

    #[test]
    fn two_targets_show_formatted_distance() {
        let label = DimensionLabel::new();
        let (a, b) = (node("a", 0.0, 0.0, 0.0), node("b", 3.0, 4.0, 0.0));
        label.set_targets(targets(&[&a, &b]));
        assert_eq!(label.text(), "5.00");
        assert!(label.control().is_visible());
    }

    #[test]
    fn fewer_than_two_targets_show_placeholder() {
        let label = DimensionLabel::new();
        assert_eq!(label.text(), PLACEHOLDER);
        assert!(!label.control().is_visible());

        label.set_targets(targets(&[&node("a", 0.0, 0.0, 0.0)]));
        assert_eq!(label.text(), PLACEHOLDER);
        assert!(!label.control().is_visible());
        assert_eq!(label.distance(), None);
    }

    #[test]
    fn world_matrix_updates_refresh_text() {
        let a = node("a", 0.0, 0.0, 0.0);
        let b = node("b", 1.0, 0.0, 0.0);
        let label = DimensionLabel::new();
        label.set_targets(targets(&[&a, &b]));
        assert_eq!(label.text(), "1.00");

        b.set_position(Vec3::new(0.0, 2.5, 0.0));
        assert_eq!(label.text(), "1.00");
        b.compute_world_matrix(false);
        assert_eq!(label.text(), "2.50");

        label.clear();
        assert_eq!(a.world_matrix_observers(), 0);
        assert_eq!(b.world_matrix_observers(), 0);
        assert_eq!(label.text(), PLACEHOLDER);
    }

    #[test]
    fn selectors_resolve_through_the_registry() {
        let scene = HeadlessScene::new(Size::new(800.0, 600.0));
        let a = node("a", 0.0, 0.0, 0.0);
        let b = node("b", 0.0, 0.0, 2.0);
        scene.add_node(&a, Some("start"), "node");
        scene.add_node(&b, Some("finish"), "node");

        let label = DimensionLabel::new();
        label.set_selectors(scene.nodes(), &["#start", "#finish"]).unwrap();
        assert_eq!(label.text(), "2.00");

        label.set_selectors(scene.nodes(), &["#start", "#missing"]).unwrap();
        assert_eq!(label.target_count(), 1);
        assert_eq!(label.text(), PLACEHOLDER);

        assert!(label.set_selectors(scene.nodes(), &["node > node"]).is_err());
        assert_eq!(label.target_count(), 1);
    }
}
