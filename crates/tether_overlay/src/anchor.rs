//! Anchors: overlay coordinates that follow a scene target
//!
//! An [`Anchor`] belongs to one owner [`Control`]. Once linked it recomputes
//! on every before-render frame of the owner's scene:
//!
//! - a node projects its world origin through the active camera
//! - a mesh projects its world bounding-sphere center
//! - a control reports its own center, already in overlay pixels
//!
//! A projected target is eligible only while enabled and strictly inside the
//! depth range (`0 < z < 1`); with no active camera nothing is eligible. An
//! ineligible target makes the owner not renderable. Coordinates only move
//! when they change by more than the hysteresis threshold on either axis,
//! and only then is the owner marked dirty.

use crate::control::Control;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tether_3d::math::depth_eligible;
use tether_3d::{SceneEngine, SceneMesh, SceneNode};
use tether_core::{AnchorConfig, Enableable, Point, Result, Subscription, Vec3};

/// What an anchor follows
#[derive(Clone)]
pub enum AnchorTarget {
    Node(Rc<dyn SceneNode>),
    Mesh(Rc<dyn SceneMesh>),
    Control(Rc<Control>),
}

impl AnchorTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            AnchorTarget::Node(_) => "node",
            AnchorTarget::Mesh(_) => "mesh",
            AnchorTarget::Control(_) => "control",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AnchorTarget::Node(node) => node.name(),
            AnchorTarget::Mesh(mesh) => mesh.name(),
            AnchorTarget::Control(control) => control.label(),
        }
    }
}

impl fmt::Debug for AnchorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnchorTarget::{}({:?})", self.kind(), self.name())
    }
}

struct AnchorInner {
    owner: Rc<Control>,
    target: Option<AnchorTarget>,
    position: Option<Point>,
    hysteresis: f32,
    frame_observer: Option<Subscription>,
    enabled_observer: Option<Subscription>,
}

/// Tracks a target's position in the owner's overlay space
pub struct Anchor {
    inner: Rc<RefCell<AnchorInner>>,
}

impl Anchor {
    pub fn new(owner: Rc<Control>, config: &AnchorConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AnchorInner {
                owner,
                target: None,
                position: None,
                hysteresis: config.hysteresis_px,
                frame_observer: None,
                enabled_observer: None,
            })),
        }
    }

    pub fn link_node(&self, node: Rc<dyn SceneNode>) -> Result<()> {
        self.link(AnchorTarget::Node(node))
    }

    pub fn link_mesh(&self, mesh: Rc<dyn SceneMesh>) -> Result<()> {
        self.link(AnchorTarget::Mesh(mesh))
    }

    pub fn link_control(&self, control: Rc<Control>) -> Result<()> {
        self.link(AnchorTarget::Control(control))
    }

    /// Start tracking `target`, replacing any previous link
    ///
    /// Fails with `UnresolvedHost` when the owner is not in an overlay. The
    /// position is computed once before returning.
    pub fn link(&self, target: AnchorTarget) -> Result<()> {
        let scene = self.owner().scene()?;
        self.unlink();
        self.toggle_owner(false);

        let weak = Rc::downgrade(&self.inner);
        let frame_observer = scene
            .before_render()
            .subscribe(Box::new(move |_| recompute(&weak)));

        let weak = Rc::downgrade(&self.inner);
        let enabled_observer = match &target {
            AnchorTarget::Node(node) => Some(
                node.on_enabled_changed()
                    .subscribe(Box::new(move |_| recompute(&weak))),
            ),
            AnchorTarget::Mesh(mesh) => Some(
                mesh.on_enabled_changed()
                    .subscribe(Box::new(move |_| recompute(&weak))),
            ),
            AnchorTarget::Control(_) => None,
        };

        tracing::debug!(
            owner = self.owner().label(),
            kind = target.kind(),
            linked = target.name(),
            "anchor linked"
        );
        {
            let mut inner = self.inner.borrow_mut();
            inner.target = Some(target);
            inner.frame_observer = Some(frame_observer);
            inner.enabled_observer = enabled_observer;
        }

        recompute(&Rc::downgrade(&self.inner));
        Ok(())
    }

    /// Stop tracking; coordinates reset and the owner's renderability reverts
    ///
    /// Returns false if the anchor was not linked.
    pub fn unlink(&self) -> bool {
        let (owner, observers) = {
            let mut inner = self.inner.borrow_mut();
            if inner.target.take().is_none() {
                return false;
            }
            inner.position = None;
            let observers = [inner.frame_observer.take(), inner.enabled_observer.take()];
            (inner.owner.clone(), observers)
        };
        drop(observers);
        owner.set_not_renderable(false);
        tracing::debug!(owner = owner.label(), "anchor unlinked");
        true
    }

    /// Store new coordinates if they moved past the threshold
    ///
    /// `x`, `y` are overlay pixels before the owner's offset. Returns true
    /// (and marks the owner dirty) when the stored coordinates changed.
    pub fn update(&self, x: f32, y: f32) -> bool {
        let mut inner = self.inner.borrow_mut();
        let offset = inner.owner.offset();
        let next = Point::new(x + offset.x, y + offset.y);

        let moved = match inner.position {
            None => true,
            Some(prev) => {
                (next.x - prev.x).abs() > inner.hysteresis
                    || (next.y - prev.y).abs() > inner.hysteresis
            }
        };
        if moved {
            inner.position = Some(next);
            inner.owner.mark_as_dirty();
            tracing::trace!(owner = inner.owner.label(), x = next.x, y = next.y, "anchor moved");
        }
        moved
    }

    /// Set the owner's renderability; the owner is only touched on change
    pub fn toggle_owner(&self, renderable: bool) {
        let owner = self.owner();
        if owner.set_not_renderable(!renderable) {
            tracing::trace!(owner = owner.label(), renderable, "anchor owner toggled");
        }
    }

    pub fn owner(&self) -> Rc<Control> {
        self.inner.borrow().owner.clone()
    }

    pub fn target(&self) -> Option<AnchorTarget> {
        self.inner.borrow().target.clone()
    }

    pub fn is_linked(&self) -> bool {
        self.inner.borrow().target.is_some()
    }

    /// Resolved overlay coordinates including the owner offset
    pub fn position(&self) -> Option<Point> {
        self.inner.borrow().position
    }

    pub fn x(&self) -> Option<f32> {
        self.position().map(|p| p.x)
    }

    pub fn y(&self) -> Option<f32> {
        self.position().map(|p| p.y)
    }

    /// Linked and holding coordinates
    pub fn is_resolved(&self) -> bool {
        let inner = self.inner.borrow();
        inner.target.is_some() && inner.position.is_some()
    }

    /// Recompute immediately instead of waiting for the next frame
    pub fn refresh(&self) {
        recompute(&Rc::downgrade(&self.inner));
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Anchor")
            .field("owner", &inner.owner.label())
            .field("target", &inner.target)
            .field("position", &inner.position)
            .finish()
    }
}

/// Project `point` and accept it only when eligible
fn project_eligible(scene: &dyn SceneEngine, point: Vec3, enabled: bool) -> Option<Point> {
    let projected = scene.project_point(point)?;
    depth_eligible(enabled, projected.z).then(|| Point::new(projected.x, projected.y))
}

fn recompute(inner: &Weak<RefCell<AnchorInner>>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let anchor = Anchor { inner };

    let Some(target) = anchor.target() else {
        return;
    };
    let owner = anchor.owner();
    let host = match owner.resolve_host() {
        Ok(host) => host,
        Err(err) => {
            tracing::trace!(%err, "anchor skipped");
            anchor.toggle_owner(false);
            return;
        }
    };

    let scene = host.scene();
    let resolved = match &target {
        AnchorTarget::Node(node) => {
            project_eligible(&*scene, node.absolute_position(), node.is_enabled())
                .map(|p| host.to_overlay(p))
        }
        AnchorTarget::Mesh(mesh) => {
            let center = mesh.bounding_info().bounding_sphere.center;
            project_eligible(&*scene, center, mesh.is_enabled()).map(|p| host.to_overlay(p))
        }
        AnchorTarget::Control(control) => {
            (control.is_visible() && control.is_enabled()).then(|| control.center())
        }
    };

    match resolved {
        Some(point) => {
            anchor.update(point.x, point.y);
            anchor.toggle_owner(true);
        }
        None => anchor.toggle_owner(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Overlay;
    use std::f32::consts::FRAC_PI_2;
    use tether_3d::math::BoundingBox;
    use tether_3d::{Camera, HeadlessCamera, HeadlessNode, HeadlessScene, Object3D, PerspectiveCamera};
    use tether_core::{Mat4, Rect, Size, TetherError};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    struct Rig {
        scene: Rc<HeadlessScene>,
        overlay: Rc<Overlay>,
        owner: Rc<Control>,
        anchor: Anchor,
    }

    fn rig() -> Rig {
        init_tracing();
        let scene = Rc::new(HeadlessScene::new(Size::new(800.0, 600.0)));
        scene.set_active_camera(Some(Rc::new(HeadlessCamera::new(Mat4::IDENTITY))));
        let overlay = Overlay::new(scene.clone());
        let owner = Rc::new(Control::new("label").with_id("owner"));
        overlay.add_control(&owner);
        let anchor = Anchor::new(owner.clone(), &AnchorConfig::default());
        Rig {
            scene,
            overlay,
            owner,
            anchor,
        }
    }

    fn node_at(rig: &Rig, z: f32) -> Rc<HeadlessNode> {
        let node = Rc::new(HeadlessNode::new("node").with_object(Object3D::at(0.0, 0.0, z)));
        rig.scene.add_node(&node, None, "node");
        node
    }

    #[test]
    fn update_respects_hysteresis() {
        let rig = rig();
        rig.owner.take_dirty();

        assert!(rig.anchor.update(100.0, 100.0));
        assert!(rig.owner.take_dirty());

        assert!(!rig.anchor.update(100.5, 100.9));
        assert!(!rig.anchor.update(99.0, 101.0));
        assert!(!rig.owner.take_dirty());
        assert_eq!(rig.anchor.position(), Some(Point::new(100.0, 100.0)));

        assert!(rig.anchor.update(100.0, 101.5));
        assert!(rig.owner.take_dirty());
        assert_eq!(rig.anchor.position(), Some(Point::new(100.0, 101.5)));
    }

    #[test]
    fn update_applies_owner_offset() {
        let rig = rig();
        rig.owner.set_offset(Point::new(10.0, -5.0));
        rig.anchor.update(50.0, 50.0);
        assert_eq!(rig.anchor.position(), Some(Point::new(60.0, 45.0)));
    }

    #[test]
    fn link_and_unlink_keep_one_subscription() {
        let rig = rig();
        assert_eq!(rig.scene.before_render_observers(), 0);

        let node = node_at(&rig, 0.5);
        rig.anchor.link_node(node.clone()).unwrap();
        assert!(rig.anchor.is_linked());
        assert_eq!(rig.scene.before_render_observers(), 1);

        rig.anchor.link_node(node).unwrap();
        assert_eq!(rig.scene.before_render_observers(), 1);

        assert!(rig.anchor.unlink());
        assert!(!rig.anchor.is_linked());
        assert_eq!(rig.anchor.position(), None);
        assert_eq!(rig.scene.before_render_observers(), 0);
        assert!(!rig.anchor.unlink());
    }

    #[test]
    fn link_without_host_is_an_error() {
        let rig = rig();
        let orphan = Rc::new(Control::new("label").with_id("orphan"));
        let anchor = Anchor::new(orphan, &AnchorConfig::default());
        let err = anchor.link_node(node_at(&rig, 0.5)).unwrap_err();
        assert!(matches!(err, TetherError::UnresolvedHost(ref name) if name == "orphan"));
        assert!(!anchor.is_linked());
    }

    #[test]
    fn node_projects_immediately_on_link() {
        let rig = rig();
        rig.anchor.link_node(node_at(&rig, 0.5)).unwrap();
        assert_eq!(rig.anchor.position(), Some(Point::new(400.0, 300.0)));
        assert!(rig.owner.is_renderable());
    }

    #[test]
    fn depth_bounds_make_owner_not_renderable() {
        for z in [0.0, 1.0] {
            let rig = rig();
            rig.anchor.link_node(node_at(&rig, z)).unwrap();
            assert!(!rig.owner.is_renderable(), "depth {z} should hide the owner");
            assert_eq!(rig.anchor.position(), None);
        }
    }

    #[test]
    fn disabled_node_hides_owner_without_waiting_for_a_frame() {
        let rig = rig();
        let node = node_at(&rig, 0.5);
        rig.anchor.link_node(node.clone()).unwrap();
        assert!(rig.owner.is_renderable());

        node.set_enabled(false);
        assert!(!rig.owner.is_renderable());
        node.set_enabled(true);
        assert!(rig.owner.is_renderable());
    }

    #[test]
    fn missing_camera_is_ineligible() {
        let rig = rig();
        rig.scene.set_active_camera(None);
        rig.anchor.link_node(node_at(&rig, 0.5)).unwrap();
        assert!(!rig.owner.is_renderable());
    }

    #[test]
    fn node_tracking_follows_frames() {
        let rig = rig();
        let node = node_at(&rig, 0.5);
        rig.anchor.link_node(node.clone()).unwrap();

        node.set_position(Vec3::new(0.5, 0.0, 0.5));
        rig.scene.render_frame();
        assert_eq!(rig.anchor.position(), Some(Point::new(600.0, 300.0)));
    }

    /// 90 degree vertical field of view over the 800x600 render target
    fn lens() -> PerspectiveCamera {
        PerspectiveCamera::new(FRAC_PI_2, 1.0, 0.1, 100.0).with_aspect(800.0 / 600.0)
    }

    fn assert_near(actual: Option<Point>, expected: Point) {
        let actual = actual.expect("anchor should be resolved");
        assert!(
            (actual.x - expected.x).abs() < 1e-2 && (actual.y - expected.y).abs() < 1e-2,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn perspective_camera_projects_nodes_in_front() {
        let rig = rig();
        let eye = Vec3::new(0.0, 0.0, 5.0);
        rig.scene
            .set_active_camera(Some(Rc::new(HeadlessCamera::looking_at(&lens(), eye, Vec3::ZERO))));

        let node = node_at(&rig, 0.0);
        node.set_position(Vec3::new(1.0, 0.0, 0.0));
        rig.scene.render_frame();
        rig.anchor.link_node(node.clone()).unwrap();
        assert!(rig.owner.is_renderable());
        assert_near(rig.anchor.position(), Point::new(460.0, 300.0));

        node.set_position(Vec3::new(0.0, 1.0, 0.0));
        rig.scene.render_frame();
        assert_near(rig.anchor.position(), Point::new(400.0, 240.0));
    }

    #[test]
    fn perspective_camera_rejects_behind_and_beyond_far() {
        let rig = rig();
        let eye = Vec3::new(0.0, 0.0, 5.0);
        rig.scene
            .set_active_camera(Some(Rc::new(HeadlessCamera::looking_at(&lens(), eye, Vec3::ZERO))));

        let node = node_at(&rig, 0.0);
        rig.anchor.link_node(node.clone()).unwrap();
        assert!(rig.owner.is_renderable());

        // Behind the eye
        node.set_position(Vec3::new(0.0, 0.0, 10.0));
        rig.scene.render_frame();
        assert!(!rig.owner.is_renderable());

        node.set_position(Vec3::ZERO);
        rig.scene.render_frame();
        assert!(rig.owner.is_renderable());

        // Past the far plane
        node.set_position(Vec3::new(0.0, 0.0, -200.0));
        rig.scene.render_frame();
        assert!(!rig.owner.is_renderable());
    }

    #[test]
    fn camera_placed_by_transform_matches_look_at() {
        let rig = rig();
        let camera = HeadlessCamera::perspective(&lens(), &Object3D::at(0.0, 0.0, 5.0));
        rig.scene.set_active_camera(Some(Rc::new(camera)));

        let mesh = Rc::new(HeadlessNode::mesh(
            "mesh",
            BoundingBox::from_center_half_extents(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.5)),
        ));
        rig.scene.add_node(&mesh, None, "mesh");
        rig.anchor.link_mesh(mesh).unwrap();
        assert_near(rig.anchor.position(), Point::new(400.0, 240.0));
    }

    #[test]
    fn moving_camera_moves_anchor_on_next_frame() {
        let rig = rig();
        let camera = Rc::new(HeadlessCamera::looking_at(
            &lens(),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
        ));
        rig.scene.set_active_camera(Some(camera.clone()));
        rig.anchor.link_node(node_at(&rig, 0.0)).unwrap();
        assert_near(rig.anchor.position(), Point::new(400.0, 300.0));

        let panned =
            HeadlessCamera::looking_at(&lens(), Vec3::new(2.0, 0.0, 5.0), Vec3::new(2.0, 0.0, 0.0));
        camera.set_view_projection(panned.view_projection());
        assert_near(rig.anchor.position(), Point::new(400.0, 300.0));

        rig.scene.render_frame();
        assert_near(rig.anchor.position(), Point::new(280.0, 300.0));
    }

    #[test]
    fn mesh_uses_bounding_sphere_center() {
        let rig = rig();
        let mesh = Rc::new(HeadlessNode::mesh(
            "mesh",
            BoundingBox::new(Vec3::new(0.0, 0.0, 0.4), Vec3::new(0.5, 0.5, 0.6)),
        ));
        rig.scene.add_node(&mesh, None, "mesh");
        rig.anchor.link_mesh(mesh).unwrap();
        assert_eq!(rig.anchor.position(), Some(Point::new(500.0, 225.0)));
    }

    #[test]
    fn control_target_reads_center_and_visibility() {
        let rig = rig();
        let target = Rc::new(Control::new("button").with_frame(Rect::new(10.0, 20.0, 100.0, 40.0)));
        rig.overlay.add_control(&target);

        rig.anchor.link_control(target.clone()).unwrap();
        assert_eq!(rig.anchor.position(), Some(Point::new(60.0, 40.0)));
        assert!(rig.owner.is_renderable());

        target.set_visible(false);
        rig.scene.render_frame();
        assert!(!rig.owner.is_renderable());

        target.set_visible(true);
        target.set_enabled(false);
        rig.scene.render_frame();
        assert!(!rig.owner.is_renderable());
    }

    #[test]
    fn render_scale_converts_to_overlay_pixels() {
        let rig = rig();
        rig.overlay.set_render_scale(2.0);
        rig.anchor.link_node(node_at(&rig, 0.5)).unwrap();
        assert_eq!(rig.anchor.position(), Some(Point::new(200.0, 150.0)));
    }

    #[test]
    fn paused_scene_freezes_and_resume_continues() {
        let rig = rig();
        let node = node_at(&rig, 0.5);
        rig.anchor.link_node(node.clone()).unwrap();

        rig.scene.pause();
        node.set_position(Vec3::new(-0.5, 0.0, 0.5));
        rig.scene.render_frames(3);
        assert_eq!(rig.anchor.position(), Some(Point::new(400.0, 300.0)));
        assert!(rig.anchor.is_linked());

        rig.scene.resume();
        rig.scene.render_frame();
        assert_eq!(rig.anchor.position(), Some(Point::new(200.0, 300.0)));
    }

    #[test]
    fn unlink_restores_owner_rule() {
        let rig = rig();
        rig.anchor.link_node(node_at(&rig, 1.0)).unwrap();
        assert!(rig.owner.is_not_renderable());
        rig.anchor.unlink();
        assert!(!rig.owner.is_not_renderable());
        assert!(rig.owner.is_renderable());
    }

    #[test]
    fn dropping_anchor_unsubscribes() {
        let rig = rig();
        rig.anchor.link_node(node_at(&rig, 0.5)).unwrap();
        let Rig { scene, anchor, .. } = rig;
        drop(anchor);
        assert_eq!(scene.before_render_observers(), 0);
    }
}
