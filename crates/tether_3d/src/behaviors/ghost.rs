//! Ghost behavior
//!
//! Drags a proxy node after a target mesh. Whenever the target's world matrix
//! is recomputed, the behavior captures a goal pose from the target's world
//! bounds (center, size) and absolute rotation. Every before-render tick the
//! proxy's position, scale and rotation each close a fixed ratio of the
//! remaining distance to their goal, independently, until they snap.
//!
//! The proxy is assumed to be unit-sized geometry, so scaling it by the
//! target's box size makes it cover the target.

use crate::math::Quat;
use crate::scene::{ProxyNode, SceneEngine, SceneMesh};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tether_animation::{ApproachConfig, Channel, Convergence};
use tether_core::{GhostConfig, Result, Subscription, TetherError, Vec3};

const NAME: &str = "Ghost";

/// Position, size and rotation of a target as the proxy should match it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostPose {
    pub position: Vec3,
    /// Non-uniform scale: the target's world box size
    pub dimension: Vec3,
    pub rotation: Quat,
}

impl GhostPose {
    /// Capture the current pose of `target`
    pub fn of(target: &dyn SceneMesh) -> Self {
        let bounds = target.bounding_info().bounding_box;
        Self {
            position: bounds.center(),
            dimension: bounds.size(),
            rotation: target.absolute_rotation().normalize(),
        }
    }
}

/// Where the behavior is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostState {
    /// No target
    Idle,
    /// Target set, proxy resting on the last goal
    Tracking,
    /// At least one channel is moving toward its goal
    Converging,
    /// The last tick snapped every moving channel onto its goal
    Converged,
}

struct GhostInner {
    node: Option<Rc<dyn ProxyNode>>,
    target: Option<Rc<dyn SceneMesh>>,
    goal: Option<GhostPose>,
    position: Channel<Vec3>,
    dimension: Channel<Vec3>,
    rotation: Channel<Quat>,
    approach: ApproachConfig,
    auto_hide: bool,
    converged: bool,
    target_observer: Option<Subscription>,
    frame_observer: Option<Subscription>,
}

impl GhostInner {
    fn current_pose(&self) -> GhostPose {
        GhostPose {
            position: self.position.value(),
            dimension: self.dimension.value(),
            rotation: self.rotation.value(),
        }
    }

    fn snap(&mut self, pose: GhostPose) {
        self.position.snap(pose.position);
        self.dimension.snap(pose.dimension);
        self.rotation.snap(pose.rotation);
        self.converged = false;
    }

    fn clear_goals(&mut self) {
        self.position.clear_goal();
        self.dimension.clear_goal();
        self.rotation.clear_goal();
    }

    fn is_converging(&self) -> bool {
        self.position.is_converging()
            || self.dimension.is_converging()
            || self.rotation.is_converging()
    }

    fn take_observers(&mut self) -> [Option<Subscription>; 2] {
        [self.target_observer.take(), self.frame_observer.take()]
    }
}

/// Smoothly drags a proxy node toward a target mesh
pub struct GhostBehavior {
    engine: Rc<dyn SceneEngine>,
    inner: Rc<RefCell<GhostInner>>,
}

impl GhostBehavior {
    /// Fails with `InvalidConfig` unless the drag ratio lies in (0, 1) and
    /// epsilon is positive.
    pub fn new(engine: Rc<dyn SceneEngine>, config: &GhostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine,
            inner: Rc::new(RefCell::new(GhostInner {
                node: None,
                target: None,
                goal: None,
                position: Channel::new(Vec3::ZERO),
                dimension: Channel::new(Vec3::ONE),
                rotation: Channel::new(Quat::IDENTITY),
                approach: ApproachConfig::from(config),
                auto_hide: config.auto_hide,
                converged: false,
                target_observer: None,
                frame_observer: None,
            })),
        })
    }

    pub fn name(&self) -> &'static str {
        NAME
    }

    /// Attach to `node` and start following `target`
    ///
    /// The node must be at unit scale. Its rotation is converted to a
    /// normalized quaternion.
    pub fn attach(&self, node: Rc<dyn ProxyNode>, target: Option<Rc<dyn SceneMesh>>) -> Result<()> {
        let scaling = node.scaling();
        if scaling != Vec3::ONE {
            return Err(TetherError::NonUnitScale {
                name: node.name().to_string(),
                x: scaling.x,
                y: scaling.y,
                z: scaling.z,
            });
        }
        if self.is_attached() {
            self.detach();
        }

        let rotation = node
            .rotation_quaternion()
            .unwrap_or_else(|| Quat::from_euler_vec(node.rotation()))
            .normalize();
        node.set_rotation_quaternion(rotation);

        tracing::debug!(node = node.name(), "ghost attached");
        {
            let mut inner = self.inner.borrow_mut();
            inner.position = Channel::new(node.absolute_position());
            inner.dimension = Channel::new(scaling);
            inner.rotation = Channel::new(rotation);
            inner.node = Some(node);
        }
        self.set_target_mesh(target)
    }

    /// Stop following and forget the node; the node itself is left as is
    pub fn detach(&self) {
        let (observers, node) = {
            let mut inner = self.inner.borrow_mut();
            inner.target = None;
            inner.goal = None;
            inner.clear_goals();
            (inner.take_observers(), inner.node.take())
        };
        drop(observers);
        if let Some(node) = node {
            tracing::debug!(node = node.name(), "ghost detached");
        }
    }

    /// Replace the target, reinstalling observers, then [`reset`](Self::reset)
    pub fn set_target_mesh(&self, target: Option<Rc<dyn SceneMesh>>) -> Result<()> {
        if !self.is_attached() {
            return Err(TetherError::NotAttached(NAME));
        }

        let previous = {
            let mut inner = self.inner.borrow_mut();
            inner.target = target.clone();
            inner.take_observers()
        };
        drop(previous);

        if let Some(target) = &target {
            let weak = Rc::downgrade(&self.inner);
            let target_observer = target
                .on_world_matrix_updated()
                .subscribe(Box::new(move |_| capture_goal(&weak)));

            let weak = Rc::downgrade(&self.inner);
            let frame_observer = self
                .engine
                .before_render()
                .subscribe(Box::new(move |_| tick(&weak)));

            let mut inner = self.inner.borrow_mut();
            inner.target_observer = Some(target_observer);
            inner.frame_observer = Some(frame_observer);
            tracing::debug!(mesh = target.name(), "ghost retargeted");
        } else {
            tracing::debug!("ghost target cleared");
        }

        self.reset()
    }

    /// Snap the proxy onto the target and drop pending goals
    ///
    /// With no target the proxy is hidden.
    pub fn reset(&self) -> Result<()> {
        let (node, target, auto_hide) = {
            let inner = self.inner.borrow();
            let node = inner.node.clone().ok_or(TetherError::NotAttached(NAME))?;
            (node, inner.target.clone(), inner.auto_hide)
        };

        let Some(target) = target else {
            {
                let mut inner = self.inner.borrow_mut();
                inner.goal = None;
                inner.converged = false;
                inner.clear_goals();
            }
            node.set_visible(false);
            return Ok(());
        };

        let pose = GhostPose::of(target.as_ref());
        {
            let mut inner = self.inner.borrow_mut();
            inner.goal = Some(pose);
            inner.snap(pose);
        }
        write_pose(node.as_ref(), &pose);
        node.set_visible(target.is_visible() && !auto_hide);
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().node.is_some()
    }

    pub fn node(&self) -> Option<Rc<dyn ProxyNode>> {
        self.inner.borrow().node.clone()
    }

    pub fn target(&self) -> Option<Rc<dyn SceneMesh>> {
        self.inner.borrow().target.clone()
    }

    /// Last captured goal pose, `None` without a target
    pub fn goal(&self) -> Option<GhostPose> {
        self.inner.borrow().goal
    }

    /// Pose the proxy was last driven to
    pub fn pose(&self) -> GhostPose {
        self.inner.borrow().current_pose()
    }

    pub fn is_converging(&self) -> bool {
        self.inner.borrow().is_converging()
    }

    pub fn state(&self) -> GhostState {
        let inner = self.inner.borrow();
        if inner.target.is_none() {
            GhostState::Idle
        } else if inner.is_converging() {
            GhostState::Converging
        } else if inner.converged {
            GhostState::Converged
        } else {
            GhostState::Tracking
        }
    }

    pub fn auto_hide(&self) -> bool {
        self.inner.borrow().auto_hide
    }

    pub fn set_auto_hide(&self, auto_hide: bool) {
        self.inner.borrow_mut().auto_hide = auto_hide;
    }

    pub fn drag_ratio(&self) -> f32 {
        self.inner.borrow().approach.ratio
    }

    /// Change the drag ratio; must lie in (0, 1)
    pub fn set_drag_ratio(&self, ratio: f32) -> Result<()> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(TetherError::InvalidConfig(format!(
                "drag ratio must be in (0, 1), got {ratio}"
            )));
        }
        self.inner.borrow_mut().approach.ratio = ratio;
        Ok(())
    }
}

impl fmt::Debug for GhostBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("GhostBehavior")
            .field("node", &inner.node.as_ref().map(|n| n.name().to_string()))
            .field("target", &inner.target.as_ref().map(|t| t.name().to_string()))
            .field("pose", &inner.current_pose())
            .field("auto_hide", &inner.auto_hide)
            .finish()
    }
}

fn write_pose(node: &dyn ProxyNode, pose: &GhostPose) {
    node.set_absolute_position(pose.position);
    node.set_scaling(pose.dimension);
    node.set_rotation_quaternion(pose.rotation);
    node.compute_world_matrix(true);
}

/// Target world matrix changed: capture a fresh goal
fn capture_goal(inner: &Weak<RefCell<GhostInner>>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let target = inner.borrow().target.clone();
    let Some(target) = target else {
        return;
    };

    let pose = GhostPose::of(target.as_ref());
    let mut inner = inner.borrow_mut();
    inner.goal = Some(pose);
    inner.position.set_goal(pose.position);
    inner.dimension.set_goal(pose.dimension);
    inner.rotation.set_goal(pose.rotation);
    inner.converged = false;
    tracing::trace!(mesh = target.name(), ?pose, "ghost goal captured");
}

/// Before-render: advance every channel one step
fn tick(inner: &Weak<RefCell<GhostInner>>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let (node, pose, moved, converging, auto_hide) = {
        let mut guard = inner.borrow_mut();
        let state = &mut *guard;
        let Some(node) = state.node.clone() else {
            return;
        };

        let config = state.approach;
        let steps = [
            state.position.step(&config),
            state.dimension.step(&config),
            state.rotation.step(&config),
        ];
        let converging = steps.iter().any(|s| s.is_converging());
        let moved = steps.iter().any(|s| *s != Convergence::Idle);
        if moved && !converging {
            state.converged = true;
            tracing::trace!(node = node.name(), "ghost converged");
        }
        (node, state.current_pose(), moved, converging, state.auto_hide)
    };

    // A channel that snapped this tick still has to reach the node
    if moved {
        write_pose(node.as_ref(), &pose);
    }
    if converging {
        node.set_visible(true);
    } else if auto_hide {
        node.set_visible(false);
    }
}
