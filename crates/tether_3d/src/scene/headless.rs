//! Headless scene backend
//!
//! Implements the engine interfaces in-process: nodes carry a local
//! transform and optional local bounds, the camera is a plain
//! view-projection matrix, and frames are driven by calling
//! [`HeadlessScene::render_frame`]. Nothing is drawn.

use super::engine::{Camera, FrameInfo, ProxyNode, SceneEngine, SceneMesh, SceneNode};
use super::{Object3D, PerspectiveCamera};
use crate::math::{BoundingBox, BoundingInfo, Mat4Ext, Quat};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tether_core::{
    Enableable, Mat4, Observable, Rect, Registry, Result, Size, Subscribable, Vec3,
};

// ─────────────────────────────────────────────────────────────────────────────
// Nodes
// ─────────────────────────────────────────────────────────────────────────────

/// A transform node, and a mesh when it has local bounds
pub struct HeadlessNode {
    name: String,
    object: RefCell<Object3D>,
    local_bounds: BoundingBox,
    enabled: Cell<bool>,
    world: Cell<Mat4>,
    dirty: Cell<bool>,
    world_matrix_updated: Observable<Mat4>,
    enabled_changed: Observable<bool>,
}

impl HeadlessNode {
    /// A node without geometry; its bounds collapse to its origin
    pub fn new(name: impl Into<String>) -> Self {
        Self::mesh(name, BoundingBox::new(Vec3::ZERO, Vec3::ZERO))
    }

    /// A mesh with the given local-space bounds
    pub fn mesh(name: impl Into<String>, local_bounds: BoundingBox) -> Self {
        Self {
            name: name.into(),
            object: RefCell::new(Object3D::default()),
            local_bounds,
            enabled: Cell::new(true),
            world: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
            world_matrix_updated: Observable::new(),
            enabled_changed: Observable::new(),
        }
    }

    /// Replace the local transform; the world matrix follows immediately
    pub fn with_object(self, object: Object3D) -> Self {
        self.world.set(object.local_matrix());
        *self.object.borrow_mut() = object;
        self
    }

    pub fn object(&self) -> Object3D {
        self.object.borrow().clone()
    }

    /// Mutate the local transform; takes effect at the next world matrix computation
    pub fn modify(&self, f: impl FnOnce(&mut Object3D)) {
        f(&mut self.object.borrow_mut());
        self.dirty.set(true);
    }

    pub fn position(&self) -> Vec3 {
        self.object.borrow().position
    }

    pub fn set_position(&self, position: Vec3) {
        self.modify(|obj| obj.position = position);
    }

    /// Set an Euler rotation, dropping any quaternion
    pub fn set_rotation(&self, euler: Vec3) {
        self.modify(|obj| {
            obj.rotation = euler;
            obj.rotation_quaternion = None;
        });
    }

    pub fn local_bounds(&self) -> BoundingBox {
        self.local_bounds
    }

    pub fn world_matrix_observers(&self) -> usize {
        self.world_matrix_updated.observer_count()
    }
}

impl fmt::Debug for HeadlessNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessNode")
            .field("name", &self.name)
            .field("object", &self.object.borrow())
            .field("enabled", &self.enabled.get())
            .finish()
    }
}

impl Enableable for HeadlessNode {
    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        if self.enabled.replace(enabled) != enabled {
            self.enabled_changed.notify(&enabled);
        }
    }
}

impl SceneNode for HeadlessNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn world_matrix(&self) -> Mat4 {
        self.world.get()
    }

    fn is_visible(&self) -> bool {
        self.object.borrow().visible
    }

    fn on_world_matrix_updated(&self) -> &dyn Subscribable<Mat4> {
        &self.world_matrix_updated
    }

    fn on_enabled_changed(&self) -> &dyn Subscribable<bool> {
        &self.enabled_changed
    }
}

impl SceneMesh for HeadlessNode {
    fn bounding_info(&self) -> BoundingInfo {
        BoundingInfo::from_local(&self.local_bounds, &self.world.get())
    }
}

impl ProxyNode for HeadlessNode {
    fn scaling(&self) -> Vec3 {
        self.object.borrow().scaling
    }

    fn rotation(&self) -> Vec3 {
        self.object.borrow().rotation
    }

    fn rotation_quaternion(&self) -> Option<Quat> {
        self.object.borrow().rotation_quaternion
    }

    // Headless nodes have no parent, so absolute and local positions match
    fn set_absolute_position(&self, position: Vec3) {
        self.set_position(position);
    }

    fn set_scaling(&self, scaling: Vec3) {
        self.modify(|obj| obj.scaling = scaling);
    }

    fn set_rotation_quaternion(&self, rotation: Quat) {
        self.modify(|obj| obj.rotation_quaternion = Some(rotation));
    }

    fn set_visible(&self, visible: bool) {
        self.object.borrow_mut().visible = visible;
    }

    fn compute_world_matrix(&self, force: bool) -> Mat4 {
        if !force && !self.dirty.get() {
            return self.world.get();
        }
        let world = self.object.borrow().local_matrix();
        self.world.set(world);
        self.dirty.set(false);
        self.world_matrix_updated.notify(&world);
        world
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Camera
// ─────────────────────────────────────────────────────────────────────────────

/// A camera reduced to its view-projection matrix and viewport
#[derive(Debug)]
pub struct HeadlessCamera {
    view_projection: Cell<Mat4>,
    viewport: Cell<Rect>,
}

impl HeadlessCamera {
    pub fn new(view_projection: Mat4) -> Self {
        Self {
            view_projection: Cell::new(view_projection),
            viewport: Cell::new(Rect::new(0.0, 0.0, 1.0, 1.0)),
        }
    }

    /// Perspective camera placed by `transform`
    pub fn perspective(camera: &PerspectiveCamera, transform: &Object3D) -> Self {
        Self::new(camera.view_projection(transform))
    }

    /// Perspective camera at `eye` aimed at `target`
    pub fn looking_at(camera: &PerspectiveCamera, eye: Vec3, target: Vec3) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::UP);
        Self::new(camera.projection_matrix().mul(&view))
    }

    /// Normalized viewport (fractions of the render target)
    pub fn with_viewport(self, viewport: Rect) -> Self {
        self.viewport.set(viewport);
        self
    }

    pub fn set_view_projection(&self, view_projection: Mat4) {
        self.view_projection.set(view_projection);
    }
}

impl Camera for HeadlessCamera {
    fn view_projection(&self) -> Mat4 {
        self.view_projection.get()
    }

    fn viewport(&self) -> Rect {
        self.viewport.get()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scene
// ─────────────────────────────────────────────────────────────────────────────

const DEFAULT_FRAME_MS: f32 = 1000.0 / 60.0;

/// Frame loop, camera and node set
pub struct HeadlessScene {
    before_render: Observable<FrameInfo>,
    camera: RefCell<Option<Rc<dyn Camera>>>,
    render_size: Cell<Size>,
    nodes: RefCell<Vec<Rc<HeadlessNode>>>,
    registry: Registry<dyn SceneNode>,
    frame_index: Cell<u64>,
    frame_ms: Cell<f32>,
    paused: Cell<bool>,
}

impl HeadlessScene {
    pub fn new(render_size: Size) -> Self {
        Self {
            before_render: Observable::new(),
            camera: RefCell::new(None),
            render_size: Cell::new(render_size),
            nodes: RefCell::new(Vec::new()),
            registry: Registry::new(),
            frame_index: Cell::new(0),
            frame_ms: Cell::new(DEFAULT_FRAME_MS),
            paused: Cell::new(false),
        }
    }

    pub fn set_active_camera(&self, camera: Option<Rc<dyn Camera>>) {
        *self.camera.borrow_mut() = camera;
    }

    pub fn set_render_size(&self, size: Size) {
        self.render_size.set(size);
    }

    /// Simulated frame duration reported to before-render observers
    pub fn set_frame_ms(&self, frame_ms: f32) {
        self.frame_ms.set(frame_ms);
    }

    /// Add a node to the frame loop and make it queryable
    pub fn add_node(&self, node: &Rc<HeadlessNode>, id: Option<&str>, tag: &str) {
        self.nodes.borrow_mut().push(node.clone());
        let as_node: Rc<dyn SceneNode> = node.clone();
        self.registry.register(id, tag, as_node);
    }

    pub fn remove_node(&self, node: &Rc<HeadlessNode>) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        let Some(index) = nodes.iter().position(|n| Rc::ptr_eq(n, node)) else {
            return false;
        };
        nodes.remove(index);
        let as_node: Rc<dyn SceneNode> = node.clone();
        self.registry.unregister(&as_node);
        true
    }

    /// Registered nodes, for `#id` and tag queries
    pub fn nodes(&self) -> &Registry<dyn SceneNode> {
        &self.registry
    }

    pub fn query(&self, selector: &str) -> Result<Option<Rc<dyn SceneNode>>> {
        self.registry.query(selector)
    }

    /// Render one frame
    ///
    /// World matrices are recomputed first (firing world-matrix-updated for
    /// every changed node), then before-render fires. Returns false without
    /// firing anything while paused.
    pub fn render_frame(&self) -> bool {
        if self.paused.get() {
            tracing::trace!("scene paused, frame skipped");
            return false;
        }

        let index = self.frame_index.get() + 1;
        self.frame_index.set(index);

        let nodes: SmallVec<[Rc<HeadlessNode>; 8]> = self.nodes.borrow().iter().cloned().collect();
        for node in &nodes {
            node.compute_world_matrix(false);
        }

        let frame = FrameInfo {
            index,
            delta_ms: self.frame_ms.get(),
        };
        let fired = self.before_render.notify(&frame);
        tracing::trace!(index, fired, "frame rendered");
        true
    }

    /// Render `count` frames, returning how many actually ran
    pub fn render_frames(&self, count: usize) -> usize {
        (0..count).filter(|_| self.render_frame()).count()
    }

    /// Stop firing hooks until [`HeadlessScene::resume`]
    pub fn pause(&self) {
        if !self.paused.replace(true) {
            tracing::debug!("scene paused");
        }
    }

    pub fn resume(&self) {
        if self.paused.replace(false) {
            tracing::debug!("scene resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Number of frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frame_index.get()
    }

    pub fn before_render_observers(&self) -> usize {
        self.before_render.observer_count()
    }
}

impl fmt::Debug for HeadlessScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessScene")
            .field("render_size", &self.render_size.get())
            .field("nodes", &self.nodes.borrow().len())
            .field("frame_index", &self.frame_index.get())
            .field("paused", &self.paused.get())
            .finish()
    }
}

impl SceneEngine for HeadlessScene {
    fn before_render(&self) -> &dyn Subscribable<FrameInfo> {
        &self.before_render
    }

    fn active_camera(&self) -> Option<Rc<dyn Camera>> {
        self.camera.borrow().clone()
    }

    fn render_size(&self) -> Size {
        self.render_size.get()
    }
}
