//! Fullscreen overlay hosting 2D controls over a scene

use crate::control::Control;
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use tether_3d::SceneEngine;
use tether_core::{Point, Registry, Result};

/// What a control needs from the overlay it lives in
pub trait OverlayHost {
    fn scene(&self) -> Rc<dyn SceneEngine>;

    /// Render-target pixels per overlay pixel
    fn render_scale(&self) -> f32 {
        1.0
    }

    /// Convert render-target pixels to overlay pixels
    fn to_overlay(&self, screen: Point) -> Point {
        let scale = self.render_scale();
        Point::new(screen.x / scale, screen.y / scale)
    }
}

/// An overlay bound to one scene
pub struct Overlay {
    scene: Rc<dyn SceneEngine>,
    render_scale: Cell<f32>,
    controls: Registry<Control>,
}

impl Overlay {
    pub fn new(scene: Rc<dyn SceneEngine>) -> Rc<Self> {
        Rc::new(Self {
            scene,
            render_scale: Cell::new(1.0),
            controls: Registry::new(),
        })
    }

    /// Scale derived from an ideal overlay width
    ///
    /// An overlay designed for `ideal_width` pixels rendered into a wider
    /// target is scaled up; anchored coordinates are divided back down.
    pub fn set_ideal_width(&self, ideal_width: f32) {
        let width = self.scene.render_size().width;
        if ideal_width > 0.0 && width > 0.0 {
            self.render_scale.set(width / ideal_width);
        }
    }

    pub fn set_render_scale(&self, scale: f32) {
        if scale > 0.0 {
            self.render_scale.set(scale);
        }
    }

    /// Attach `control` to this overlay and make it queryable
    pub fn add_control(self: &Rc<Self>, control: &Rc<Control>) {
        let host: Rc<dyn OverlayHost> = self.clone();
        let weak: Weak<dyn OverlayHost> = Rc::downgrade(&host);
        control.set_host(Some(weak));
        self.controls.register(control.id(), control.tag(), control.clone());
        tracing::debug!(control = control.label(), "control added to overlay");
    }

    pub fn remove_control(&self, control: &Rc<Control>) -> bool {
        let removed = self.controls.unregister(control);
        if removed {
            control.set_host(None);
            tracing::debug!(control = control.label(), "control removed from overlay");
        }
        removed
    }

    pub fn query(&self, selector: &str) -> Result<Option<Rc<Control>>> {
        self.controls.query(selector)
    }

    pub fn query_all(&self, selector: &str) -> Result<Vec<Rc<Control>>> {
        self.controls.query_all(selector)
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }
}

impl OverlayHost for Overlay {
    fn scene(&self) -> Rc<dyn SceneEngine> {
        self.scene.clone()
    }

    fn render_scale(&self) -> f32 {
        self.render_scale.get()
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("render_scale", &self.render_scale.get())
            .field("controls", &self.controls)
            .finish()
    }
}
