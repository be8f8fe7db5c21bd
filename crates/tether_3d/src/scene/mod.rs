//! Scene engine interfaces and the headless backend

mod camera;
mod engine;
mod headless;
mod object3d;

pub use camera::PerspectiveCamera;
pub use engine::{Camera, FrameInfo, ProxyNode, SceneEngine, SceneMesh, SceneNode};
pub use headless::{HeadlessCamera, HeadlessNode, HeadlessScene};
pub use object3d::Object3D;
