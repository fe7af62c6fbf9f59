pub mod camera;
pub mod graph;
pub mod manager;

pub use camera::{CameraController, CameraRig};
pub use graph::{NodeId, Ray, RayHit, SceneGraph, SceneNode};
pub use manager::{PerformanceMode, RendererSettings, SceneManager, SceneStatus};
