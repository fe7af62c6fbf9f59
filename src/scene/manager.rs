//! Scene lifecycle: readiness, render-context loss and renderer settings.
//!
//! GPU resources do not survive a context loss, so restore always re-runs
//! full scene initialization through the caller-supplied closure before the
//! scene is marked ready again.

use std::cell::RefCell;
use std::rc::Rc;

use crate::observer::{Subscribers, Subscription};
use crate::scene::camera::CameraRig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PerformanceMode {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererSettings {
    pub pixel_ratio: f64,
    pub antialias: bool,
    pub shadows_enabled: bool,
    pub shadow_map_size: u32,
    pub max_lights: u32,
}

/// Renderer configuration per performance tier. `device_pixel_ratio` is the
/// browser-reported ratio, capped per tier.
pub fn renderer_settings(mode: PerformanceMode, device_pixel_ratio: f64) -> RendererSettings {
    match mode {
        PerformanceMode::High => RendererSettings {
            pixel_ratio: device_pixel_ratio.min(2.0),
            antialias: true,
            shadows_enabled: true,
            shadow_map_size: 2048,
            max_lights: 8,
        },
        PerformanceMode::Medium => RendererSettings {
            pixel_ratio: device_pixel_ratio.min(1.5),
            antialias: true,
            shadows_enabled: true,
            shadow_map_size: 1024,
            max_lights: 4,
        },
        PerformanceMode::Low => RendererSettings {
            pixel_ratio: 1.0,
            antialias: false,
            shadows_enabled: false,
            shadow_map_size: 512,
            max_lights: 2,
        },
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneStatus {
    pub is_ready: bool,
    pub has_error: bool,
    pub context_lost: bool,
    pub error_message: Option<String>,
}

impl Default for SceneStatus {
    fn default() -> Self {
        Self {
            is_ready: false,
            has_error: false,
            context_lost: false,
            error_message: None,
        }
    }
}

pub struct SceneManager {
    status: SceneStatus,
    performance_mode: PerformanceMode,
    rig: Rc<RefCell<CameraRig>>,
    subscribers: Subscribers<SceneStatus>,
}

impl SceneManager {
    pub fn new(rig: Rc<RefCell<CameraRig>>, performance_mode: PerformanceMode) -> Self {
        Self {
            status: SceneStatus::default(),
            performance_mode,
            rig,
            subscribers: Subscribers::new(),
        }
    }

    pub fn status(&self) -> SceneStatus {
        self.status.clone()
    }

    pub fn performance_mode(&self) -> PerformanceMode {
        self.performance_mode
    }

    pub fn subscribe(
        &mut self,
        callback: impl Fn(&SceneStatus) + 'static,
    ) -> Subscription<SceneStatus> {
        self.subscribers.subscribe(callback)
    }

    fn notify(&self) {
        self.subscribers.notify(&self.status);
    }

    /// Scene bootstrap contract: called once per successful (re)init with
    /// the camera the controller will own from now on. Configures the
    /// projection parameters and marks the scene ready.
    pub fn on_scene_ready(&mut self) {
        {
            let mut rig = self.rig.borrow_mut();
            rig.fov_y_deg = 75.0;
            rig.near = 0.1;
            rig.far = 1000.0;
        }
        self.status = SceneStatus {
            is_ready: true,
            has_error: false,
            context_lost: false,
            error_message: None,
        };
        log::info!("scene ready ({:?})", self.performance_mode);
        self.notify();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("scene setup failed: {message}");
        self.status.is_ready = false;
        self.status.has_error = true;
        self.status.error_message = Some(message);
        self.notify();
    }

    /// Clear a failure so the caller can retry initialization.
    pub fn reset_error(&mut self) {
        self.status.has_error = false;
        self.status.error_message = None;
        self.notify();
    }

    /// The render context was lost: everything GPU-side is now invalid.
    pub fn handle_context_loss(&mut self) {
        log::warn!("webgl context lost");
        self.status.context_lost = true;
        self.status.is_ready = false;
        self.notify();
    }

    /// The context came back; rebuild the scene from scratch and mark ready.
    pub fn handle_context_restore(&mut self, reinit: impl FnOnce()) {
        log::info!("webgl context restored, reinitializing scene");
        self.status.context_lost = false;
        self.notify();
        reinit();
        self.on_scene_ready();
    }
}
