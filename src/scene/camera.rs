//! Camera rig and the scroll/cinematic camera controller.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec3;

use crate::constants::{CAMERA_PATH, durations};
use crate::math;
use crate::scene::graph::Ray;
use crate::tween::{Ease, PoseTween, TweenRunner};

/// The single camera pose written by scroll mapping, zone transitions and
/// portal tweens. Rendering reads it, nothing else writes it directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub position: DVec3,
    pub target: DVec3,
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: CAMERA_PATH[0].position,
            target: CAMERA_PATH[0].target,
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraRig {
    pub fn set_pose(&mut self, position: DVec3, target: DVec3) {
        self.position = position;
        self.target = target;
    }

    fn basis(&self) -> (DVec3, DVec3, DVec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let world_up = DVec3::Y;
        let mut right = forward.cross(world_up);
        if right.length_squared() < 1e-12 {
            right = DVec3::X;
        } else {
            right = right.normalize();
        }
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Ray through a point in normalized device coordinates ([-1,1]², y up).
    pub fn ray_from_ndc(&self, ndc_x: f64, ndc_y: f64, aspect: f64) -> Ray {
        let (forward, right, up) = self.basis();
        let half_h = (self.fov_y_deg.to_radians() / 2.0).tan();
        let half_w = half_h * aspect.max(1e-6);
        let dir = forward + right * (ndc_x * half_w) + up * (ndc_y * half_h);
        Ray::new(self.position, dir)
    }

    /// Project a world point to screen pixels; `None` when behind the camera
    /// or inside the near plane.
    pub fn project_to_screen(&self, point: DVec3, width: f64, height: f64) -> Option<(f64, f64)> {
        let (forward, right, up) = self.basis();
        let rel = point - self.position;
        let z = rel.dot(forward);
        if z < self.near {
            return None;
        }
        let x = rel.dot(right);
        let y = rel.dot(up);
        let half_h = (self.fov_y_deg.to_radians() / 2.0).tan();
        let half_w = half_h * (width / height.max(1.0));
        let ndc_x = x / (z * half_w);
        let ndc_y = y / (z * half_h);
        Some((
            (ndc_x + 1.0) * 0.5 * width,
            (1.0 - ndc_y) * 0.5 * height,
        ))
    }
}

/// Maps scroll progress onto the waypoint path and runs cinematic tweens.
/// Scroll updates and tweens are mutually exclusive: while a transition is
/// running the controller ignores scroll input, and new transition requests
/// are rejected rather than preempting the active one.
pub struct CameraController {
    rig: Rc<RefCell<CameraRig>>,
    current_zone_index: usize,
    pending_zone_index: Option<usize>,
    runner: TweenRunner,
}

impl CameraController {
    pub fn new(rig: Rc<RefCell<CameraRig>>) -> Self {
        Self {
            rig,
            current_zone_index: 0,
            pending_zone_index: None,
            runner: TweenRunner::new(),
        }
    }

    pub fn rig(&self) -> Rc<RefCell<CameraRig>> {
        self.rig.clone()
    }

    /// Continuous scroll mapping: piecewise smoothstep interpolation between
    /// consecutive waypoints; exact snap at the path end.
    pub fn update_from_scroll(&mut self, progress: f64) {
        if self.runner.is_busy() {
            return;
        }
        let progress = math::clamp01(progress);
        let total = CAMERA_PATH.len();
        let zone_progress = progress * (total - 1) as f64;
        let zone = zone_progress.floor() as usize;
        let local = zone_progress - zone as f64;

        let mut rig = self.rig.borrow_mut();
        if zone >= total - 1 {
            let last = CAMERA_PATH[total - 1];
            rig.set_pose(last.position, last.target);
            return;
        }
        let from = CAMERA_PATH[zone];
        let to = CAMERA_PATH[zone + 1];
        let eased = math::smoothstep(local);
        rig.set_pose(
            math::lerp_vec(from.position, to.position, eased),
            math::lerp_vec(from.target, to.target, eased),
        );
    }

    /// Cinematic jump to a zone waypoint. Rejected while transitioning or
    /// for an out-of-range index.
    pub fn transition_to_zone(
        &mut self,
        zone_index: usize,
        duration: f64,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> bool {
        if self.runner.is_busy() {
            log::warn!("camera transition rejected: another transition is running");
            return false;
        }
        if zone_index >= CAMERA_PATH.len() {
            log::warn!("camera transition rejected: zone index {zone_index} out of range");
            return false;
        }
        let target = CAMERA_PATH[zone_index];
        let (from_position, from_target) = {
            let rig = self.rig.borrow();
            (rig.position, rig.target)
        };
        let tween = PoseTween::new(
            from_position,
            target.position,
            from_target,
            target.target,
            duration,
            Ease::Power2InOut,
        );
        let rig = self.rig.clone();
        let started = self.runner.start(
            tween,
            move |pos, look| rig.borrow_mut().set_pose(pos, look),
            on_complete,
        );
        if started {
            self.pending_zone_index = Some(zone_index);
        }
        started
    }

    /// Cinematic move into a portal framing: slightly above and in front of
    /// the portal, looking at it.
    pub fn enter_project_portal(
        &mut self,
        portal_position: DVec3,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> bool {
        if self.runner.is_busy() {
            log::warn!("portal entry rejected: camera is transitioning");
            return false;
        }
        let entry_position = portal_position + DVec3::new(0.0, 2.0, 5.0);
        let (from_position, from_target) = {
            let rig = self.rig.borrow();
            (rig.position, rig.target)
        };
        let tween = PoseTween::new(
            from_position,
            entry_position,
            from_target,
            portal_position,
            durations::PORTAL_ENTRY,
            Ease::Power2InOut,
        );
        let rig = self.rig.clone();
        self.runner.start(
            tween,
            move |pos, look| rig.borrow_mut().set_pose(pos, look),
            on_complete,
        )
    }

    /// Return from a portal framing to the current zone waypoint.
    pub fn exit_project_portal(&mut self, on_complete: Option<Box<dyn FnOnce()>>) -> bool {
        self.transition_to_zone(self.current_zone_index, durations::PORTAL_EXIT, on_complete)
    }

    /// Advance the active tween; call once per animation frame.
    pub fn tick(&mut self, dt: f64) {
        if self.runner.tick(dt) {
            if let Some(zone) = self.pending_zone_index.take() {
                self.current_zone_index = zone;
            }
        }
    }

    pub fn is_in_transition(&self) -> bool {
        self.runner.is_busy()
    }

    pub fn current_zone_index(&self) -> usize {
        self.current_zone_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(Rc::new(RefCell::new(CameraRig::default())))
    }

    #[test]
    fn scroll_zero_lands_exactly_on_first_waypoint() {
        let mut ctl = controller();
        ctl.update_from_scroll(0.0);
        let rig = ctl.rig();
        let rig = rig.borrow();
        assert_eq!(rig.position, CAMERA_PATH[0].position);
        assert_eq!(rig.target, CAMERA_PATH[0].target);
    }

    #[test]
    fn scroll_one_lands_exactly_on_last_waypoint() {
        let mut ctl = controller();
        ctl.update_from_scroll(1.0);
        let rig = ctl.rig();
        let rig = rig.borrow();
        let last = CAMERA_PATH[CAMERA_PATH.len() - 1];
        assert_eq!(rig.position, last.position);
        assert_eq!(rig.target, last.target);
    }

    #[test]
    fn scroll_midway_interpolates_between_neighbors() {
        let mut ctl = controller();
        // Halfway between waypoint 0 and 1 in path space.
        let progress = 0.5 / (CAMERA_PATH.len() - 1) as f64;
        ctl.update_from_scroll(progress);
        let rig = ctl.rig();
        let rig = rig.borrow();
        let expected = math::lerp_vec(
            CAMERA_PATH[0].position,
            CAMERA_PATH[1].position,
            math::smoothstep(0.5),
        );
        assert!((rig.position - expected).length() < 1e-9);
    }

    #[test]
    fn transition_blocks_scroll_until_complete() {
        let mut ctl = controller();
        assert!(ctl.transition_to_zone(3, 1.0, None));
        assert!(ctl.is_in_transition());

        ctl.update_from_scroll(0.0);
        {
            let rig = ctl.rig();
            let rig = rig.borrow();
            // Scroll ignored: pose unchanged from the initial waypoint since
            // no tick has run yet.
            assert_eq!(rig.position, CAMERA_PATH[0].position);
        }

        for _ in 0..20 {
            ctl.tick(0.1);
        }
        assert!(!ctl.is_in_transition());
        assert_eq!(ctl.current_zone_index(), 3);
        let rig = ctl.rig();
        let rig = rig.borrow();
        assert_eq!(rig.position, CAMERA_PATH[3].position);
    }

    #[test]
    fn concurrent_transition_requests_are_rejected() {
        let mut ctl = controller();
        assert!(ctl.transition_to_zone(2, 1.0, None));
        assert!(!ctl.transition_to_zone(4, 1.0, None));
        for _ in 0..20 {
            ctl.tick(0.1);
        }
        assert_eq!(ctl.current_zone_index(), 2);
    }

    #[test]
    fn out_of_range_zone_is_rejected() {
        let mut ctl = controller();
        assert!(!ctl.transition_to_zone(CAMERA_PATH.len(), 1.0, None));
        assert!(!ctl.is_in_transition());
    }

    #[test]
    fn ndc_center_ray_points_at_target() {
        let rig = CameraRig {
            position: DVec3::new(0.0, 0.0, 10.0),
            target: DVec3::ZERO,
            ..CameraRig::default()
        };
        let ray = rig.ray_from_ndc(0.0, 0.0, 16.0 / 9.0);
        assert!((ray.direction - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
    }

    #[test]
    fn projection_of_target_is_screen_center() {
        let rig = CameraRig {
            position: DVec3::new(0.0, 0.0, 10.0),
            target: DVec3::ZERO,
            ..CameraRig::default()
        };
        let (x, y) = rig.project_to_screen(DVec3::ZERO, 800.0, 600.0).unwrap();
        assert!((x - 400.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let rig = CameraRig {
            position: DVec3::new(0.0, 0.0, 10.0),
            target: DVec3::ZERO,
            ..CameraRig::default()
        };
        assert!(rig.project_to_screen(DVec3::new(0.0, 0.0, 20.0), 800.0, 600.0).is_none());
    }
}
