//! Tick-driven camera pose tweens.
//!
//! Cinematic motion (zone jumps, portal entry/exit) runs through these
//! explicit tasks instead of promise-style animation timelines: busy-ness is
//! a synchronously queryable guard, and a new request while a tween runs is
//! rejected by the caller, never preempted.

use glam::DVec3;

use crate::math;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
    SmoothStep,
    Power2InOut,
}

impl Ease {
    fn apply(self, t: f64) -> f64 {
        match self {
            Ease::Linear => math::clamp01(t),
            Ease::SmoothStep => math::smoothstep(t),
            Ease::Power2InOut => math::power2_in_out(t),
        }
    }
}

/// A time-bounded interpolation of a camera pose (position + look target).
#[derive(Clone, Copy, Debug)]
pub struct PoseTween {
    pub from_position: DVec3,
    pub to_position: DVec3,
    pub from_target: DVec3,
    pub to_target: DVec3,
    /// Seconds; non-positive durations complete on the first tick.
    pub duration: f64,
    pub ease: Ease,
    elapsed: f64,
}

impl PoseTween {
    pub fn new(
        from_position: DVec3,
        to_position: DVec3,
        from_target: DVec3,
        to_target: DVec3,
        duration: f64,
        ease: Ease,
    ) -> Self {
        Self {
            from_position,
            to_position,
            from_target,
            to_target,
            duration,
            ease,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns true once the tween has finished.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed += dt.max(0.0);
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    /// Current interpolated (position, target).
    pub fn sample(&self) -> (DVec3, DVec3) {
        let raw = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };
        let t = self.ease.apply(raw);
        (
            math::lerp_vec(self.from_position, self.to_position, t),
            math::lerp_vec(self.from_target, self.to_target, t),
        )
    }

    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            math::clamp01(self.elapsed / self.duration)
        }
    }
}

type UpdateFn = Box<dyn FnMut(DVec3, DVec3)>;
type CompleteFn = Box<dyn FnOnce()>;

struct ActiveTween {
    tween: PoseTween,
    on_update: UpdateFn,
    on_complete: Option<CompleteFn>,
}

/// Holds at most one running tween and drives it from the frame loop.
#[derive(Default)]
pub struct TweenRunner {
    active: Option<ActiveTween>,
}

impl TweenRunner {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Start a tween. Rejected (returns false) while another tween runs.
    pub fn start(
        &mut self,
        tween: PoseTween,
        on_update: impl FnMut(DVec3, DVec3) + 'static,
        on_complete: Option<CompleteFn>,
    ) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveTween {
            tween,
            on_update: Box::new(on_update),
            on_complete,
        });
        true
    }

    /// Advance the running tween, firing its update callback with the new
    /// pose. Returns true exactly on the tick the tween completes, after the
    /// final (endpoint-exact) update and the completion callback ran.
    pub fn tick(&mut self, dt: f64) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let done = active.tween.advance(dt);
        if done {
            // Clamp to the exact endpoints before reporting.
            let (pos, target) = (active.tween.to_position, active.tween.to_target);
            (active.on_update)(pos, target);
            if let Some(mut finished) = self.active.take() {
                if let Some(on_complete) = finished.on_complete.take() {
                    on_complete();
                }
            }
            true
        } else {
            let (pos, target) = active.tween.sample();
            (active.on_update)(pos, target);
            false
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
