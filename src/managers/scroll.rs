//! Scroll input integrator.
//!
//! Wheel, touch-drag and keyboard deltas all accumulate into a single
//! `target_progress` attractor; a per-frame step moves `progress` toward it
//! with exponential smoothing. The DOM listeners live in the world view and
//! feed the `handle_*` methods here.

use std::rc::Rc;

use crate::constants::{interaction, scrolling};
use crate::math;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    None,
}

/// Per-frame scroll sample handed to the frame callback.
#[derive(Clone, Copy, Debug)]
pub struct ScrollFrame {
    pub progress: f64,
    pub delta: f64,
    pub direction: ScrollDirection,
    pub velocity: f64,
}

pub struct ScrollManager {
    progress: f64,
    target_progress: f64,
    velocity: f64,
    last_delta: f64,
    smoothing: f64,
    sensitivity: f64,
    touch_sensitivity: f64,
    touch_start_y: f64,
    active: bool,
    on_scroll: Option<Rc<dyn Fn(ScrollFrame)>>,
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            target_progress: 0.0,
            velocity: 0.0,
            last_delta: 0.0,
            smoothing: scrolling::SMOOTHING,
            sensitivity: interaction::SCROLL_SENSITIVITY,
            touch_sensitivity: interaction::TOUCH_SENSITIVITY,
            touch_start_y: 0.0,
            active: false,
            on_scroll: None,
        }
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn set_on_scroll(&mut self, callback: impl Fn(ScrollFrame) + 'static) {
        self.on_scroll = Some(Rc::new(callback));
    }

    /// Idempotent: starting twice is a no-op.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        log::debug!("scroll manager started");
    }

    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        log::debug!("scroll manager stopped");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn target_progress(&self) -> f64 {
        self.target_progress
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Jump both progress values, bypassing smoothing.
    pub fn set_progress(&mut self, progress: f64) {
        self.target_progress = math::clamp01(progress);
        self.progress = self.target_progress;
    }

    fn add_delta(&mut self, delta: f64) {
        self.target_progress = math::clamp01(self.target_progress + delta);
        self.last_delta = delta;
    }

    pub fn handle_wheel(&mut self, delta_y: f64) {
        if !self.active {
            return;
        }
        self.add_delta(delta_y * self.sensitivity);
    }

    pub fn handle_touch_start(&mut self, client_y: f64) {
        if !self.active {
            return;
        }
        self.touch_start_y = client_y;
    }

    pub fn handle_touch_move(&mut self, client_y: f64) {
        if !self.active {
            return;
        }
        let delta = (self.touch_start_y - client_y) * self.touch_sensitivity;
        self.add_delta(delta);
        self.touch_start_y = client_y;
    }

    /// Keyboard navigation. Returns true when the key was consumed so the
    /// caller can prevent the browser default.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if !self.active {
            return false;
        }
        match key {
            "ArrowDown" | "PageDown" => {
                self.add_delta(scrolling::KEY_STEP);
                true
            }
            "ArrowUp" | "PageUp" => {
                self.add_delta(-scrolling::KEY_STEP);
                true
            }
            "Home" => {
                self.set_progress(0.0);
                true
            }
            "End" => {
                self.set_progress(1.0);
                true
            }
            _ => false,
        }
    }

    /// One animation-frame step: chase the target, snap inside epsilon,
    /// decay the direction signal, and emit the frame sample.
    pub fn step(&mut self) -> Option<ScrollFrame> {
        if !self.active {
            return None;
        }
        let diff = self.target_progress - self.progress;
        self.velocity = diff * self.smoothing;
        if diff.abs() < scrolling::EPSILON {
            self.progress = self.target_progress;
            self.velocity = 0.0;
        } else {
            self.progress += self.velocity;
        }

        let direction = if self.last_delta > 0.0 {
            ScrollDirection::Down
        } else if self.last_delta < 0.0 {
            ScrollDirection::Up
        } else {
            ScrollDirection::None
        };

        let frame = ScrollFrame {
            progress: self.progress,
            delta: self.last_delta,
            direction,
            velocity: self.velocity,
        };
        if let Some(cb) = &self.on_scroll {
            cb(frame);
        }
        self.last_delta *= scrolling::DELTA_DECAY;
        // Multiplicative decay alone never reaches zero; snap it so the
        // direction report releases once input stops.
        if self.last_delta.abs() < scrolling::EPSILON {
            self.last_delta = 0.0;
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> ScrollManager {
        let mut m = ScrollManager::new();
        m.start();
        m
    }

    #[test]
    fn start_stop_are_idempotent() {
        let mut m = ScrollManager::new();
        m.start();
        m.start();
        assert!(m.is_active());
        m.stop();
        m.stop();
        assert!(!m.is_active());
    }

    #[test]
    fn inactive_manager_ignores_input_and_frames() {
        let mut m = ScrollManager::new();
        m.handle_wheel(500.0);
        assert_eq!(m.target_progress(), 0.0);
        assert!(m.step().is_none());
    }

    #[test]
    fn sustained_downward_input_is_monotonic_and_clamped() {
        let mut m = started();
        let mut prev_target = 0.0;
        for _ in 0..2000 {
            m.handle_wheel(120.0);
            assert!(m.target_progress() >= prev_target);
            assert!(m.target_progress() <= 1.0);
            prev_target = m.target_progress();
        }
        assert_eq!(m.target_progress(), 1.0);
    }

    #[test]
    fn progress_converges_to_target_in_bounded_frames() {
        let mut m = started();
        m.handle_wheel(500.0); // target = 0.5
        let target = m.target_progress();
        for _ in 0..200 {
            m.step();
        }
        assert_eq!(m.progress(), target);
        assert_eq!(m.velocity(), 0.0);
    }

    #[test]
    fn snap_prevents_asymptotic_creep() {
        let mut m = started();
        m.handle_wheel(1.0); // tiny target just above zero
        for _ in 0..200 {
            m.step();
        }
        assert_eq!(m.progress(), m.target_progress());
    }

    #[test]
    fn direction_follows_last_delta_and_decays_to_none() {
        let mut m = started();
        m.handle_wheel(100.0);
        let frame = m.step().unwrap();
        assert_eq!(frame.direction, ScrollDirection::Down);

        m.handle_wheel(-100.0);
        let frame = m.step().unwrap();
        assert_eq!(frame.direction, ScrollDirection::Up);

        // The decayed delta snaps to zero once it falls inside epsilon, so
        // the direction must release in bounded frames.
        let mut frame = m.step().unwrap();
        for _ in 0..200 {
            frame = m.step().unwrap();
            if frame.direction == ScrollDirection::None {
                break;
            }
        }
        assert_eq!(frame.direction, ScrollDirection::None);
        assert_eq!(m.step().unwrap().delta, 0.0);
    }

    #[test]
    fn touch_start_is_ignored_while_inactive() {
        let mut m = ScrollManager::new();
        m.handle_touch_start(300.0);
        m.start();
        // No gesture origin was recorded, so this move measures from the
        // default origin and the negative delta clamps at zero.
        m.handle_touch_move(250.0);
        assert_eq!(m.target_progress(), 0.0);
    }

    #[test]
    fn touch_drag_tracks_previous_y_per_gesture() {
        let mut m = started();
        m.handle_touch_start(300.0);
        m.handle_touch_move(280.0); // finger up => scroll down
        assert!(m.target_progress() > 0.0);
        let after_first = m.target_progress();
        m.handle_touch_move(280.0); // no movement, no delta
        assert_eq!(m.target_progress(), after_first);
    }

    #[test]
    fn keyboard_steps_and_home_end_jumps() {
        let mut m = started();
        assert!(m.handle_key("ArrowDown"));
        assert!((m.target_progress() - 0.05).abs() < 1e-12);
        assert!(m.handle_key("PageDown"));
        assert!((m.target_progress() - 0.10).abs() < 1e-12);
        assert!(m.handle_key("ArrowUp"));
        assert!((m.target_progress() - 0.05).abs() < 1e-12);

        assert!(m.handle_key("End"));
        assert_eq!(m.progress(), 1.0); // bypasses smoothing
        assert!(m.handle_key("Home"));
        assert_eq!(m.progress(), 0.0);

        assert!(!m.handle_key("Space"));
    }

    #[test]
    fn set_progress_clamps() {
        let mut m = started();
        m.set_progress(2.5);
        assert_eq!(m.progress(), 1.0);
        m.set_progress(-1.0);
        assert_eq!(m.progress(), 0.0);
    }

    #[test]
    fn frame_callback_receives_samples() {
        use std::cell::RefCell;
        let samples = Rc::new(RefCell::new(Vec::new()));
        let sink = samples.clone();
        let mut m = started();
        m.set_on_scroll(move |frame| sink.borrow_mut().push(frame.progress));
        m.handle_wheel(300.0);
        m.step();
        m.step();
        assert_eq!(samples.borrow().len(), 2);
    }
}
