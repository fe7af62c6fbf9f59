//! Portal registry and the single-session portal state machine.
//!
//! Many portals may be registered, but at most one may be anywhere in the
//! opening/open/closing cycle; entry requests made in any state other than
//! `Closed` are rejected. Transitions never skip a state:
//! closed -> opening -> open -> closing -> closed.

use std::collections::HashMap;

use glam::DVec3;

use crate::observer::{Subscribers, Subscription};
use crate::tween::{Ease, PoseTween, TweenRunner};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Static description of one portal, registered by its visual on mount and
/// removed on unmount. `project_id` is a key into the content records.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalConfig {
    pub id: String,
    pub position: DVec3,
    pub project_id: String,
    /// Camera framing just outside the portal.
    pub entry_point: DVec3,
    /// Camera framing inside the project interior.
    pub exit_point: DVec3,
    /// Seconds for the enter/exit tween.
    pub transition_duration: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortalEvent {
    pub state: PortalState,
    pub portal_id: Option<String>,
}

pub struct PortalManager {
    portals: HashMap<String, PortalConfig>,
    state: PortalState,
    active_portal: Option<String>,
    runner: TweenRunner,
    on_settled: Option<Box<dyn FnOnce()>>,
    subscribers: Subscribers<PortalEvent>,
}

impl Default for PortalManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalManager {
    pub fn new() -> Self {
        Self {
            portals: HashMap::new(),
            state: PortalState::Closed,
            active_portal: None,
            runner: TweenRunner::new(),
            on_settled: None,
            subscribers: Subscribers::new(),
        }
    }

    /// Registration manages the config registry only; it is not a state
    /// transition.
    pub fn register_portal(&mut self, config: PortalConfig) {
        log::debug!("portal registered: {}", config.id);
        self.portals.insert(config.id.clone(), config);
    }

    pub fn unregister_portal(&mut self, id: &str) {
        log::debug!("portal unregistered: {id}");
        self.portals.remove(id);
    }

    pub fn portal(&self, id: &str) -> Option<&PortalConfig> {
        self.portals.get(id)
    }

    pub fn all_portals(&self) -> Vec<PortalConfig> {
        self.portals.values().cloned().collect()
    }

    pub fn state(&self) -> PortalState {
        self.state
    }

    pub fn active_portal(&self) -> Option<&str> {
        self.active_portal.as_deref()
    }

    pub fn is_portal_active(&self, id: &str) -> bool {
        self.active_portal.as_deref() == Some(id) && self.state == PortalState::Open
    }

    pub fn subscribe(
        &mut self,
        callback: impl Fn(&PortalEvent) + 'static,
    ) -> Subscription<PortalEvent> {
        self.subscribers.subscribe(callback)
    }

    fn notify(&self) {
        self.subscribers.notify(&PortalEvent {
            state: self.state,
            portal_id: self.active_portal.clone(),
        });
    }

    /// Begin entering a portal: tween the camera from the supplied pose to
    /// the portal's entry framing, reporting each tick through `on_update`
    /// (the same camera-update contract the camera controller uses).
    /// Rejected unless the machine is `Closed` and the id is known.
    pub fn enter_portal(
        &mut self,
        id: &str,
        from_position: DVec3,
        from_target: DVec3,
        on_update: impl FnMut(DVec3, DVec3) + 'static,
        on_settled: Option<Box<dyn FnOnce()>>,
    ) -> bool {
        let Some(portal) = self.portals.get(id) else {
            log::warn!("enter_portal ignored: unknown portal {id}");
            return false;
        };
        if self.state != PortalState::Closed {
            log::warn!("enter_portal ignored: another portal is active");
            return false;
        }

        let tween = PoseTween::new(
            from_position,
            portal.entry_point,
            from_target,
            portal.position,
            portal.transition_duration,
            Ease::Power2InOut,
        );
        self.state = PortalState::Opening;
        self.active_portal = Some(id.to_string());
        self.on_settled = on_settled;
        self.runner.start(tween, on_update, None);
        log::debug!("entering portal: {id}");
        self.notify();
        true
    }

    /// Mirror operation: tween from the portal framing back to the caller's
    /// return pose. Rejected unless a portal is fully `Open`.
    pub fn exit_portal(
        &mut self,
        return_position: DVec3,
        return_target: DVec3,
        on_update: impl FnMut(DVec3, DVec3) + 'static,
        on_settled: Option<Box<dyn FnOnce()>>,
    ) -> bool {
        if self.state != PortalState::Open {
            log::warn!("exit_portal ignored: no open portal");
            return false;
        }
        let Some(portal) = self
            .active_portal
            .as_ref()
            .and_then(|id| self.portals.get(id))
        else {
            log::warn!("exit_portal ignored: active portal is no longer registered");
            return false;
        };

        let tween = PoseTween::new(
            portal.entry_point,
            return_position,
            portal.position,
            return_target,
            portal.transition_duration,
            Ease::Power2InOut,
        );
        self.state = PortalState::Closing;
        self.on_settled = on_settled;
        self.runner.start(tween, on_update, None);
        log::debug!("exiting portal");
        self.notify();
        true
    }

    /// Advance the running transition; call once per animation frame.
    pub fn tick(&mut self, dt: f64) {
        if !self.runner.tick(dt) {
            return;
        }
        match self.state {
            PortalState::Opening => {
                self.state = PortalState::Open;
                self.notify();
            }
            PortalState::Closing => {
                self.state = PortalState::Closed;
                self.active_portal = None;
                self.notify();
            }
            _ => {}
        }
        if let Some(on_settled) = self.on_settled.take() {
            on_settled();
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.runner.is_busy()
    }

    /// Proximity query against a portal's world position, independent of
    /// the state machine.
    pub fn is_near_portal(&self, position: DVec3, id: &str, threshold: f64) -> bool {
        match self.portals.get(id) {
            Some(portal) => position.distance(portal.position) < threshold,
            None => false,
        }
    }

    pub fn clear_portals(&mut self) {
        self.portals.clear();
        self.active_portal = None;
        self.state = PortalState::Closed;
        self.runner.cancel();
        self.on_settled = None;
        self.notify();
    }
}
