//! Navigation state machine: application mode, current zone, bounded
//! history, and synchronous pub/sub.

use crate::constants::Zone;
use crate::observer::{Subscribers, Subscription};

const MAX_HISTORY: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationMode {
    Exploration,
    Project,
    Transition,
    Fallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationState {
    pub mode: NavigationMode,
    pub current_zone: Option<Zone>,
    pub previous_zone: Option<Zone>,
    pub active_project: Option<String>,
    pub is_transitioning: bool,
    pub history: Vec<Zone>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            mode: NavigationMode::Exploration,
            current_zone: Some(Zone::EntryPortal),
            previous_zone: None,
            active_project: None,
            is_transitioning: false,
            history: vec![Zone::EntryPortal],
        }
    }
}

/// Sole owner of the session's navigation state. All mutation goes through
/// these methods; every committed change notifies subscribers synchronously
/// with an immutable snapshot.
pub struct NavigationStateManager {
    state: NavigationState,
    subscribers: Subscribers<NavigationState>,
}

impl Default for NavigationStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStateManager {
    pub fn new() -> Self {
        Self {
            state: NavigationState::default(),
            subscribers: Subscribers::new(),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state.clone()
    }

    pub fn subscribe(
        &mut self,
        callback: impl Fn(&NavigationState) + 'static,
    ) -> Subscription<NavigationState> {
        self.subscribers.subscribe(callback)
    }

    fn notify(&self) {
        self.subscribers.notify(&self.state);
    }

    pub fn enter_exploration_mode(&mut self) {
        if self.state.mode == NavigationMode::Exploration {
            return;
        }
        self.state.mode = NavigationMode::Exploration;
        self.state.active_project = None;
        log::debug!("entered exploration mode");
        self.notify();
    }

    pub fn enter_project_mode(&mut self, project_id: &str) {
        if self.state.mode == NavigationMode::Project
            && self.state.active_project.as_deref() == Some(project_id)
        {
            return;
        }
        self.state.mode = NavigationMode::Project;
        self.state.active_project = Some(project_id.to_string());
        log::debug!("entered project mode: {project_id}");
        self.notify();
    }

    pub fn enter_transition_mode(&mut self) {
        if self.state.mode == NavigationMode::Transition {
            return;
        }
        self.state.mode = NavigationMode::Transition;
        self.state.is_transitioning = true;
        self.notify();
    }

    /// Transition mode is always entered from exploration or project mode
    /// and returns to whichever of the two it came from; `active_project`
    /// carries that memory.
    pub fn exit_transition_mode(&mut self) {
        if self.state.mode != NavigationMode::Transition && !self.state.is_transitioning {
            return;
        }
        self.state.is_transitioning = false;
        self.state.mode = if self.state.active_project.is_some() {
            NavigationMode::Project
        } else {
            NavigationMode::Exploration
        };
        self.notify();
    }

    pub fn enter_fallback_mode(&mut self) {
        if self.state.mode == NavigationMode::Fallback {
            return;
        }
        self.state.mode = NavigationMode::Fallback;
        log::info!("entered fallback mode");
        self.notify();
    }

    /// Commit a zone change, appending to the bounded history.
    pub fn navigate_to_zone(&mut self, zone: Zone) {
        if self.state.current_zone == Some(zone) {
            return;
        }
        self.state.previous_zone = self.state.current_zone;
        self.state.current_zone = Some(zone);
        self.state.history.push(zone);
        if self.state.history.len() > MAX_HISTORY {
            self.state.history.remove(0);
        }
        log::debug!("navigated to zone: {}", zone.slug());
        self.notify();
    }

    /// Undo the last `navigate_to_zone`. Fails when there is nothing to
    /// undo; that is an expected outcome, not an error.
    pub fn go_back(&mut self) -> bool {
        if self.state.history.len() <= 1 {
            log::warn!("go_back ignored: no previous zone in history");
            return false;
        }
        self.state.history.pop();
        let previous = self.state.history.last().copied();
        self.state.previous_zone = self.state.current_zone;
        self.state.current_zone = previous;
        self.notify();
        true
    }

    /// No redo stack is maintained; forward navigation never succeeds.
    pub fn go_forward(&mut self) -> bool {
        log::warn!("go_forward ignored: forward history is not tracked");
        false
    }

    pub fn clear_history(&mut self) {
        self.state.history = match self.state.current_zone {
            Some(zone) => vec![zone],
            None => Vec::new(),
        };
        self.notify();
    }

    pub fn can_go_back(&self) -> bool {
        self.state.history.len() > 1
    }

    pub fn history(&self) -> Vec<Zone> {
        self.state.history.clone()
    }

    pub fn current_mode(&self) -> NavigationMode {
        self.state.mode
    }

    pub fn current_zone(&self) -> Option<Zone> {
        self.state.current_zone
    }

    pub fn active_project(&self) -> Option<String> {
        self.state.active_project.clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning
    }

    pub fn reset(&mut self) {
        self.state = NavigationState::default();
        self.notify();
    }
}
