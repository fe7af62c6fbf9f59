use std::cell::RefCell;
use std::rc::Rc;

use crate::content::ContentManager;

pub mod app;
pub mod fallback_view;
pub mod project_overlay;
pub mod recruiter_view;
pub mod scroll_indicator;
pub mod world_view;

/// Content manager handle shared across views. Equality is identity so yew
/// does not re-render on every content tick.
#[derive(Clone)]
pub struct SharedContent(pub Rc<RefCell<ContentManager>>);

impl PartialEq for SharedContent {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl SharedContent {
    pub fn load() -> Self {
        let mut manager = ContentManager::new();
        let validation = manager.load_builtin();
        if !validation.is_valid() {
            log::error!("built-in content failed validation: {:?}", validation.errors);
        }
        Self(Rc::new(RefCell::new(manager)))
    }
}
