pub mod assets;
pub mod interaction;
pub mod navigation;
pub mod portal;
pub mod scroll;

pub use assets::{AssetCache, AssetError, AssetManager, LoadConfig, LoadPriority};
pub use interaction::{GlobalCallbacks, InteractionCallbacks, InteractionManager};
pub use navigation::{NavigationMode, NavigationState, NavigationStateManager};
pub use portal::{PortalConfig, PortalManager, PortalState};
pub use scroll::{ScrollDirection, ScrollFrame, ScrollManager};
