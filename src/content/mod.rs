pub mod cache;
pub mod manager;
pub mod sample;
pub mod sanitizer;
pub mod types;
pub mod validator;

pub use manager::{ContentError, ContentManager, ContentUpdate};
pub use types::{PortfolioContent, ProjectData, SkillNode};
pub use validator::{ValidationError, ValidationResult};
