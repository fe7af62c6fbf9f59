//! Content lifecycle: parse, validate, sanitize, cache, and hot-swap
//! sections at runtime. Validation is advisory on full loads; only section
//! hot-swaps fail closed.

use serde_json::Value;
use thiserror::Error;

use crate::content::cache::{CacheConfig, ContentCache};
use crate::content::sample::sample_content;
use crate::content::sanitizer::sanitize_content;
use crate::content::types::{PortfolioContent, ProjectData};
use crate::content::validator::{validate_content, ValidationResult};
use crate::observer::{Subscribers, Subscription};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("content failed validation ({} problem(s))", .0.errors.len())]
    Invalid(ValidationResult),
    #[error("unknown content section: {0}")]
    UnknownSection(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContentUpdate {
    pub section: String,
    pub version: u64,
}

pub const SECTIONS: [&str; 6] = [
    "personalInfo",
    "projects",
    "skills",
    "experience",
    "certifications",
    "researchShowcase",
];

/// Owns the live `PortfolioContent` and the pipeline every payload passes
/// through before it can be rendered.
pub struct ContentManager {
    content: PortfolioContent,
    cache: ContentCache<PortfolioContent>,
    /// Cache key the live content came from, if any.
    active_key: Option<String>,
    version: u64,
    subscribers: Subscribers<ContentUpdate>,
}

impl Default for ContentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentManager {
    pub fn new() -> Self {
        Self {
            content: PortfolioContent::default(),
            cache: ContentCache::new(CacheConfig::default()),
            active_key: None,
            version: 0,
            subscribers: Subscribers::new(),
        }
    }

    /// Load the built-in content. Infallible by construction; still runs
    /// the full pipeline so the sample stays honest.
    pub fn load_builtin(&mut self) -> ValidationResult {
        let mut content = sample_content();
        let validation = validate_content(&content);
        sanitize_content(&mut content);
        self.commit(content, "builtin");
        validation
    }

    /// Parse and install a full content payload. The cache short-circuits
    /// repeat loads of the same key. Validation is advisory here: problems
    /// are reported to the caller and logged, but a parseable payload always
    /// loads. Only malformed JSON is an error.
    pub fn load_content(&mut self, key: &str, json: &str) -> Result<ValidationResult, ContentError> {
        if let Some(cached) = self.cache.get(key) {
            log::debug!("content cache hit: {key}");
            self.active_key = Some(key.to_string());
            self.commit(cached, key);
            return Ok(ValidationResult::default());
        }

        let mut content: PortfolioContent = serde_json::from_str(json)?;
        let validation = validate_content(&content);
        if !validation.is_valid() {
            log::warn!(
                "content {key} has {} validation problem(s); loading anyway",
                validation.errors.len()
            );
        }
        sanitize_content(&mut content);
        self.cache.insert(key, content.clone());
        self.active_key = Some(key.to_string());
        self.commit(content, key);
        Ok(validation)
    }

    fn commit(&mut self, content: PortfolioContent, section: &str) {
        self.content = content;
        self.version += 1;
        self.subscribers.notify(&ContentUpdate {
            section: section.to_string(),
            version: self.version,
        });
    }

    pub fn content(&self) -> &PortfolioContent {
        &self.content
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn project(&self, id: &str) -> Option<&ProjectData> {
        self.content.projects.iter().find(|p| p.id == id)
    }

    /// Replace one section from a raw JSON value. Fail-closed: the update
    /// is applied to a copy, revalidated as a whole, and only a valid
    /// result is committed and announced.
    pub fn update_section(&mut self, section: &str, value: Value) -> Result<(), ContentError> {
        let mut candidate = self.content.clone();
        match section {
            "personalInfo" => candidate.personal_info = serde_json::from_value(value)?,
            "projects" => candidate.projects = serde_json::from_value(value)?,
            "skills" => candidate.skills = serde_json::from_value(value)?,
            "experience" => candidate.experience = serde_json::from_value(value)?,
            "certifications" => candidate.certifications = serde_json::from_value(value)?,
            "researchShowcase" => candidate.research_showcase = serde_json::from_value(value)?,
            other => return Err(ContentError::UnknownSection(other.to_string())),
        }

        let validation = validate_content(&candidate);
        if !validation.is_valid() {
            log::warn!("rejected hot update of {section}: content would be invalid");
            return Err(ContentError::Invalid(validation));
        }
        sanitize_content(&mut candidate);
        // The cached copy of the live content is now stale; other keys
        // stay valid.
        if let Some(key) = self.active_key.clone() {
            self.cache.invalidate(&key);
        }
        self.commit(candidate, section);
        log::info!("content section {section} hot-swapped (v{})", self.version);
        Ok(())
    }

    /// Observe hot swaps of one section. `"*"` observes everything.
    pub fn on_hot_reload(
        &mut self,
        section: &str,
        callback: impl Fn(&ContentUpdate) + 'static,
    ) -> Subscription<ContentUpdate> {
        let filter = section.to_string();
        self.subscribers.subscribe(move |update: &ContentUpdate| {
            if filter == "*" || update.section == filter {
                callback(update);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn loaded() -> ContentManager {
        let mut mgr = ContentManager::new();
        let validation = mgr.load_builtin();
        assert!(validation.is_valid());
        mgr
    }

    #[test]
    fn builtin_load_populates_content() {
        let mgr = loaded();
        assert!(!mgr.content().projects.is_empty());
        assert!(mgr.project("ecommerce-platform").is_some());
        assert_eq!(mgr.version(), 1);
    }

    #[test]
    fn invalid_payload_still_loads_and_reports_errors() {
        let mut mgr = loaded();
        let before = mgr.version();
        let payload = r#"{"projects":[{"id":"odd-one","title":"x","domain":"catering"}]}"#;
        let validation = mgr.load_content("remote", payload).unwrap();
        assert!(!validation.is_valid());
        assert!(validation
            .errors
            .iter()
            .any(|e| e.field == "projects[0].domain"));
        // Advisory: the content is committed regardless.
        assert_eq!(mgr.version(), before + 1);
        assert!(mgr.project("odd-one").is_some());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut mgr = loaded();
        assert!(matches!(
            mgr.load_content("remote", "{not json"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn valid_payload_is_sanitized_before_commit() {
        let mut mgr = ContentManager::new();
        let payload = json!({
            "projects": [{
                "id": "clean-me",
                "title": "Title<script>alert(1)</script>",
                "domain": "saas"
            }]
        })
        .to_string();
        mgr.load_content("remote", &payload).unwrap();
        assert_eq!(mgr.project("clean-me").unwrap().title, "Title");
    }

    #[test]
    fn section_update_fails_closed() {
        let mut mgr = loaded();
        let before = mgr.content().skills.clone();
        let err = mgr
            .update_section(
                "skills",
                json!([{ "technology": "X", "category": "bogus", "proficiencyLevel": 2.0 }]),
            )
            .unwrap_err();
        assert!(matches!(err, ContentError::Invalid(_)));
        assert_eq!(mgr.content().skills, before);
    }

    #[test]
    fn section_update_commits_and_notifies_matching_subscribers() {
        let mut mgr = loaded();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let all = Rc::new(RefCell::new(Vec::new()));
        let s1 = seen.clone();
        let s2 = all.clone();
        let _skills_sub = mgr.on_hot_reload("skills", move |u| {
            s1.borrow_mut().push(u.section.clone());
        });
        let _any_sub = mgr.on_hot_reload("*", move |u| {
            s2.borrow_mut().push(u.section.clone());
        });

        mgr.update_section(
            "skills",
            json!([{ "technology": "Go", "category": "backend", "proficiencyLevel": 0.5 }]),
        )
        .unwrap();
        mgr.update_section("experience", json!([])).unwrap();

        assert_eq!(*seen.borrow(), vec!["skills"]);
        assert_eq!(*all.borrow(), vec!["skills", "experience"]);
        assert_eq!(mgr.content().skills.len(), 1);
        assert!(mgr.content().experience.is_empty());
    }

    #[test]
    fn unknown_section_is_rejected() {
        let mut mgr = loaded();
        assert!(matches!(
            mgr.update_section("audio", json!({})),
            Err(ContentError::UnknownSection(_))
        ));
    }

    #[test]
    fn section_update_invalidates_only_the_live_cache_entry() {
        let mut mgr = ContentManager::new();
        let a = json!({ "projects": [{ "id": "a", "title": "A", "domain": "saas" }] }).to_string();
        let b = json!({ "projects": [{ "id": "b", "title": "B", "domain": "saas" }] }).to_string();
        mgr.load_content("a", &a).unwrap();
        mgr.load_content("b", &b).unwrap();

        mgr.update_section("experience", json!([])).unwrap();

        // "a" was untouched by the invalidation and still serves from cache.
        mgr.load_content("a", "{not json").unwrap();
        assert!(mgr.project("a").is_some());
        // "b" backed the live content; its entry is gone and the garbage
        // body now has to parse.
        assert!(matches!(
            mgr.load_content("b", "{not json"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn repeat_load_hits_the_cache() {
        let mut mgr = ContentManager::new();
        let payload = json!({
            "projects": [{ "id": "p", "title": "P", "domain": "saas" }]
        })
        .to_string();
        mgr.load_content("remote", &payload).unwrap();
        let v1 = mgr.version();
        // Same key, garbage body: served from cache, never parsed.
        mgr.load_content("remote", "{definitely not json").unwrap();
        assert_eq!(mgr.version(), v1 + 1);
        assert!(mgr.project("p").is_some());
    }
}
