//! Structural validation of portfolio content. Validation never mutates:
//! it reports every problem it finds so authors can fix a content file in
//! one pass.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::content::types::{PortfolioContent, ProjectData, SkillNode};

pub const ALLOWED_DOMAINS: [&str; 6] = [
    "ecommerce",
    "fintech",
    "gaming",
    "saas",
    "ai-ml",
    "blockchain",
];

pub const ALLOWED_CATEGORIES: [&str; 6] = [
    "backend",
    "frontend",
    "algorithms",
    "tools",
    "cloud",
    "database",
];

const MAX_NAME_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    /// The offending value, when short enough to be useful in a log line.
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>, value: Option<&str>) {
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
            value: value.map(|v| v.chars().take(80).collect()),
        });
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").unwrap())
}

fn check_url(result: &mut ValidationResult, field: &str, value: &str) {
    match Url::parse(value) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        _ => result.push(field, "must be a valid http(s) url", Some(value)),
    }
}

pub fn validate_project(project: &ProjectData, path: &str, result: &mut ValidationResult) {
    if project.id.is_empty() || !slug_re().is_match(&project.id) {
        result.push(
            format!("{path}.id"),
            "must be a non-empty lowercase slug (a-z, 0-9, -)",
            Some(&project.id),
        );
    }
    if project.title.trim().is_empty() {
        result.push(format!("{path}.title"), "must not be empty", None);
    }
    if !ALLOWED_DOMAINS.contains(&project.domain.as_str()) {
        result.push(
            format!("{path}.domain"),
            format!("must be one of {ALLOWED_DOMAINS:?}"),
            Some(&project.domain),
        );
    }
}

pub fn validate_skill(skill: &SkillNode, path: &str, result: &mut ValidationResult) {
    if skill.technology.trim().is_empty() {
        result.push(format!("{path}.technology"), "must not be empty", None);
    }
    if !ALLOWED_CATEGORIES.contains(&skill.category.as_str()) {
        result.push(
            format!("{path}.category"),
            format!("must be one of {ALLOWED_CATEGORIES:?}"),
            Some(&skill.category),
        );
    }
    if !(0.0..=1.0).contains(&skill.proficiency_level) {
        result.push(
            format!("{path}.proficiencyLevel"),
            "must be between 0.0 and 1.0",
            Some(&skill.proficiency_level.to_string()),
        );
    }
}

/// Validate a whole content payload. Duplicate project ids are reported,
/// since portals key on them.
pub fn validate_content(content: &PortfolioContent) -> ValidationResult {
    let mut result = ValidationResult::default();

    if let Some(info) = &content.personal_info {
        if info.name.trim().is_empty() {
            result.push("personalInfo.name", "must not be empty", None);
        } else if info.name.chars().count() > MAX_NAME_LEN {
            result.push(
                "personalInfo.name",
                format!("must be at most {MAX_NAME_LEN} characters"),
                Some(&info.name),
            );
        }
        if !email_re().is_match(&info.email) {
            result.push("personalInfo.email", "must be a valid email", Some(&info.email));
        }
        if let Some(linkedin) = &info.linkedin {
            check_url(&mut result, "personalInfo.linkedin", linkedin);
        }
        if let Some(github) = &info.github {
            check_url(&mut result, "personalInfo.github", github);
        }
    }

    let mut seen_ids = std::collections::HashSet::new();
    for (i, project) in content.projects.iter().enumerate() {
        let path = format!("projects[{i}]");
        validate_project(project, &path, &mut result);
        if !seen_ids.insert(project.id.as_str()) {
            result.push(format!("{path}.id"), "duplicate project id", Some(&project.id));
        }
    }

    for (i, skill) in content.skills.iter().enumerate() {
        validate_skill(skill, &format!("skills[{i}]"), &mut result);
    }

    for (i, cert) in content.certifications.iter().enumerate() {
        if let Some(url) = &cert.credential_url {
            check_url(&mut result, &format!("certifications[{i}].credentialUrl"), url);
        }
    }
    for (i, research) in content.research_showcase.iter().enumerate() {
        if let Some(url) = &research.publication_url {
            check_url(
                &mut result,
                &format!("researchShowcase[{i}].publicationUrl"),
                url,
            );
        }
    }

    if !result.is_valid() {
        log::warn!("content validation found {} problem(s)", result.errors.len());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::sample::sample_content;
    use crate::content::types::PersonalInfo;

    #[test]
    fn sample_content_is_valid() {
        let result = validate_content(&sample_content());
        assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn bad_email_and_long_name_are_both_reported() {
        let mut content = sample_content();
        content.personal_info = Some(PersonalInfo {
            name: "x".repeat(150),
            title: "t".into(),
            email: "not-an-email".into(),
            ..PersonalInfo::default()
        });
        let result = validate_content(&content);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"personalInfo.name"));
        assert!(fields.contains(&"personalInfo.email"));
    }

    #[test]
    fn unknown_domain_is_rejected() {
        let mut content = sample_content();
        content.projects[0].domain = "catering".into();
        let result = validate_content(&content);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].field, "projects[0].domain");
        assert_eq!(result.errors[0].value.as_deref(), Some("catering"));
    }

    #[test]
    fn uppercase_project_id_is_rejected() {
        let mut content = sample_content();
        content.projects[0].id = "ECommerce_Platform".into();
        assert!(!validate_content(&content).is_valid());
    }

    #[test]
    fn duplicate_project_ids_are_rejected() {
        let mut content = sample_content();
        let copy = content.projects[0].clone();
        content.projects.push(copy);
        let result = validate_content(&content);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message == "duplicate project id"));
    }

    #[test]
    fn proficiency_bounds_are_inclusive() {
        let mut content = sample_content();
        content.skills[0].proficiency_level = 1.0;
        assert!(validate_content(&content).is_valid());
        content.skills[0].proficiency_level = 1.1;
        assert!(!validate_content(&content).is_valid());
        content.skills[0].proficiency_level = -0.1;
        assert!(!validate_content(&content).is_valid());
    }

    #[test]
    fn non_http_profile_url_is_rejected() {
        let mut content = sample_content();
        if let Some(info) = &mut content.personal_info {
            info.github = Some("javascript:alert(1)".into());
        }
        let result = validate_content(&content);
        assert!(result.errors.iter().any(|e| e.field == "personalInfo.github"));
    }
}
