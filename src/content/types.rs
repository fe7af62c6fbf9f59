//! Portfolio content model. Everything is serde-backed so content can be
//! fetched as JSON, hot-swapped at runtime, and rendered by the fallback
//! views without touching the 3D layer.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioContent {
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub projects: Vec<ProjectData>,
    #[serde(default)]
    pub skills: Vec<SkillNode>,
    #[serde(default)]
    pub experience: Vec<ExperienceData>,
    #[serde(default)]
    pub certifications: Vec<CertificationData>,
    #[serde(default)]
    pub research_showcase: Vec<ResearchData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    /// Stable slug; portals reference projects by this id.
    pub id: String,
    pub title: String,
    /// One of the closed domain list checked by the validator; kept as a
    /// string so unknown values survive deserialization and fail validation
    /// instead of failing parse.
    pub domain: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub theme: Option<ThemeConfig>,
    #[serde(default)]
    pub engineering_story: Option<EngineeringNarrative>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub design_decisions: Vec<DesignDecision>,
    #[serde(default)]
    pub tradeoffs: Vec<Tradeoff>,
    /// Asset url for the portal's 3D model.
    #[serde(default)]
    pub portal_model: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default)]
    pub ambient_sound: Option<String>,
}

/// The long-form story a project interior tells, section by section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeringNarrative {
    pub problem_statement: String,
    pub solution_approach: String,
    #[serde(default)]
    pub technical_challenges: Vec<String>,
    #[serde(default)]
    pub results_and_impact: String,
    #[serde(default)]
    pub lessons_learned: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDecision {
    pub decision: String,
    pub rationale: String,
    #[serde(default)]
    pub alternatives_considered: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tradeoff {
    pub chosen: String,
    pub sacrificed: String,
    pub context: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    pub technology: String,
    /// Closed category list, validated not parsed (see `domain`).
    pub category: String,
    /// 0.0 to 1.0.
    pub proficiency_level: f64,
    #[serde(default)]
    pub projects_used: Vec<String>,
    /// Names of other skills this one builds on. Resolved by name lookup;
    /// a name with no matching node renders as a leaf.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceData {
    pub company: String,
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationData {
    pub name: String,
    pub issuer: String,
    pub year: u32,
    #[serde(default)]
    pub credential_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchData {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub publication_url: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
}

/// Resolve a skill's dependencies against the full skill list by technology
/// name. Unknown names are dropped.
pub fn resolve_skill_dependencies<'a>(
    skill: &SkillNode,
    all: &'a [SkillNode],
) -> Vec<&'a SkillNode> {
    skill
        .dependencies
        .iter()
        .filter_map(|name| all.iter().find(|s| s.technology == *name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_roundtrips_camel_case_json() {
        let json = r#"{
            "personalInfo": {
                "name": "Ada",
                "title": "Engineer",
                "email": "ada@example.com"
            },
            "projects": [{
                "id": "ecommerce-platform",
                "title": "Shop",
                "domain": "ecommerce",
                "techStack": ["rust"]
            }],
            "skills": [{
                "technology": "Rust",
                "category": "backend",
                "proficiencyLevel": 0.9
            }]
        }"#;
        let content: PortfolioContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.projects[0].id, "ecommerce-platform");
        assert_eq!(content.projects[0].tech_stack, vec!["rust"]);
        assert_eq!(content.skills[0].proficiency_level, 0.9);
        assert!(content.experience.is_empty());
    }

    #[test]
    fn skill_dependencies_resolve_by_name() {
        let skills = vec![
            SkillNode {
                technology: "Rust".into(),
                category: "backend".into(),
                proficiency_level: 0.9,
                ..SkillNode::default()
            },
            SkillNode {
                technology: "Actix".into(),
                category: "backend".into(),
                proficiency_level: 0.7,
                dependencies: vec!["Rust".into(), "Nonexistent".into()],
                ..SkillNode::default()
            },
        ];
        let deps = resolve_skill_dependencies(&skills[1], &skills);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].technology, "Rust");
    }
}
