//! Built-in content used until a remote content file is wired up, and by
//! tests that need a realistic, valid payload.

use crate::content::types::{
    CertificationData, DesignDecision, EngineeringNarrative, ExperienceData, PersonalInfo,
    PortfolioContent, ProjectData, ResearchData, SkillNode, ThemeConfig, Tradeoff,
};

pub fn sample_content() -> PortfolioContent {
    PortfolioContent {
        personal_info: Some(PersonalInfo {
            name: "Alex Moreau".into(),
            title: "Senior Software Engineer".into(),
            summary: "Backend and systems engineer with a focus on payment \
                      infrastructure and real-time simulation."
                .into(),
            email: "alex.moreau@example.com".into(),
            location: "Lyon, France".into(),
            linkedin: Some("https://www.linkedin.com/in/alex-moreau-example".into()),
            github: Some("https://github.com/amoreau-example".into()),
        }),
        projects: vec![
            ProjectData {
                id: "ecommerce-platform".into(),
                title: "Ecommerce Platform".into(),
                domain: "ecommerce".into(),
                description: "Headless commerce backend handling 40k orders a day.".into(),
                theme: Some(ThemeConfig {
                    primary_color: "#1f6f54".into(),
                    secondary_color: "#d9a441".into(),
                    ambient_sound: None,
                }),
                engineering_story: Some(EngineeringNarrative {
                    problem_statement: "Checkout latency spiked during flash sales, \
                                        dropping conversion by double digits."
                        .into(),
                    solution_approach: "Split the monolith's order path into an \
                                        event-sourced pipeline with idempotent writes."
                        .into(),
                    technical_challenges: vec![
                        "Exactly-once semantics across payment retries".into(),
                        "Zero-downtime migration of the order store".into(),
                    ],
                    results_and_impact: "p99 checkout latency fell from 2.1s to 180ms."
                        .into(),
                    lessons_learned: vec![
                        "Backpressure has to be designed in, not bolted on".into(),
                    ],
                }),
                tech_stack: vec!["rust".into(), "postgresql".into(), "kafka".into()],
                design_decisions: vec![DesignDecision {
                    decision: "Event sourcing for the order lifecycle".into(),
                    rationale: "Auditability and replay were hard requirements.".into(),
                    alternatives_considered: vec!["CRUD with an audit table".into()],
                }],
                tradeoffs: vec![Tradeoff {
                    chosen: "Eventual consistency for inventory counts".into(),
                    sacrificed: "Strict real-time stock accuracy".into(),
                    context: "Overselling is recoverable; slow checkouts are not.".into(),
                }],
                portal_model: Some("/models/portal-ecommerce.glb".into()),
            },
            ProjectData {
                id: "fraud-scoring-engine".into(),
                title: "Fraud Scoring Engine".into(),
                domain: "fintech".into(),
                description: "Streaming risk scoring for card transactions.".into(),
                theme: None,
                engineering_story: None,
                tech_stack: vec!["rust".into(), "redis".into()],
                design_decisions: Vec::new(),
                tradeoffs: Vec::new(),
                portal_model: Some("/models/portal-fintech.glb".into()),
            },
            ProjectData {
                id: "voxel-sim".into(),
                title: "Voxel Physics Sandbox".into(),
                domain: "gaming".into(),
                description: "Browser voxel sandbox with deterministic physics.".into(),
                theme: None,
                engineering_story: None,
                tech_stack: vec!["rust".into(), "webassembly".into(), "webgl".into()],
                design_decisions: Vec::new(),
                tradeoffs: Vec::new(),
                portal_model: None,
            },
        ],
        skills: vec![
            SkillNode {
                technology: "Rust".into(),
                category: "backend".into(),
                proficiency_level: 0.95,
                projects_used: vec!["ecommerce-platform".into(), "voxel-sim".into()],
                dependencies: Vec::new(),
            },
            SkillNode {
                technology: "PostgreSQL".into(),
                category: "database".into(),
                proficiency_level: 0.85,
                projects_used: vec!["ecommerce-platform".into()],
                dependencies: Vec::new(),
            },
            SkillNode {
                technology: "WebGL".into(),
                category: "frontend".into(),
                proficiency_level: 0.7,
                projects_used: vec!["voxel-sim".into()],
                dependencies: vec!["Rust".into()],
            },
            SkillNode {
                technology: "Kubernetes".into(),
                category: "cloud".into(),
                proficiency_level: 0.6,
                projects_used: Vec::new(),
                dependencies: Vec::new(),
            },
        ],
        experience: vec![
            ExperienceData {
                company: "Meridian Payments".into(),
                role: "Senior Software Engineer".into(),
                period: "2021 - present".into(),
                highlights: vec![
                    "Led the checkout re-architecture serving 40k orders/day".into(),
                    "Cut infrastructure spend 30% by consolidating stream processors".into(),
                ],
            },
            ExperienceData {
                company: "Helio Games".into(),
                role: "Gameplay Engineer".into(),
                period: "2018 - 2021".into(),
                highlights: vec!["Shipped deterministic lockstep netcode".into()],
            },
        ],
        certifications: vec![CertificationData {
            name: "CKA: Certified Kubernetes Administrator".into(),
            issuer: "CNCF".into(),
            year: 2023,
            credential_url: Some("https://www.credly.com/badges/example".into()),
        }],
        research_showcase: vec![ResearchData {
            title: "Deterministic Replay of Distributed Order Pipelines".into(),
            summary: "Technique for bit-exact replay of event-sourced systems.".into(),
            publication_url: None,
            year: Some(2024),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_serializes_and_roundtrips() {
        let content = sample_content();
        let json = serde_json::to_string(&content).unwrap();
        let back: PortfolioContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn sample_references_are_consistent() {
        let content = sample_content();
        let ids: Vec<&str> = content.projects.iter().map(|p| p.id.as_str()).collect();
        for skill in &content.skills {
            for used in &skill.projects_used {
                assert!(ids.contains(&used.as_str()), "unknown project {used}");
            }
        }
    }
}
