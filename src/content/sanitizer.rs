//! Free-text sanitization. Content files are authored data, not user input,
//! but they can be hot-swapped from remote JSON, so every string that
//! reaches the DOM is stripped of active markup first.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::content::types::{EngineeringNarrative, PortfolioContent, ProjectData};

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap())
}

fn iframe_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe>|<iframe\b[^>]*/?>").unwrap())
}

/// Inline event handlers, quoted or bare: onclick="..." / onload=foo().
fn handler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
    })
}

/// Tags that can pull in or execute content regardless of attributes.
fn denylist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)</?(object|embed|link|meta|style)\b[^>]*>").unwrap())
}

/// Strip active markup from one string. Plain text and inert formatting
/// tags pass through unchanged.
pub fn sanitize_string(input: &str) -> String {
    let mut out: Cow<str> = Cow::Borrowed(input);
    for re in [script_re(), iframe_re(), handler_re(), denylist_re()] {
        if re.is_match(&out) {
            out = Cow::Owned(re.replace_all(&out, "").into_owned());
        }
    }
    if out != input {
        log::warn!("sanitizer removed active markup from content string");
    }
    out.into_owned()
}

fn sanitize_vec(strings: &mut [String]) {
    for s in strings.iter_mut() {
        *s = sanitize_string(s);
    }
}

fn sanitize_narrative(story: &mut EngineeringNarrative) {
    story.problem_statement = sanitize_string(&story.problem_statement);
    story.solution_approach = sanitize_string(&story.solution_approach);
    story.results_and_impact = sanitize_string(&story.results_and_impact);
    sanitize_vec(&mut story.technical_challenges);
    sanitize_vec(&mut story.lessons_learned);
}

fn sanitize_project(project: &mut ProjectData) {
    project.title = sanitize_string(&project.title);
    project.description = sanitize_string(&project.description);
    if let Some(story) = &mut project.engineering_story {
        sanitize_narrative(story);
    }
    for decision in &mut project.design_decisions {
        decision.decision = sanitize_string(&decision.decision);
        decision.rationale = sanitize_string(&decision.rationale);
        sanitize_vec(&mut decision.alternatives_considered);
    }
    for tradeoff in &mut project.tradeoffs {
        tradeoff.chosen = sanitize_string(&tradeoff.chosen);
        tradeoff.sacrificed = sanitize_string(&tradeoff.sacrificed);
        tradeoff.context = sanitize_string(&tradeoff.context);
    }
}

/// Sanitize every free-text field in place. Ids, urls and other structured
/// fields are the validator's business, not the sanitizer's.
pub fn sanitize_content(content: &mut PortfolioContent) {
    if let Some(info) = &mut content.personal_info {
        info.name = sanitize_string(&info.name);
        info.title = sanitize_string(&info.title);
        info.summary = sanitize_string(&info.summary);
        info.location = sanitize_string(&info.location);
    }
    for project in &mut content.projects {
        sanitize_project(project);
    }
    for exp in &mut content.experience {
        exp.company = sanitize_string(&exp.company);
        exp.role = sanitize_string(&exp.role);
        sanitize_vec(&mut exp.highlights);
    }
    for research in &mut content.research_showcase {
        research.title = sanitize_string(&research.title);
        research.summary = sanitize_string(&research.summary);
    }
}
