use yew::prelude::*;

use crate::content::ProjectData;

#[derive(Properties, PartialEq, Clone)]
pub struct ProjectOverlayProps {
    pub project: ProjectData,
    pub on_exit: Callback<()>,
}

fn section_header(text: &str) -> Html {
    html! { <h3 style="color:#58a6ff; margin:18px 0 6px; font-size:15px;">{ text }</h3> }
}

/// Project interior: the engineering story shown while a portal is open.
#[function_component(ProjectOverlay)]
pub fn project_overlay(props: &ProjectOverlayProps) -> Html {
    let project = &props.project;
    let on_exit = {
        let on_exit = props.on_exit.clone();
        Callback::from(move |_: MouseEvent| on_exit.emit(()))
    };
    let accent = project
        .theme
        .as_ref()
        .map(|t| t.primary_color.clone())
        .unwrap_or_else(|| "#1f6f54".to_string());

    html! {
        <div style="position:absolute; inset:0; z-index:6; display:flex; justify-content:center; align-items:center; background:rgba(5,7,12,0.82); font-family:sans-serif;">
            <div style={format!("max-width:720px; max-height:80vh; overflow-y:auto; background:#0e1116; border:1px solid {accent}; border-radius:10px; padding:28px; color:#c9d1d9;")}>
                <div style="display:flex; justify-content:space-between; align-items:baseline;">
                    <h2 style="margin:0; color:#fff;">{ &project.title }</h2>
                    <button
                        onclick={on_exit}
                        style="background:#161b22; color:#c9d1d9; border:1px solid #2f3641; padding:6px 14px; border-radius:6px; cursor:pointer;"
                    >{ "Back to world" }</button>
                </div>
                <p style="color:#8b949e; margin:4px 0 0; font-size:13px;">{ &project.domain }</p>
                <p>{ &project.description }</p>

                if let Some(story) = &project.engineering_story {
                    { section_header("Problem") }
                    <p>{ &story.problem_statement }</p>
                    { section_header("Approach") }
                    <p>{ &story.solution_approach }</p>
                    if !story.technical_challenges.is_empty() {
                        { section_header("Challenges") }
                        <ul>
                            { for story.technical_challenges.iter().map(|c| html!{ <li>{ c }</li> }) }
                        </ul>
                    }
                    if !story.results_and_impact.is_empty() {
                        { section_header("Impact") }
                        <p>{ &story.results_and_impact }</p>
                    }
                    if !story.lessons_learned.is_empty() {
                        { section_header("Lessons") }
                        <ul>
                            { for story.lessons_learned.iter().map(|l| html!{ <li>{ l }</li> }) }
                        </ul>
                    }
                }

                if !project.design_decisions.is_empty() {
                    { section_header("Design decisions") }
                    { for project.design_decisions.iter().map(|d| html! {
                        <p><strong>{ &d.decision }</strong>{ " - " }{ &d.rationale }</p>
                    }) }
                }
                if !project.tradeoffs.is_empty() {
                    { section_header("Tradeoffs") }
                    { for project.tradeoffs.iter().map(|t| html! {
                        <p><strong>{ &t.chosen }</strong>{ " over " }{ &t.sacrificed }{ ": " }{ &t.context }</p>
                    }) }
                }
                if !project.tech_stack.is_empty() {
                    { section_header("Stack") }
                    <p>{ project.tech_stack.join(" / ") }</p>
                }
            </div>
        </div>
    }
}
