use yew::prelude::*;

use super::SharedContent;
use crate::fallback::{fallback_recommendation, FallbackType};

#[derive(Properties, PartialEq, Clone)]
pub struct FallbackViewProps {
    pub content: SharedContent,
    pub kind: FallbackType,
    pub on_try_world: Callback<()>,
}

fn heading(text: &str) -> Html {
    html! { <h2 style="color:#58a6ff; border-bottom:1px solid #2f3641; padding-bottom:4px;">{ text }</h2> }
}

/// Text rendering of the whole portfolio; everything the 3D world shows,
/// without a canvas in sight.
#[function_component(FallbackView)]
pub fn fallback_view(props: &FallbackViewProps) -> Html {
    let manager = props.content.0.borrow();
    let content = manager.content().clone();
    drop(manager);

    let try_world = {
        let on_try_world = props.on_try_world.clone();
        Callback::from(move |_: MouseEvent| on_try_world.emit(()))
    };

    // Offering the 3D experience makes no sense when it just failed.
    let offer_world = props.kind != FallbackType::WebglFailure;

    html! {
        <div style="min-height:100vh; background:#0e1116; color:#c9d1d9; font-family:sans-serif;">
            <div style="max-width:820px; margin:0 auto; padding:32px 20px 64px;">
                <div style="background:#161b22; border:1px solid #2f3641; border-radius:8px; padding:12px 16px; display:flex; justify-content:space-between; align-items:center; gap:12px;">
                    <span style="font-size:13px; color:#8b949e;">{ fallback_recommendation(props.kind) }</span>
                    if offer_world {
                        <button
                            onclick={try_world}
                            style="background:#1f6f54; color:#fff; border:none; padding:8px 14px; border-radius:6px; cursor:pointer; white-space:nowrap;"
                        >{ "Enter 3D experience" }</button>
                    }
                </div>

                if let Some(info) = &content.personal_info {
                    <h1 style="margin-bottom:0; color:#fff;">{ &info.name }</h1>
                    <p style="margin-top:4px; color:#8b949e;">{ &info.title }{ " - " }{ &info.location }</p>
                    <p>{ &info.summary }</p>
                    <p style="font-size:13px;">
                        { &info.email }
                        if let Some(github) = &info.github {
                            { " | " }<a href={github.clone()} style="color:#58a6ff;">{ "GitHub" }</a>
                        }
                        if let Some(linkedin) = &info.linkedin {
                            { " | " }<a href={linkedin.clone()} style="color:#58a6ff;">{ "LinkedIn" }</a>
                        }
                    </p>
                }

                { heading("Projects") }
                { for content.projects.iter().map(|project| html! {
                    <div style="margin-bottom:22px;">
                        <h3 style="margin-bottom:2px; color:#fff;">{ &project.title }
                            <span style="color:#8b949e; font-size:12px; margin-left:8px;">{ &project.domain }</span>
                        </h3>
                        <p style="margin-top:2px;">{ &project.description }</p>
                        if let Some(story) = &project.engineering_story {
                            <p style="font-size:14px;"><strong>{ "Problem: " }</strong>{ &story.problem_statement }</p>
                            <p style="font-size:14px;"><strong>{ "Approach: " }</strong>{ &story.solution_approach }</p>
                            if !story.results_and_impact.is_empty() {
                                <p style="font-size:14px;"><strong>{ "Impact: " }</strong>{ &story.results_and_impact }</p>
                            }
                        }
                        if !project.tech_stack.is_empty() {
                            <p style="font-size:12px; color:#8b949e;">{ project.tech_stack.join(" / ") }</p>
                        }
                    </div>
                }) }

                { heading("Skills") }
                <ul>
                    { for content.skills.iter().map(|skill| html! {
                        <li>
                            { &skill.technology }
                            <span style="color:#8b949e; font-size:12px;">
                                { format!(" ({}, {:.0}%)", skill.category, skill.proficiency_level * 100.0) }
                            </span>
                        </li>
                    }) }
                </ul>

                { heading("Experience") }
                { for content.experience.iter().map(|exp| html! {
                    <div style="margin-bottom:16px;">
                        <h3 style="margin-bottom:2px; color:#fff;">{ &exp.role }{ " - " }{ &exp.company }</h3>
                        <p style="margin:0; color:#8b949e; font-size:13px;">{ &exp.period }</p>
                        <ul>
                            { for exp.highlights.iter().map(|h| html!{ <li>{ h }</li> }) }
                        </ul>
                    </div>
                }) }

                if !content.certifications.is_empty() {
                    { heading("Certifications") }
                    <ul>
                        { for content.certifications.iter().map(|cert| html! {
                            <li>{ format!("{} ({}, {})", cert.name, cert.issuer, cert.year) }</li>
                        }) }
                    </ul>
                }

                if !content.research_showcase.is_empty() {
                    { heading("Research") }
                    { for content.research_showcase.iter().map(|r| html! {
                        <div style="margin-bottom:12px;">
                            <strong>{ &r.title }</strong>
                            if let Some(year) = r.year {
                                <span style="color:#8b949e;">{ format!(" ({year})") }</span>
                            }
                            <p style="margin:2px 0 0;">{ &r.summary }</p>
                        </div>
                    }) }
                }
            </div>
        </div>
    }
}
