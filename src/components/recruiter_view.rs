use yew::prelude::*;

use super::SharedContent;
use crate::content::types::PortfolioContent;
use crate::recruiter::RecruiterSession;

#[derive(Properties, PartialEq, Clone)]
pub struct RecruiterViewProps {
    pub content: SharedContent,
    pub on_exit: Callback<()>,
}

/// Plain-text resume rendering used for the download link.
pub fn resume_text(content: &PortfolioContent) -> String {
    let mut out = String::new();
    if let Some(info) = &content.personal_info {
        out.push_str(&format!("{}\n{}\n{}\n", info.name, info.title, info.email));
        if !info.summary.is_empty() {
            out.push_str(&format!("\n{}\n", info.summary));
        }
    }
    if !content.experience.is_empty() {
        out.push_str("\nEXPERIENCE\n");
        for exp in &content.experience {
            out.push_str(&format!("{} - {} ({})\n", exp.role, exp.company, exp.period));
            for h in &exp.highlights {
                out.push_str(&format!("  * {h}\n"));
            }
        }
    }
    if !content.projects.is_empty() {
        out.push_str("\nSELECTED PROJECTS\n");
        for project in &content.projects {
            out.push_str(&format!("{}: {}\n", project.title, project.description));
        }
    }
    if !content.skills.is_empty() {
        out.push_str("\nSKILLS\n");
        let names: Vec<&str> = content.skills.iter().map(|s| s.technology.as_str()).collect();
        out.push_str(&names.join(", "));
        out.push('\n');
    }
    if !content.certifications.is_empty() {
        out.push_str("\nCERTIFICATIONS\n");
        for cert in &content.certifications {
            out.push_str(&format!("{} ({}, {})\n", cert.name, cert.issuer, cert.year));
        }
    }
    out
}

#[cfg(target_arch = "wasm32")]
fn trigger_text_download(text: &str) {
    use wasm_bindgen::JsCast;
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let href = format!(
        "data:text/plain;charset=utf-8,{}",
        js_sys::encode_uri_component(text)
    );
    if let Ok(element) = document.create_element("a") {
        let _ = element.set_attribute("href", &href);
        let _ = element.set_attribute("download", "resume.txt");
        if let Ok(anchor) = element.dyn_into::<web_sys::HtmlElement>() {
            anchor.click();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn trigger_text_download(_text: &str) {}

/// Condensed, skimmable resume for visitors arriving through a recruiter
/// link. No canvas, no scroll choreography, everything above the fold.
#[function_component(RecruiterView)]
pub fn recruiter_view(props: &RecruiterViewProps) -> Html {
    let session = use_mut_ref(RecruiterSession::default);
    let downloads = use_state(|| 0u32);

    let manager = props.content.0.borrow();
    let content = manager.content().clone();
    drop(manager);

    let download_text = {
        let content = content.clone();
        let session = session.clone();
        let downloads = downloads.clone();
        Callback::from(move |_: MouseEvent| {
            trigger_text_download(&resume_text(&content));
            let mut session = session.borrow_mut();
            session.record_text_download();
            downloads.set(session.total_downloads());
        })
    };
    let exit = {
        let on_exit = props.on_exit.clone();
        Callback::from(move |_: MouseEvent| on_exit.emit(()))
    };

    html! {
        <div style="min-height:100vh; background:#0e1116; color:#c9d1d9; font-family:sans-serif;">
            <div style="max-width:700px; margin:0 auto; padding:32px 20px 64px;">
                <div style="display:flex; justify-content:space-between; align-items:center; gap:12px;">
                    <span style="font-size:13px; color:#8b949e;">{ "Recruiter view - the short version" }</span>
                    <div style="display:flex; gap:8px;">
                        <button
                            onclick={download_text}
                            style="background:#1f6f54; color:#fff; border:none; padding:8px 14px; border-radius:6px; cursor:pointer;"
                        >{ "Download resume (.txt)" }</button>
                        <button
                            onclick={exit}
                            style="background:#161b22; color:#c9d1d9; border:1px solid #2f3641; padding:8px 14px; border-radius:6px; cursor:pointer;"
                        >{ "Full site" }</button>
                    </div>
                </div>
                if *downloads > 0 {
                    <p style="font-size:12px; color:#8b949e;">{ format!("Downloads this session: {}", *downloads) }</p>
                }

                if let Some(info) = &content.personal_info {
                    <h1 style="margin-bottom:0; color:#fff;">{ &info.name }</h1>
                    <p style="margin-top:4px; color:#8b949e;">{ &info.title }</p>
                    <p>{ &info.summary }</p>
                    <p style="font-size:13px;">{ &info.email }</p>
                }

                <h2 style="color:#58a6ff;">{ "Experience" }</h2>
                { for content.experience.iter().map(|exp| html! {
                    <div style="margin-bottom:12px;">
                        <strong>{ &exp.role }</strong>{ " - " }{ &exp.company }
                        <span style="color:#8b949e; font-size:12px;">{ format!(" ({})", exp.period) }</span>
                        <ul style="margin:4px 0;">
                            { for exp.highlights.iter().map(|h| html!{ <li>{ h }</li> }) }
                        </ul>
                    </div>
                }) }

                <h2 style="color:#58a6ff;">{ "Key skills" }</h2>
                <p>{ content.skills.iter().map(|s| s.technology.clone()).collect::<Vec<_>>().join(", ") }</p>

                <h2 style="color:#58a6ff;">{ "Selected projects" }</h2>
                { for content.projects.iter().map(|project| html! {
                    <p><strong>{ &project.title }</strong>{ ": " }{ &project.description }</p>
                }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::sample::sample_content;

    #[test]
    fn resume_text_includes_every_section() {
        let text = resume_text(&sample_content());
        assert!(text.contains("Alex Moreau"));
        assert!(text.contains("EXPERIENCE"));
        assert!(text.contains("SELECTED PROJECTS"));
        assert!(text.contains("SKILLS"));
        assert!(text.contains("CERTIFICATIONS"));
        assert!(text.contains("Meridian Payments"));
    }

    #[test]
    fn resume_text_handles_empty_content() {
        let text = resume_text(&PortfolioContent::default());
        assert!(text.is_empty());
    }
}
