//! Recruiter mode: a condensed, skimmable resume view activated by url
//! parameter and remembered for the browser session.

use crate::util::{session_storage_get, session_storage_remove, session_storage_set};

pub const RECRUITER_MODE_KEY: &str = "recruiter-mode";

/// Query-string activation: `?recruiter=true` or `?mode=recruiter`.
pub fn query_requests_recruiter_mode(query: &str) -> bool {
    let trimmed = query.trim_start_matches('?');
    trimmed.split('&').any(|pair| {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("recruiter"), Some("true")) => true,
            (Some("mode"), Some("recruiter")) => true,
            _ => false,
        }
    })
}

/// Session-persisted activation check, combining the url with the stored
/// flag. A url request also persists the flag for the rest of the session.
#[cfg(target_arch = "wasm32")]
pub fn detect_recruiter_mode() -> bool {
    let from_url = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|search| query_requests_recruiter_mode(&search))
        .unwrap_or(false);
    if from_url {
        enable_recruiter_mode();
        return true;
    }
    session_storage_get(RECRUITER_MODE_KEY).as_deref() == Some("true")
}

pub fn enable_recruiter_mode() {
    if !session_storage_set(RECRUITER_MODE_KEY, "true") {
        log::warn!("could not persist recruiter mode for the session");
    }
    log::info!("recruiter mode enabled");
}

pub fn disable_recruiter_mode() {
    session_storage_remove(RECRUITER_MODE_KEY);
}

/// Per-session engagement counters for the condensed view's downloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecruiterSession {
    pub text_downloads: u32,
    pub pdf_downloads: u32,
}

impl RecruiterSession {
    pub fn record_text_download(&mut self) {
        self.text_downloads += 1;
        log::info!("resume text download #{}", self.text_downloads);
    }

    pub fn record_pdf_download(&mut self) {
        self.pdf_downloads += 1;
        log::info!("resume pdf download #{}", self.pdf_downloads);
    }

    pub fn total_downloads(&self) -> u32 {
        self.text_downloads + self.pdf_downloads
    }
}
