//! Fallback decision logic: when the 3D experience cannot or should not
//! run, the site degrades to a text rendering of the same content.
//!
//! The decision itself is pure; the browser probes feeding it are cfg'd to
//! the wasm target so the policy stays host-testable.

use crate::util::{local_storage_get, local_storage_remove, local_storage_set};

pub const FALLBACK_PREF_KEY: &str = "portfolio-use-fallback";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackType {
    /// WebGL missing or the context cannot be created.
    WebglFailure,
    /// Visitor explicitly chose the text version.
    UserChoice,
    /// Capable device, but mobile; 3D is offered, not default.
    MobileOptimized,
    /// Reduced-motion or assistive-tech signals.
    Accessibility,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FallbackMode {
    pub kind: FallbackType,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WebGlSupport {
    pub supported: bool,
    /// 1 or 2 when supported.
    pub version: Option<u8>,
    pub error: Option<String>,
}

/// Decide whether to start in fallback. A WebGL failure always forces
/// fallback, whatever the device looks like; device heuristics only apply
/// on a working renderer.
pub fn decide_fallback(
    webgl: &WebGlSupport,
    is_mobile: bool,
    low_performance: bool,
) -> Option<FallbackMode> {
    if !webgl.supported {
        return Some(FallbackMode {
            kind: FallbackType::WebglFailure,
            reason: webgl
                .error
                .clone()
                .unwrap_or_else(|| "webgl is not available".to_string()),
        });
    }
    if is_mobile && low_performance {
        return Some(FallbackMode {
            kind: FallbackType::MobileOptimized,
            reason: "low-powered mobile device".to_string(),
        });
    }
    None
}

/// Visitor-facing explanation per fallback kind.
pub fn fallback_recommendation(kind: FallbackType) -> &'static str {
    match kind {
        FallbackType::WebglFailure => {
            "Your browser could not start the 3D experience, so the text \
             version is shown instead. Updating your browser or enabling \
             hardware acceleration may help."
        }
        FallbackType::UserChoice => {
            "You are viewing the text version. The full 3D experience is one \
             click away."
        }
        FallbackType::MobileOptimized => {
            "The text version loads faster on this device. The 3D experience \
             is available if you prefer it."
        }
        FallbackType::Accessibility => {
            "The text version avoids motion and renders well with assistive \
             technology."
        }
    }
}

/// Persisted visitor preference. Absent means "no preference".
pub fn stored_fallback_preference() -> Option<bool> {
    match local_storage_get(FALLBACK_PREF_KEY)?.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn store_fallback_preference(use_fallback: bool) {
    if !local_storage_set(FALLBACK_PREF_KEY, if use_fallback { "true" } else { "false" }) {
        log::warn!("could not persist fallback preference");
    }
}

pub fn clear_fallback_preference() {
    local_storage_remove(FALLBACK_PREF_KEY);
}

/// Probe for a usable WebGL context, newest first.
#[cfg(target_arch = "wasm32")]
pub fn check_webgl_support() -> WebGlSupport {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return WebGlSupport {
            supported: false,
            version: None,
            error: Some("no document".to_string()),
        };
    };
    let canvas = match document
        .create_element("canvas")
        .map_err(|_| ())
        .and_then(|e| {
            use wasm_bindgen::JsCast;
            e.dyn_into::<web_sys::HtmlCanvasElement>().map_err(|_| ())
        }) {
        Ok(canvas) => canvas,
        Err(()) => {
            return WebGlSupport {
                supported: false,
                version: None,
                error: Some("could not create probe canvas".to_string()),
            };
        }
    };

    for (name, version) in [("webgl2", 2u8), ("webgl", 1), ("experimental-webgl", 1)] {
        if let Ok(Some(_ctx)) = canvas.get_context(name) {
            return WebGlSupport {
                supported: true,
                version: Some(version),
                error: None,
            };
        }
    }
    WebGlSupport {
        supported: false,
        version: None,
        error: Some("no webgl context could be created".to_string()),
    }
}

/// User-agent heuristic, the same coarse one everyone uses.
#[cfg(target_arch = "wasm32")]
pub fn is_mobile_device() -> bool {
    let Some(ua) = web_sys::window()
        .map(|w| w.navigator())
        .and_then(|n| n.user_agent().ok())
    else {
        return false;
    };
    let ua = ua.to_lowercase();
    ["android", "iphone", "ipad", "ipod", "mobile"]
        .iter()
        .any(|needle| ua.contains(needle))
}

/// Few cores or little memory. Browsers that hide these report as capable.
#[cfg(target_arch = "wasm32")]
pub fn is_low_performance_device() -> bool {
    let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
        return false;
    };
    let cores = navigator.hardware_concurrency();
    let memory_gb = js_sys::Reflect::get(navigator.as_ref(), &"deviceMemory".into())
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(4.0);
    cores < 4.0 || memory_gb < 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn working_webgl() -> WebGlSupport {
        WebGlSupport {
            supported: true,
            version: Some(2),
            error: None,
        }
    }

    fn broken_webgl() -> WebGlSupport {
        WebGlSupport {
            supported: false,
            version: None,
            error: Some("context creation failed".to_string()),
        }
    }

    #[test]
    fn webgl_failure_forces_fallback_on_any_device() {
        for (mobile, low_perf) in [(false, false), (true, false), (false, true), (true, true)] {
            let mode = decide_fallback(&broken_webgl(), mobile, low_perf)
                .expect("webgl failure must force fallback");
            assert_eq!(mode.kind, FallbackType::WebglFailure);
            assert_eq!(mode.reason, "context creation failed");
        }
    }

    #[test]
    fn capable_desktop_gets_the_full_experience() {
        assert_eq!(decide_fallback(&working_webgl(), false, false), None);
    }

    #[test]
    fn only_low_powered_mobile_is_downgraded() {
        assert_eq!(decide_fallback(&working_webgl(), true, false), None);
        assert_eq!(decide_fallback(&working_webgl(), false, true), None);
        let mode = decide_fallback(&working_webgl(), true, true).unwrap();
        assert_eq!(mode.kind, FallbackType::MobileOptimized);
    }

    #[test]
    fn missing_error_message_gets_a_default_reason() {
        let webgl = WebGlSupport {
            supported: false,
            version: None,
            error: None,
        };
        let mode = decide_fallback(&webgl, false, false).unwrap();
        assert_eq!(mode.reason, "webgl is not available");
    }

    #[test]
    fn every_fallback_kind_has_a_recommendation() {
        for kind in [
            FallbackType::WebglFailure,
            FallbackType::UserChoice,
            FallbackType::MobileOptimized,
            FallbackType::Accessibility,
        ] {
            assert!(!fallback_recommendation(kind).is_empty());
        }
    }
}
