//! Small shared helpers: wall clock and browser storage access.

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Read a key from localStorage. Quota or access errors degrade to `None`.
pub fn local_storage_get(key: &str) -> Option<String> {
    let win = web_sys::window()?;
    match win.local_storage() {
        Ok(Some(store)) => store.get_item(key).ok().flatten(),
        _ => None,
    }
}

/// Write a key to localStorage. Returns false when the preference could not
/// be persisted (private browsing, quota); callers treat that as non-fatal.
pub fn local_storage_set(key: &str, value: &str) -> bool {
    let Some(win) = web_sys::window() else {
        return false;
    };
    match win.local_storage() {
        Ok(Some(store)) => store.set_item(key, value).is_ok(),
        _ => false,
    }
}

pub fn local_storage_remove(key: &str) -> bool {
    let Some(win) = web_sys::window() else {
        return false;
    };
    match win.local_storage() {
        Ok(Some(store)) => store.remove_item(key).is_ok(),
        _ => false,
    }
}

/// Session-scoped variants, used by recruiter mode.
pub fn session_storage_get(key: &str) -> Option<String> {
    let win = web_sys::window()?;
    match win.session_storage() {
        Ok(Some(store)) => store.get_item(key).ok().flatten(),
        _ => None,
    }
}

pub fn session_storage_set(key: &str, value: &str) -> bool {
    let Some(win) = web_sys::window() else {
        return false;
    };
    match win.session_storage() {
        Ok(Some(store)) => store.set_item(key, value).is_ok(),
        _ => false,
    }
}

pub fn session_storage_remove(key: &str) -> bool {
    let Some(win) = web_sys::window() else {
        return false;
    };
    match win.session_storage() {
        Ok(Some(store)) => store.remove_item(key).is_ok(),
        _ => false,
    }
}

/// Async delay used for retry backoff. On the web this resolves through a
/// `setTimeout` promise; on other targets it resolves immediately.
#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: i32) {
    use wasm_bindgen::JsCast;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(win) = web_sys::window() {
            let _ = win
                .set_timeout_with_callback_and_timeout_and_arguments_0(resolve.unchecked_ref(), ms);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(_ms: i32) {}
