//! Access to the address bar for callback handling.
//!
//! TRADE-OFFS
//! ==========
//! Rewriting uses `history.replaceState`, which does not notify the router.
//! That is intended: only the visible URL changes, the mounted route stays.

/// Read and rewrite the current navigation URL.
pub trait NavigationContext {
    fn current_url(&self) -> String;

    /// Replace the current history entry with `url` without navigating.
    fn replace_url(&self, url: &str);

    /// Origin (scheme + host) of the running app.
    fn origin(&self) -> String;
}

/// `window.location` / `window.history` backed navigation context.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocation;

impl NavigationContext for BrowserLocation {
    fn current_url(&self) -> String {
        #[cfg(feature = "csr")]
        {
            web_sys::window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "csr"))]
        {
            String::new()
        }
    }

    fn replace_url(&self, url: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                if let Err(err) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url)) {
                    log::warn!("history.replaceState failed: {err:?}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = url;
        }
    }

    fn origin(&self) -> String {
        #[cfg(feature = "csr")]
        {
            web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "csr"))]
        {
            String::new()
        }
    }
}
