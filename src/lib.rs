//! Restaurant dashboard for a food-donation platform.
//!
//! ARCHITECTURE
//! ============
//! A client-side-rendered Leptos app over an external managed backend:
//! `state` resolves who is signed in and whether they own a restaurant,
//! `util::route_guard` turns that into redirects, and `util::status` /
//! `util::countdown` project donation records for display. Browser-only code
//! sits behind the `csr` feature; everything else runs in native tests.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Install browser logging and mount the app on `<body>`.
#[cfg(feature = "csr")]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger not installed: {err}");
    }
    leptos::mount::mount_to_body(app::App);
}
