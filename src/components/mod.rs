//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render donation and session chrome while reading shared state
//! from Leptos context providers set up in `app`.

pub mod countdown_panel;
pub mod donation_card;
pub mod protected_route;
pub mod spinner;
pub mod status_badge;
pub mod toast;
