//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetches, actions, redirects)
//! and delegates rendering details to `components`.

pub mod auth_callback;
pub mod confirm_donation;
pub mod dashboard;
pub mod login;
pub mod onboarding;
