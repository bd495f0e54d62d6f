//! Utility helpers shared across pages and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure projections (status, countdown, formatting, guard classification)
//! live here next to the browser shims they are driven by, so both can be
//! unit tested without a DOM.

pub mod countdown;
pub mod format;
pub mod location;
pub mod route_guard;
pub mod status;
pub mod timer;
