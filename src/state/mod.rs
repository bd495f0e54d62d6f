//! Client-side state models.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` and `resolver` own who is signed in and whether they run a
//! restaurant; `donations` holds the dashboard's list projection.

pub mod donations;
pub mod resolver;
pub mod session;
