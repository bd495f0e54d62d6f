//! Networking modules for the managed backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `provider` defines the seams the session flow depends on, `backend`
//! implements them over HTTP, `api` calls the donation edge functions, and
//! `types` defines the wire schema.

pub mod api;
pub mod auth_events;
pub mod backend;
pub mod callback_url;
pub mod provider;
pub mod types;
