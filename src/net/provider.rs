//! Seams to the external managed backend consumed by the session flow.
//!
//! ARCHITECTURE
//! ============
//! The resolver only talks to these traits. `BackendClient` implements them
//! over HTTP in the browser; tests implement them in memory.

use async_trait::async_trait;

use super::auth_events::{AuthListener, Subscription};
use super::types::{RestaurantRow, Session};
use crate::error::{ApiError, AuthError};

/// External auth provider contract.
#[async_trait(?Send)]
pub trait AuthProvider {
    /// Current stored session, if any.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Establish a session from tokens delivered by a callback URL.
    ///
    /// `expires_at` (unix seconds) lets the stored session be refreshed once the access token lapses.
    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at: Option<i64>,
    ) -> Result<Session, AuthError>;

    /// Email a one-time access link that lands on `redirect_to`.
    async fn sign_in_with_otp(&self, email: &str, redirect_to: &str) -> Result<(), AuthError>;

    /// Invalidate the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Register for auth-state changes until the returned handle is dropped.
    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription;
}

/// Row-level-security query for restaurants owned by an identity.
#[async_trait(?Send)]
pub trait RestaurantDirectory {
    async fn restaurants_owned_by(&self, user_id: &str) -> Result<Vec<RestaurantRow>, ApiError>;
}
