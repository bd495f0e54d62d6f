//! HTTP client for the managed backend's auth and REST endpoints.
//!
//! Browser (csr): real HTTP calls via `gloo-net`, session persisted in
//! `localStorage`. Native builds: stubs returning `AuthError::Unavailable`
//! or an empty session so the crate can be unit tested without a browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx auth responses become `AuthError::Provider` carrying the
//! provider's own message (`msg`, `error_description`, `message`, or
//! `error`, first non-empty wins). Transport failures become
//! `AuthError::Network`. REST failures map to `ApiError` the same way.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::cell::RefCell;

use async_trait::async_trait;
#[cfg(any(test, feature = "csr"))]
use serde::Deserialize;

use super::auth_events::{AuthListener, ListenerRegistry, Subscription};
use super::provider::{AuthProvider, RestaurantDirectory};
use super::types::{RestaurantRow, Session};
#[cfg(any(test, feature = "csr"))]
use super::types::User;
use crate::config::AppConfig;
use crate::error::{ApiError, AuthError};

/// `localStorage` key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "donation-dashboard.session";

/// Join `base` and `path`, tolerating a trailing slash on `base`.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// First non-empty message field of a backend error body.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn error_message(body: &serde_json::Value) -> Option<String> {
    ["msg", "error_description", "message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_owned)
}

#[cfg(any(test, feature = "csr"))]
fn otp_path(redirect_to: &str) -> String {
    format!("/auth/v1/otp?redirect_to={}", urlencoding::encode(redirect_to))
}

/// Restaurants owned by `user_id`; at most one row is needed.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn restaurants_path(user_id: &str) -> String {
    format!("/rest/v1/restaurants?select=id&user_id=eq.{}&limit=1", urlencoding::encode(user_id))
}

#[cfg(any(test, feature = "csr"))]
const REFRESH_PATH: &str = "/auth/v1/token?grant_type=refresh_token";

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

#[cfg(any(test, feature = "csr"))]
impl TokenResponse {
    fn into_session(self, now_secs: i64) -> Session {
        let expires_at = self.expires_at.or_else(|| self.expires_in.map(|ttl| now_secs + ttl));
        Session { user: self.user, access_token: self.access_token, refresh_token: self.refresh_token, expires_at }
    }
}

#[cfg(any(test, feature = "csr"))]
fn decode_stored_session(raw: &str) -> Option<Session> {
    match serde_json::from_str(raw) {
        Ok(session) => Some(session),
        Err(err) => {
            log::warn!("discarding unreadable stored session: {err}");
            None
        }
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(feature = "csr")]
fn provider_error(status: u16, body: &str) -> AuthError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| format!("auth request failed: {status}"));
    AuthError::Provider { status: Some(status), message }
}

#[cfg(feature = "csr")]
async fn read_error(resp: gloo_net::http::Response) -> AuthError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    provider_error(status, &body)
}

#[cfg(feature = "csr")]
fn network(err: gloo_net::Error) -> AuthError {
    AuthError::Network(err.to_string())
}

/// Backend client implementing the auth provider and restaurant directory.
///
/// Holds the current session in memory (mirrored to `localStorage`) and fans
/// auth-state changes out to subscribers.
pub struct BackendClient {
    base_url: String,
    anon_key: String,
    session: RefCell<Option<Session>>,
    listeners: ListenerRegistry,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            anon_key: config.anon_key.clone(),
            session: RefCell::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    #[cfg(feature = "csr")]
    fn bearer(&self) -> String {
        let session = self.session.borrow();
        let token = session.as_ref().map_or(self.anon_key.as_str(), |s| s.access_token.as_str());
        format!("Bearer {token}")
    }

    #[cfg(feature = "csr")]
    fn persist(&self, session: Option<Session>) {
        if let Some(storage) = local_storage() {
            let result = match &session {
                Some(s) => match serde_json::to_string(s) {
                    Ok(raw) => storage.set_item(SESSION_STORAGE_KEY, &raw),
                    Err(err) => {
                        log::warn!("session not persisted: {err}");
                        Ok(())
                    }
                },
                None => storage.remove_item(SESSION_STORAGE_KEY),
            };
            if let Err(err) = result {
                log::warn!("localStorage write failed: {err:?}");
            }
        }
        *self.session.borrow_mut() = session;
    }

    #[cfg(feature = "csr")]
    fn announce(&self, event: super::types::AuthEvent) {
        let session = self.session.borrow().clone();
        self.listeners.emit(&super::types::AuthChange { event, session });
    }

    #[cfg(feature = "csr")]
    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let resp = gloo_net::http::Request::post(&self.url(REFRESH_PATH))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        if !resp.ok() {
            return Err(read_error(resp).await);
        }
        let body: TokenResponse = resp.json().await.map_err(|e| AuthError::Decode(e.to_string()))?;
        Ok(body.into_session(chrono::Utc::now().timestamp()))
    }
}

#[async_trait(?Send)]
impl AuthProvider for BackendClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        #[cfg(feature = "csr")]
        {
            let stored = local_storage()
                .and_then(|s| s.get_item(SESSION_STORAGE_KEY).ok().flatten())
                .and_then(|raw| decode_stored_session(&raw));
            let Some(session) = stored else {
                self.persist(None);
                return Ok(None);
            };
            if !session.is_expired_at(chrono::Utc::now().timestamp()) {
                *self.session.borrow_mut() = Some(session.clone());
                return Ok(Some(session));
            }
            match self.refresh(&session.refresh_token).await {
                Ok(fresh) => {
                    self.persist(Some(fresh.clone()));
                    self.announce(super::types::AuthEvent::TokenRefreshed);
                    Ok(Some(fresh))
                }
                Err(AuthError::Provider { status, message }) => {
                    log::warn!("stored session rejected ({status:?}): {message}");
                    self.persist(None);
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            Ok(self.session.borrow().clone())
        }
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at: Option<i64>,
    ) -> Result<Session, AuthError> {
        #[cfg(feature = "csr")]
        {
            let resp = gloo_net::http::Request::get(&self.url("/auth/v1/user"))
                .header("apikey", &self.anon_key)
                .header("Authorization", &format!("Bearer {access_token}"))
                .send()
                .await
                .map_err(network)?;
            if !resp.ok() {
                return Err(read_error(resp).await);
            }
            let user: User = resp.json().await.map_err(|e| AuthError::Decode(e.to_string()))?;
            let session = Session {
                user,
                access_token: access_token.to_owned(),
                refresh_token: refresh_token.to_owned(),
                expires_at,
            };
            self.persist(Some(session.clone()));
            self.announce(super::types::AuthEvent::SignedIn);
            Ok(session)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (access_token, refresh_token, expires_at);
            Err(AuthError::Unavailable)
        }
    }

    async fn sign_in_with_otp(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        #[cfg(feature = "csr")]
        {
            let payload = serde_json::json!({ "email": email, "create_user": true });
            let resp = gloo_net::http::Request::post(&self.url(&otp_path(redirect_to)))
                .header("apikey", &self.anon_key)
                .json(&payload)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            if !resp.ok() {
                return Err(read_error(resp).await);
            }
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email, redirect_to);
            Err(AuthError::Unavailable)
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        #[cfg(feature = "csr")]
        {
            let result = gloo_net::http::Request::post(&self.url("/auth/v1/logout"))
                .header("apikey", &self.anon_key)
                .header("Authorization", &self.bearer())
                .send()
                .await;
            // Local state is cleared whatever the server said.
            self.persist(None);
            self.announce(super::types::AuthEvent::SignedOut);
            let resp = result.map_err(network)?;
            if !resp.ok() {
                return Err(read_error(resp).await);
            }
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            *self.session.borrow_mut() = None;
            Err(AuthError::Unavailable)
        }
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

#[async_trait(?Send)]
impl RestaurantDirectory for BackendClient {
    async fn restaurants_owned_by(&self, user_id: &str) -> Result<Vec<RestaurantRow>, ApiError> {
        #[cfg(feature = "csr")]
        {
            let resp = gloo_net::http::Request::get(&self.url(&restaurants_path(user_id)))
                .header("apikey", &self.anon_key)
                .header("Authorization", &self.bearer())
                .send()
                .await
                .map_err(|e| ApiError::new(None, e.to_string()))?;
            if !resp.ok() {
                let status = resp.status();
                let body = resp.json::<serde_json::Value>().await.ok();
                return Err(ApiError::from_server(
                    status,
                    body.as_ref().and_then(error_message),
                    "restaurant lookup failed",
                ));
            }
            resp.json().await.map_err(|e| ApiError::new(None, e.to_string()))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = user_id;
            Err(ApiError::unavailable())
        }
    }
}
