//! Session resolver: keeps `SessionState` consistent with the auth provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! Constructed once in `App`, shared through context, and torn down with the
//! root owner. Pages call its operations; none of them write the store.
//!
//! LIFECYCLE
//! =========
//! 1. `initialize` consumes callback-URL tokens, or falls back to the stored
//!    session and checks restaurant ownership.
//! 2. `subscribe` follows provider auth-state changes for the app lifetime.
//! 3. `teardown` drops the subscription and turns every in-flight
//!    continuation into a no-op.
//!
//! The id comparison in the reducer is the only ordering guard. A check for a
//! superseded identity is never issued after the switch and its late result
//! is discarded, but an in-flight request is not cancelled.

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;

use super::session::{SessionEvent, SessionState, SessionStore, Transition};
use crate::config::AppConfig;
use crate::error::AuthError;
use crate::net::auth_events::{AuthListener, Subscription};
use crate::net::callback_url::{extract_tokens, has_sensitive_params, strip_tokens};
use crate::net::provider::{AuthProvider, RestaurantDirectory};
use crate::net::types::{AuthChange, Session};
use crate::util::location::NavigationContext;
use crate::util::timer::sleep;

/// Tunables taken from `AppConfig`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Pause after an identity switch before checking restaurant ownership.
    pub settle_delay: Duration,
    /// Route the one-time link should land on.
    pub callback_route: String,
}

impl From<&AppConfig> for ResolverOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.auth_settle_delay_ms),
            callback_route: config.routes.callback.clone(),
        }
    }
}

pub struct SessionResolver<P, S, N> {
    provider: Rc<P>,
    store: S,
    nav: Rc<N>,
    options: Rc<ResolverOptions>,
    alive: Rc<Cell<bool>>,
    subscription: Rc<RefCell<Option<Subscription>>>,
}

impl<P, S: Clone, N> Clone for SessionResolver<P, S, N> {
    fn clone(&self) -> Self {
        Self {
            provider: Rc::clone(&self.provider),
            store: self.store.clone(),
            nav: Rc::clone(&self.nav),
            options: Rc::clone(&self.options),
            alive: Rc::clone(&self.alive),
            subscription: Rc::clone(&self.subscription),
        }
    }
}

impl<P, S, N> SessionResolver<P, S, N>
where
    P: AuthProvider + RestaurantDirectory + 'static,
    S: SessionStore,
    N: NavigationContext + 'static,
{
    pub fn new(provider: Rc<P>, store: S, nav: N, options: ResolverOptions) -> Self {
        Self {
            provider,
            store,
            nav: Rc::new(nav),
            options: Rc::new(options),
            alive: Rc::new(Cell::new(true)),
            subscription: Rc::new(RefCell::new(None)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Resolve the startup session.
    ///
    /// Never fails: provider errors end loading with whatever state is known.
    pub async fn initialize(&self) {
        if let Some(session) = self.consume_callback_tokens().await {
            if !self.is_alive() {
                return;
            }
            log::info!("session established from one-time link for {}", session.user_id());
            self.store.dispatch(SessionEvent::CallbackSession(session));
            return;
        }

        match self.provider.get_session().await {
            Ok(session) => {
                if !self.is_alive() {
                    return;
                }
                log::debug!("stored session: {}", session.as_ref().map_or("none", Session::user_id));
                if let Transition::CheckRestaurant(user_id) = self.store.dispatch(SessionEvent::StoredSession(session))
                {
                    self.check_restaurant(&user_id).await;
                }
            }
            Err(err) => {
                log::error!("auth initialization failed: {err}");
                if self.is_alive() {
                    self.store.dispatch(SessionEvent::InitFailed);
                }
            }
        }
    }

    /// Read callback tokens from the URL, scrub them, and exchange them for a session.
    async fn consume_callback_tokens(&self) -> Option<Session> {
        let url = self.nav.current_url();
        let tokens = extract_tokens(&url);
        if has_sensitive_params(&url) {
            self.nav.replace_url(&strip_tokens(&url));
        }
        let tokens = tokens?;
        log::debug!("callback tokens present (type: {})", tokens.kind.as_deref().unwrap_or("unknown"));

        let expires_at = tokens.expiry(chrono::Utc::now().timestamp());
        match self.provider.set_session(&tokens.access_token, &tokens.refresh_token, expires_at).await {
            Ok(session) => Some(session),
            Err(err) => {
                log::warn!("callback tokens rejected, falling back to stored session: {err}");
                None
            }
        }
    }

    /// Check whether `user_id` owns a restaurant and publish the result.
    ///
    /// Query failures resolve to "not linked" so the guard cannot stall on a spinner.
    pub async fn check_restaurant(&self, user_id: &str) -> bool {
        let linked = match self.provider.restaurants_owned_by(user_id).await {
            Ok(rows) => {
                log::debug!("restaurant check for {user_id}: {} row(s)", rows.len());
                !rows.is_empty()
            }
            Err(err) => {
                log::warn!("restaurant check for {user_id} failed, treating as unlinked: {err}");
                false
            }
        };
        if self.is_alive() {
            self.store.dispatch(SessionEvent::RestaurantChecked { user_id: user_id.to_owned(), linked });
        }
        linked
    }

    /// Re-run the existence check for the current identity.
    ///
    /// Returns `false` when nobody is signed in.
    pub async fn refresh_restaurant_link(&self) -> bool {
        let Some(user_id) = self.store.snapshot().user_id().map(str::to_owned) else {
            return false;
        };
        self.check_restaurant(&user_id).await
    }

    /// Apply one provider auth-state change.
    pub async fn handle_auth_change(&self, change: AuthChange) {
        if !self.is_alive() {
            return;
        }
        log::debug!("auth state change: {:?}", change.event);
        let Transition::CheckRestaurant(user_id) = self.store.dispatch(SessionEvent::AuthChanged(change.session))
        else {
            return;
        };

        sleep(self.options.settle_delay).await;
        if !self.is_alive() || self.store.snapshot().user_id() != Some(user_id.as_str()) {
            return;
        }
        self.check_restaurant(&user_id).await;
    }

    /// Follow provider auth-state changes; each one is handled on a task from `spawn`.
    ///
    /// Calling again replaces the previous subscription.
    pub fn subscribe<F>(&self, spawn: F)
    where
        F: Fn(LocalBoxFuture<'static, ()>) + 'static,
    {
        let resolver = self.clone();
        let listener: AuthListener = Rc::new(move |change: AuthChange| {
            let resolver = resolver.clone();
            spawn(Box::pin(async move { resolver.handle_auth_change(change).await }));
        });
        let subscription = self.provider.on_auth_state_change(listener);
        *self.subscription.borrow_mut() = Some(subscription);
    }

    /// Ask the provider to email a one-time sign-in link.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`] unchanged so the caller can show it next to the field.
    pub async fn sign_in_with_one_time_link(&self, email: &str) -> Result<(), AuthError> {
        let redirect_to = format!("{}{}", self.nav.origin().trim_end_matches('/'), self.options.callback_route);
        log::info!("requesting one-time link, redirect to {redirect_to}");
        self.provider
            .sign_in_with_otp(email, &redirect_to)
            .await
            .inspect_err(|err| log::warn!("one-time link request rejected: {err}"))
    }

    /// Sign out. Local state always clears, even when the provider call fails.
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.sign_out().await {
            log::warn!("provider sign-out failed, clearing local session anyway: {err}");
        }
        if self.is_alive() {
            self.store.dispatch(SessionEvent::SignedOut);
        }
    }

    /// Stop following the provider and ignore any continuation still in flight.
    pub fn teardown(&self) {
        self.alive.set(false);
        drop(self.subscription.borrow_mut().take());
    }
}
