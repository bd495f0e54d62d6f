//! Session state: current identity and whether it owns a restaurant.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard and identity-aware pages. Only the
//! `SessionResolver` writes it, always through `SessionStore::dispatch`, so
//! every change goes through the reducer below.
//!
//! INVARIANTS
//! ==========
//! - `restaurant` is `Unknown` only while an identity's existence check is
//!   outstanding, or when no identity is held.
//! - A check result for an identity that is no longer current is discarded.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;

use crate::net::types::Session;

/// Tri-state "does this identity own a restaurant" fact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestaurantLink {
    /// Not checked yet.
    #[default]
    Unknown,
    /// At least one owned restaurant row exists.
    Linked,
    /// Identity confirmed, no restaurant row (or the check failed).
    Unlinked,
}

impl RestaurantLink {
    pub fn from_exists(exists: bool) -> Self {
        if exists { Self::Linked } else { Self::Unlinked }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub restaurant: RestaurantLink,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { session: None, restaurant: RestaurantLink::Unknown, loading: true }
    }
}

/// Inputs to the session reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was established from callback-URL tokens. New accounts have no restaurant yet.
    CallbackSession(Session),
    /// Result of reading the provider's stored session at startup.
    StoredSession(Option<Session>),
    /// The provider announced an auth-state change.
    AuthChanged(Option<Session>),
    /// An existence check finished for `user_id`.
    RestaurantChecked { user_id: String, linked: bool },
    SignedOut,
    /// Startup failed before a session could be resolved.
    InitFailed,
}

/// What the reducer did, and what the resolver must do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed; consumers must not be notified.
    Unchanged,
    Updated,
    /// State changed and the restaurant existence check must run for this user id.
    CheckRestaurant(String),
}

impl SessionState {
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(Session::user_id)
    }

    pub fn email(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.user.email.as_deref())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    /// Apply `event` in place.
    pub fn apply(&mut self, event: SessionEvent) -> Transition {
        let before = self.clone();
        let transition = match event {
            SessionEvent::CallbackSession(session) => {
                self.session = Some(session);
                self.restaurant = RestaurantLink::Unlinked;
                self.loading = false;
                Transition::Updated
            }
            SessionEvent::StoredSession(Some(session)) => {
                let user_id = session.user.id.clone();
                self.session = Some(session);
                self.restaurant = RestaurantLink::Unknown;
                Transition::CheckRestaurant(user_id)
            }
            SessionEvent::StoredSession(None) => {
                self.clear();
                Transition::Updated
            }
            SessionEvent::AuthChanged(next) => {
                let next_id = next.as_ref().map(Session::user_id);
                if next_id == self.user_id() {
                    return Transition::Unchanged;
                }
                match next {
                    Some(session) => {
                        let user_id = session.user.id.clone();
                        self.session = Some(session);
                        self.restaurant = RestaurantLink::Unknown;
                        Transition::CheckRestaurant(user_id)
                    }
                    None => {
                        self.clear();
                        Transition::Updated
                    }
                }
            }
            SessionEvent::RestaurantChecked { user_id, linked } => {
                if self.user_id() != Some(user_id.as_str()) {
                    return Transition::Unchanged;
                }
                self.restaurant = RestaurantLink::from_exists(linked);
                self.loading = false;
                Transition::Updated
            }
            SessionEvent::SignedOut => {
                self.clear();
                Transition::Updated
            }
            SessionEvent::InitFailed => {
                if self.session.is_some() && self.restaurant == RestaurantLink::Unknown {
                    self.restaurant = RestaurantLink::Unlinked;
                }
                self.loading = false;
                Transition::Updated
            }
        };

        if transition == Transition::Updated && *self == before {
            Transition::Unchanged
        } else {
            transition
        }
    }

    fn clear(&mut self) {
        self.session = None;
        self.restaurant = RestaurantLink::Unknown;
        self.loading = false;
    }
}

/// Owner of the shared `SessionState`.
pub trait SessionStore: Clone + 'static {
    fn snapshot(&self) -> SessionState;

    fn replace(&self, state: SessionState);

    /// Run `event` through the reducer and publish the result only if it changed.
    fn dispatch(&self, event: SessionEvent) -> Transition {
        let mut next = self.snapshot();
        let transition = next.apply(event);
        if transition != Transition::Unchanged {
            self.replace(next);
        }
        transition
    }
}

impl SessionStore for RwSignal<SessionState> {
    fn snapshot(&self) -> SessionState {
        self.get_untracked()
    }

    fn replace(&self, state: SessionState) {
        self.set(state);
    }
}
