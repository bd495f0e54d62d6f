//! Route guard shared by protected and onboarding routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route must apply identical redirect behavior. Computing
//! the guard state is pure; navigation happens in an effect that only reruns
//! when the memoized guard state actually changes, and always replaces the
//! current history entry.

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::config::RouteTargets;
use crate::state::session::{RestaurantLink, SessionState};

/// Where the current session allows the user to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Session or restaurant check still resolving; show a spinner, do not navigate.
    Loading,
    Unauthenticated,
    NeedsOnboarding,
    Ready,
}

impl GuardState {
    /// Redirect required for a protected route in this state, if any.
    pub fn redirect_target(self, routes: &RouteTargets) -> Option<&str> {
        match self {
            Self::Unauthenticated => Some(routes.login.as_str()),
            Self::NeedsOnboarding => Some(routes.onboarding.as_str()),
            Self::Loading | Self::Ready => None,
        }
    }

    /// Redirect required for the onboarding route itself: linked users go to the dashboard.
    pub fn onboarding_redirect(self, routes: &RouteTargets) -> Option<&str> {
        match self {
            Self::Unauthenticated => Some(routes.login.as_str()),
            Self::Ready => Some(routes.dashboard.as_str()),
            Self::Loading | Self::NeedsOnboarding => None,
        }
    }

    /// Where a resolved session belongs after sign-in (callback and login pages).
    pub fn landing_target(self, routes: &RouteTargets) -> Option<&str> {
        match self {
            Self::Loading => None,
            Self::Unauthenticated => Some(routes.login.as_str()),
            Self::NeedsOnboarding => Some(routes.onboarding.as_str()),
            Self::Ready => Some(routes.dashboard.as_str()),
        }
    }
}

/// Classify a session snapshot.
pub fn resolve_guard(state: &SessionState) -> GuardState {
    if state.loading {
        return GuardState::Loading;
    }
    if state.session.is_none() {
        return GuardState::Unauthenticated;
    }
    match state.restaurant {
        RestaurantLink::Unknown => GuardState::Loading,
        RestaurantLink::Unlinked => GuardState::NeedsOnboarding,
        RestaurantLink::Linked => GuardState::Ready,
    }
}

fn replace_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Memoized guard state, recomputed only when the session changes classification.
pub fn guard_memo(session: Signal<SessionState>) -> Memo<GuardState> {
    Memo::new(move |_| session.with(resolve_guard))
}

/// Install the redirect effect for a route.
///
/// `target` picks the redirect for a given guard state; the effect runs on
/// guard transitions only, never on unrelated session updates.
pub fn install_route_guard<F, T>(guard: Memo<GuardState>, routes: RouteTargets, target: T, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
    T: Fn(GuardState, &RouteTargets) -> Option<&str> + 'static,
{
    Effect::new(move || {
        let state = guard.get();
        if let Some(path) = target(state, &routes) {
            log::debug!("guard {state:?}: redirecting to {path}");
            navigate(path, replace_options());
        }
    });
}
