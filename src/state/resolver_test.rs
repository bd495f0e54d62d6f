use std::collections::HashMap;

use async_trait::async_trait;
use futures::executor::block_on;
use leptos::prelude::Owner;

use super::*;
use crate::error::ApiError;
use crate::net::auth_events::ListenerRegistry;
use crate::net::types::{AuthEvent, RestaurantRow, User};
use crate::state::session::RestaurantLink;
use crate::util::route_guard::{GuardState, resolve_guard};
use crate::util::timer::Ticker;

// =============================================================
// Fakes
// =============================================================

fn session(id: &str) -> Session {
    Session {
        user: User { id: id.to_owned(), email: Some(format!("{id}@example.com")) },
        access_token: format!("at-{id}"),
        refresh_token: format!("rt-{id}"),
        expires_at: None,
    }
}

#[derive(Default)]
struct FakeBackend {
    stored: RefCell<Option<Session>>,
    stored_error: RefCell<Option<AuthError>>,
    set_session_result: RefCell<Option<Result<Session, AuthError>>>,
    set_session_calls: RefCell<Vec<(String, String, Option<i64>)>>,
    restaurants: RefCell<HashMap<String, Result<Vec<RestaurantRow>, ApiError>>>,
    checks: RefCell<Vec<String>>,
    otp_calls: RefCell<Vec<(String, String)>>,
    otp_error: RefCell<Option<AuthError>>,
    sign_out_error: RefCell<Option<AuthError>>,
    registry: ListenerRegistry,
}

impl FakeBackend {
    fn with_restaurants(self, user_id: &str, count: usize) -> Self {
        let rows = (0..count).map(|i| RestaurantRow { id: format!("r{i}") }).collect();
        self.restaurants.borrow_mut().insert(user_id.to_owned(), Ok(rows));
        self
    }

    fn emit(&self, event: AuthEvent, session: Option<Session>) {
        self.registry.emit(&AuthChange { event, session });
    }
}

#[async_trait(?Send)]
impl AuthProvider for FakeBackend {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        if let Some(err) = self.stored_error.borrow().clone() {
            return Err(err);
        }
        Ok(self.stored.borrow().clone())
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at: Option<i64>,
    ) -> Result<Session, AuthError> {
        self.set_session_calls
            .borrow_mut()
            .push((access_token.to_owned(), refresh_token.to_owned(), expires_at));
        self.set_session_result.borrow().clone().unwrap_or(Err(AuthError::Unavailable))
    }

    async fn sign_in_with_otp(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        self.otp_calls.borrow_mut().push((email.to_owned(), redirect_to.to_owned()));
        match self.otp_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.stored.borrow_mut() = None;
        match self.sign_out_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
        self.registry.subscribe(listener)
    }
}

#[async_trait(?Send)]
impl RestaurantDirectory for FakeBackend {
    async fn restaurants_owned_by(&self, user_id: &str) -> Result<Vec<RestaurantRow>, ApiError> {
        self.checks.borrow_mut().push(user_id.to_owned());
        self.restaurants.borrow().get(user_id).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Clone, Default)]
struct TestStore(Rc<RefCell<SessionState>>);

impl SessionStore for TestStore {
    fn snapshot(&self) -> SessionState {
        self.0.borrow().clone()
    }

    fn replace(&self, state: SessionState) {
        *self.0.borrow_mut() = state;
    }
}

#[derive(Default)]
struct FakeNav {
    url: RefCell<String>,
    replaced: Rc<RefCell<Vec<String>>>,
}

impl FakeNav {
    fn at(url: &str) -> Self {
        Self { url: RefCell::new(url.to_owned()), replaced: Rc::default() }
    }
}

impl NavigationContext for FakeNav {
    fn current_url(&self) -> String {
        self.url.borrow().clone()
    }

    fn replace_url(&self, url: &str) {
        self.replaced.borrow_mut().push(url.to_owned());
        *self.url.borrow_mut() = url.to_owned();
    }

    fn origin(&self) -> String {
        "https://app.example.test".to_owned()
    }
}

type TestResolver = SessionResolver<FakeBackend, TestStore, FakeNav>;

fn options() -> ResolverOptions {
    ResolverOptions { settle_delay: Duration::from_millis(100), callback_route: "/auth/callback".to_owned() }
}

fn resolver(backend: FakeBackend, nav: FakeNav) -> (TestResolver, Rc<FakeBackend>) {
    let backend = Rc::new(backend);
    let resolver = SessionResolver::new(Rc::clone(&backend), TestStore::default(), nav, options());
    (resolver, backend)
}

fn run_inline(resolver: &TestResolver) {
    resolver.subscribe(|fut| block_on(fut));
}

// =============================================================
// Initialization
// =============================================================

#[test]
fn stored_session_without_restaurant_settles_unlinked() {
    let backend = FakeBackend::default().with_restaurants("u1", 0);
    *backend.stored.borrow_mut() = Some(session("u1"));
    let (resolver, backend) = resolver(backend, FakeNav::at("https://app.example.test/dashboard"));

    block_on(resolver.initialize());

    let state = resolver.state();
    assert_eq!(state.restaurant, RestaurantLink::Unlinked);
    assert!(!state.loading);
    assert_eq!(*backend.checks.borrow(), vec!["u1".to_owned()]);
}

#[test]
fn stored_session_with_restaurant_is_ready() {
    let backend = FakeBackend::default().with_restaurants("u1", 2);
    *backend.stored.borrow_mut() = Some(session("u1"));
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/dashboard"));

    block_on(resolver.initialize());

    assert_eq!(resolve_guard(&resolver.state()), GuardState::Ready);
}

#[test]
fn failed_existence_check_resolves_to_unlinked() {
    let backend = FakeBackend::default();
    backend
        .restaurants
        .borrow_mut()
        .insert("u1".to_owned(), Err(ApiError::new(Some(503), "unavailable")));
    *backend.stored.borrow_mut() = Some(session("u1"));
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/"));

    block_on(resolver.initialize());

    assert_eq!(resolver.state().restaurant, RestaurantLink::Unlinked);
    assert!(!resolver.state().loading);
}

#[test]
fn no_stored_session_is_unauthenticated() {
    let (resolver, backend) = resolver(FakeBackend::default(), FakeNav::at("https://app.example.test/"));

    block_on(resolver.initialize());

    assert_eq!(resolve_guard(&resolver.state()), GuardState::Unauthenticated);
    assert!(backend.checks.borrow().is_empty());
}

#[test]
fn get_session_error_stops_loading() {
    let backend = FakeBackend::default();
    *backend.stored_error.borrow_mut() = Some(AuthError::Network("offline".to_owned()));
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/"));

    block_on(resolver.initialize());

    assert!(!resolver.state().loading);
    assert_eq!(resolve_guard(&resolver.state()), GuardState::Unauthenticated);
}

#[test]
fn callback_tokens_skip_check_strip_url_and_route_to_onboarding() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    *backend.set_session_result.borrow_mut() = Some(Ok(session("u1")));
    let nav = FakeNav::at("https://app.example.test/auth/callback#access_token=at&refresh_token=rt&type=magiclink");
    let replaced = Rc::clone(&nav.replaced);
    let (resolver, backend) = resolver(backend, nav);

    block_on(resolver.initialize());

    let state = resolver.state();
    assert_eq!(state.restaurant, RestaurantLink::Unlinked);
    assert!(backend.checks.borrow().is_empty());
    assert_eq!(*backend.set_session_calls.borrow(), vec![("at".to_owned(), "rt".to_owned(), None)]);
    assert_eq!(*replaced.borrow(), vec!["https://app.example.test/auth/callback".to_owned()]);
    assert_eq!(resolve_guard(&state), GuardState::NeedsOnboarding);
}

#[test]
fn callback_session_carries_token_expiry() {
    let backend = FakeBackend::default();
    *backend.set_session_result.borrow_mut() = Some(Ok(session("u1")));
    let nav = FakeNav::at(
        "https://app.example.test/auth/callback#access_token=at&refresh_token=rt&expires_in=3600&expires_at=1700000000&type=magiclink",
    );
    let replaced = Rc::clone(&nav.replaced);
    let (resolver, backend) = resolver(backend, nav);

    block_on(resolver.initialize());

    assert_eq!(
        *backend.set_session_calls.borrow(),
        vec![("at".to_owned(), "rt".to_owned(), Some(1_700_000_000))]
    );
    assert_eq!(*replaced.borrow(), vec!["https://app.example.test/auth/callback".to_owned()]);
}

#[test]
fn rejected_callback_tokens_are_still_stripped_and_fall_back() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    *backend.set_session_result.borrow_mut() = Some(Err(AuthError::Provider {
        status: Some(401),
        message: "Invalid token".to_owned(),
    }));
    *backend.stored.borrow_mut() = Some(session("u1"));
    let nav = FakeNav::at("https://app.example.test/auth/callback?access_token=bad&refresh_token=bad");
    let replaced = Rc::clone(&nav.replaced);
    let (resolver, _) = resolver(backend, nav);

    block_on(resolver.initialize());

    assert_eq!(replaced.borrow().len(), 1);
    assert_eq!(resolver.state().restaurant, RestaurantLink::Linked);
}

// =============================================================
// Auth-state changes
// =============================================================

#[test]
fn same_user_events_check_at_most_once() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    let (resolver, backend) = resolver(backend, FakeNav::at("https://app.example.test/"));
    block_on(resolver.initialize());
    run_inline(&resolver);

    backend.emit(AuthEvent::SignedIn, Some(session("u1")));
    backend.emit(AuthEvent::TokenRefreshed, Some(session("u1")));
    backend.emit(AuthEvent::SignedIn, Some(session("u1")));

    assert_eq!(backend.checks.borrow().len(), 1);
    assert_eq!(resolver.state().restaurant, RestaurantLink::Linked);
}

#[test]
fn switching_users_rechecks_new_identity() {
    let backend = FakeBackend::default().with_restaurants("u1", 1).with_restaurants("u2", 0);
    *backend.stored.borrow_mut() = Some(session("u1"));
    let (resolver, backend) = resolver(backend, FakeNav::at("https://app.example.test/"));
    block_on(resolver.initialize());
    run_inline(&resolver);

    backend.emit(AuthEvent::SignedIn, Some(session("u2")));

    assert_eq!(*backend.checks.borrow(), vec!["u1".to_owned(), "u2".to_owned()]);
    assert_eq!(resolver.state().user_id(), Some("u2"));
    assert_eq!(resolver.state().restaurant, RestaurantLink::Unlinked);
}

#[test]
fn signed_out_event_resets_link_to_unknown() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    *backend.stored.borrow_mut() = Some(session("u1"));
    let (resolver, backend) = resolver(backend, FakeNav::at("https://app.example.test/"));
    block_on(resolver.initialize());
    run_inline(&resolver);

    backend.emit(AuthEvent::SignedOut, None);

    let state = resolver.state();
    assert!(state.session.is_none());
    assert_eq!(state.restaurant, RestaurantLink::Unknown);
}

#[test]
fn late_check_for_superseded_identity_is_ignored() {
    let backend = FakeBackend::default();
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/"));
    resolver.store.dispatch(SessionEvent::StoredSession(Some(session("u2"))));

    // A result for u1 arriving after the switch to u2.
    resolver.store.dispatch(SessionEvent::RestaurantChecked { user_id: "u1".to_owned(), linked: true });

    assert_eq!(resolver.state().restaurant, RestaurantLink::Unknown);
    assert_eq!(resolve_guard(&resolver.state()), GuardState::Loading);
}

// =============================================================
// Explicit operations
// =============================================================

#[test]
fn sign_in_passes_callback_redirect() {
    let (resolver, backend) = resolver(FakeBackend::default(), FakeNav::at("https://app.example.test/login"));

    block_on(resolver.sign_in_with_one_time_link("chef@example.com")).unwrap();

    assert_eq!(
        *backend.otp_calls.borrow(),
        vec![("chef@example.com".to_owned(), "https://app.example.test/auth/callback".to_owned())]
    );
}

#[test]
fn sign_in_propagates_provider_rejection() {
    let backend = FakeBackend::default();
    *backend.otp_error.borrow_mut() = Some(AuthError::Provider {
        status: Some(429),
        message: "Email rate limit exceeded".to_owned(),
    });
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/login"));

    let err = block_on(resolver.sign_in_with_one_time_link("chef@example.com")).unwrap_err();
    assert_eq!(err.to_string(), "Email rate limit exceeded");
}

#[test]
fn sign_out_clears_state_even_when_provider_fails() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    *backend.stored.borrow_mut() = Some(session("u1"));
    *backend.sign_out_error.borrow_mut() = Some(AuthError::Network("offline".to_owned()));
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/"));
    block_on(resolver.initialize());

    block_on(resolver.sign_out());

    let state = resolver.state();
    assert!(state.session.is_none());
    assert_eq!(state.restaurant, RestaurantLink::Unknown);
}

#[test]
fn sign_out_while_ticking_unmounts_countdown() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    *backend.stored.borrow_mut() = Some(session("u1"));
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/dashboard"));
    block_on(resolver.initialize());
    assert_eq!(resolve_guard(&resolver.state()), GuardState::Ready);

    // The protected view's scope owns the countdown ticker.
    let view_scope = Owner::new();
    let stop = view_scope.with(|| Ticker::scoped(Duration::from_secs(1), || {}));
    assert!(stop.is_running());

    block_on(resolver.sign_out());
    assert_ne!(resolve_guard(&resolver.state()), GuardState::Ready);
    view_scope.cleanup();

    assert!(!stop.is_running());
    assert_eq!(resolver.state(), SessionState { session: None, restaurant: RestaurantLink::Unknown, loading: false });
}

#[test]
fn refresh_restaurant_link_without_identity_is_false() {
    let (resolver, backend) = resolver(FakeBackend::default(), FakeNav::at("https://app.example.test/"));
    assert!(!block_on(resolver.refresh_restaurant_link()));
    assert!(backend.checks.borrow().is_empty());
}

#[test]
fn refresh_restaurant_link_picks_up_new_registration() {
    let backend = FakeBackend::default().with_restaurants("u1", 0);
    *backend.set_session_result.borrow_mut() = Some(Ok(session("u1")));
    let nav = FakeNav::at("https://app.example.test/auth/callback#access_token=a&refresh_token=r");
    let (resolver, backend) = resolver(backend, nav);
    block_on(resolver.initialize());

    backend
        .restaurants
        .borrow_mut()
        .insert("u1".to_owned(), Ok(vec![RestaurantRow { id: "r1".to_owned() }]));

    assert!(block_on(resolver.refresh_restaurant_link()));
    assert_eq!(resolve_guard(&resolver.state()), GuardState::Ready);
}

// =============================================================
// Teardown
// =============================================================

#[test]
fn teardown_unsubscribes_and_ignores_later_events() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    let (resolver, backend) = resolver(backend, FakeNav::at("https://app.example.test/"));
    block_on(resolver.initialize());
    run_inline(&resolver);
    assert_eq!(backend.registry.len(), 1);

    resolver.teardown();
    backend.emit(AuthEvent::SignedIn, Some(session("u1")));

    assert!(backend.registry.is_empty());
    assert!(resolver.state().session.is_none());
    assert!(backend.checks.borrow().is_empty());
}

#[test]
fn continuation_after_teardown_does_not_write() {
    let backend = FakeBackend::default().with_restaurants("u1", 1);
    *backend.stored.borrow_mut() = Some(session("u1"));
    let (resolver, _) = resolver(backend, FakeNav::at("https://app.example.test/"));

    resolver.teardown();
    block_on(resolver.initialize());

    assert_eq!(resolver.state(), SessionState::default());
}
