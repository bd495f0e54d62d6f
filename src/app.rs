//! Root component: configuration, session wiring, and the route table.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is mounted once on `<body>`. It resolves build-time configuration,
//! creates the single session store and its resolver, and provides both to
//! every route through context. Only the resolver writes the session; pages
//! read it through `SessionHandle::state` and call resolver operations.

use std::rc::Rc;
use std::sync::OnceLock;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::{StaticSegment, path};

use crate::components::protected_route::ProtectedRoute;
use crate::components::toast::{ToastHost, Toasts};
use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::net::backend::BackendClient;
use crate::pages::auth_callback::AuthCallbackPage;
use crate::pages::confirm_donation::ConfirmDonationPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;
use crate::pages::onboarding::OnboardingPage;
use crate::state::resolver::{ResolverOptions, SessionResolver};
use crate::state::session::SessionState;
use crate::util::location::BrowserLocation;

/// The resolver as wired in the browser.
pub type AppResolver = SessionResolver<BackendClient, RwSignal<SessionState>, BrowserLocation>;

/// Read access to the session plus the resolver that owns it.
#[derive(Clone, Copy)]
pub struct SessionHandle {
    pub state: Signal<SessionState>,
    resolver: StoredValue<AppResolver, LocalStorage>,
}

impl SessionHandle {
    /// The resolver, or `None` once the app has been torn down.
    pub fn resolver(&self) -> Option<AppResolver> {
        self.resolver.try_get_value()
    }
}

static CONFIG: OnceLock<Result<AppConfig, ConfigError>> = OnceLock::new();

/// Parsed once; routes borrow their paths from it for the app lifetime.
fn app_config() -> &'static Result<AppConfig, ConfigError> {
    CONFIG.get_or_init(AppConfig::from_build_env)
}

fn segment(route: &'static str) -> StaticSegment<&'static str> {
    StaticSegment(route.trim_start_matches('/'))
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    match app_config() {
        Ok(config) => view! { <SessionRoot config=config /> }.into_any(),
        Err(err) => {
            log::error!("dashboard configuration invalid: {err}");
            view! { <ConfigErrorScreen message=err.to_string() /> }.into_any()
        }
    }
}

#[component]
fn ConfigErrorScreen(message: String) -> impl IntoView {
    view! {
        <Title text="Configuration error" />
        <div class="config-error">
            <h1>"The dashboard is not configured"</h1>
            <p>{message}</p>
        </div>
    }
}

#[component]
fn SessionRoot(config: &'static AppConfig) -> impl IntoView {
    provide_context(config.clone());
    provide_context(Toasts::new());

    let session = RwSignal::new(SessionState::default());
    let client = Rc::new(BackendClient::new(config));
    let resolver: AppResolver =
        SessionResolver::new(client, session, BrowserLocation, ResolverOptions::from(config));

    resolver.subscribe(|task| leptos::task::spawn_local(task));
    let init = resolver.clone();
    leptos::task::spawn_local(async move { init.initialize().await });

    let stored = StoredValue::new_local(resolver);
    provide_context(SessionHandle { state: session.into(), resolver: stored });
    on_cleanup(move || {
        if let Some(resolver) = stored.try_get_value() {
            resolver.teardown();
        }
    });

    let routes = &config.routes;
    let login_path = routes.login.as_str();

    view! {
        <Title text="Donation Dashboard" />
        <Router>
            <ToastHost />
            <main class="app-main">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=segment(routes.login.as_str()) view=LoginPage />
                    <Route path=segment(routes.callback.as_str()) view=AuthCallbackPage />
                    <Route path=segment(routes.onboarding.as_str()) view=OnboardingPage />
                    <Route
                        path=segment(routes.dashboard.as_str())
                        view=|| view! { <ProtectedRoute><DashboardPage /></ProtectedRoute> }
                    />
                    <Route path=path!("/confirm-donation/:code") view=ConfirmDonationPage />
                    <Route path=path!("/") view=move || view! { <Redirect path=login_path /> } />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"Page not found"</h1>
            <a href="/">"Back to start"</a>
        </div>
    }
}
