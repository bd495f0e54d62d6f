//! Landing route for one-time sign-in links.
//!
//! The resolver consumes the link's tokens during startup; this page only
//! waits for it to settle and forwards the user to onboarding, the dashboard,
//! or back to login.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::components::spinner::Spinner;
use crate::config::AppConfig;
use crate::util::route_guard::{GuardState, guard_memo, install_route_guard};

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let config = expect_context::<AppConfig>();

    let guard = guard_memo(session.state);
    install_route_guard(guard, config.routes, GuardState::landing_target, use_navigate());

    view! {
        <div class="callback-page">
            <Spinner label="Confirming your access..." />
        </div>
    }
}
