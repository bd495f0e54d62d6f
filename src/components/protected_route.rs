//! Wrapper that renders its children only for a signed-in restaurant owner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route goes through this component so redirect behavior is
//! identical everywhere: a spinner while the session or restaurant check is
//! resolving, login when nobody is signed in, onboarding when the identity
//! has no restaurant yet.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::components::spinner::Spinner;
use crate::config::AppConfig;
use crate::util::route_guard::{GuardState, guard_memo, install_route_guard};

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let config = expect_context::<AppConfig>();

    let guard = guard_memo(session.state);
    install_route_guard(guard, config.routes, GuardState::redirect_target, use_navigate());

    view! {
        <Show
            when=move || guard.get() == GuardState::Ready
            fallback=|| view! { <Spinner label="Checking your session..." /> }
        >
            {children()}
        </Show>
    }
}
