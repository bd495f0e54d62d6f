//! Login page: request a one-time sign-in link by email.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::config::AppConfig;
use crate::util::route_guard::{GuardState, guard_memo, install_route_guard};

/// Trim the email and check it has a plausible `local@domain.tld` shape.
fn validate_email(input: &str) -> Result<String, &'static str> {
    let email = input.trim();
    if email.is_empty() {
        return Err("Enter your email first.");
    }
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.split('.').count() >= 2
            && domain.split('.').all(|part| !part.is_empty())
    });
    if !valid || email.contains(char::is_whitespace) {
        return Err("Enter a valid email address.");
    }
    Ok(email.to_owned())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let config = expect_context::<AppConfig>();

    // Already signed in: go where the session belongs.
    let guard = guard_memo(session.state);
    install_route_guard(
        guard,
        config.routes,
        |state, routes| match state {
            GuardState::Unauthenticated => None,
            resolved => resolved.landing_target(routes),
        },
        use_navigate(),
    );

    let email = RwSignal::new(String::new());
    let field_error = RwSignal::new(None::<String>);
    let info = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = match validate_email(&email.get()) {
            Ok(value) => value,
            Err(message) => {
                field_error.set(Some(message.to_owned()));
                return;
            }
        };
        let Some(resolver) = session.resolver() else {
            return;
        };
        field_error.set(None);
        info.set(None);
        busy.set(true);

        leptos::task::spawn_local(async move {
            match resolver.sign_in_with_one_time_link(&email_value).await {
                Ok(()) => info.set(Some(format!("We sent an access link to {email_value}. Check your inbox."))),
                Err(err) => field_error.set(Some(err.user_message())),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Restaurant access"</h1>
                <p class="login-card__subtitle">"We will email you a one-time sign-in link."</p>
                <form class="login-form" on:submit=on_submit>
                    <label class="login-label" for="login-email">"Email"</label>
                    <input
                        id="login-email"
                        class="login-input"
                        class:login-input--invalid=move || field_error.get().is_some()
                        type="email"
                        placeholder="you@restaurant.com"
                        prop:value=move || email.get()
                        on:input=move |ev| {
                            email.set(event_target_value(&ev));
                            field_error.set(None);
                        }
                    />
                    <Show when=move || field_error.get().is_some()>
                        <p class="login-field-error">{move || field_error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Sending..." } else { "Send access link" }}
                    </button>
                </form>
                <Show when=move || info.get().is_some()>
                    <p class="login-message">{move || info.get().unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
