//! Onboarding page: register the restaurant for a freshly signed-in identity.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reached when the session has an identity but no restaurant. After a
//! successful registration the resolver re-checks ownership; the guard on
//! this page then moves the user to the dashboard.

#[cfg(test)]
#[path = "onboarding_test.rs"]
mod onboarding_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::components::spinner::Spinner;
use crate::config::AppConfig;
use crate::net::api::{self, RestaurantRegistration};
use crate::util::route_guard::{GuardState, guard_memo, install_route_guard};

fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Validate the form and normalize phone and postal code to digits only.
fn validate_registration(name: &str, phone: &str, cep: &str) -> Result<RestaurantRegistration, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Enter the restaurant name.");
    }
    let phone = digits(phone);
    if !(10..=11).contains(&phone.len()) {
        return Err("Enter a phone number with area code.");
    }
    let cep = digits(cep);
    if cep.len() != 8 {
        return Err("Enter an 8-digit postal code (CEP).");
    }
    Ok(RestaurantRegistration { name: name.to_owned(), phone, cep })
}

#[component]
pub fn OnboardingPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let config = expect_context::<AppConfig>();

    let guard = guard_memo(session.state);
    install_route_guard(guard, config.routes.clone(), GuardState::onboarding_redirect, use_navigate());

    let name = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let cep = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get() {
            return;
        }
        let registration = match validate_registration(&name.get(), &phone.get(), &cep.get()) {
            Ok(registration) => registration,
            Err(message) => {
                error.set(Some(message.to_owned()));
                return;
            }
        };
        let Some(token) = session.state.with(|s| s.access_token().map(str::to_owned)) else {
            error.set(Some("Invalid session. Please sign in again.".to_owned()));
            return;
        };
        let Some(resolver) = session.resolver() else {
            return;
        };
        let config = config.clone();
        error.set(None);
        saving.set(true);

        leptos::task::spawn_local(async move {
            match api::register_restaurant(&config, &token, &registration).await {
                Ok(()) => {
                    log::info!("restaurant registered: {}", registration.name);
                    if !resolver.refresh_restaurant_link().await {
                        error.set(Some("Registration saved, but it is not visible yet. Try again shortly.".to_owned()));
                    }
                }
                Err(err) => error.set(Some(err.message)),
            }
            saving.set(false);
        });
    };

    let on_sign_out = move |_| {
        if let Some(resolver) = session.resolver() {
            leptos::task::spawn_local(async move { resolver.sign_out().await });
        }
    };

    view! {
        <Show
            when=move || guard.get() == GuardState::NeedsOnboarding
            fallback=|| view! { <Spinner /> }
        >
            <div class="onboarding-page">
                <div class="onboarding-card">
                    <h1>"Almost there!"</h1>
                    <p class="onboarding-card__subtitle">
                        "Tell us about your restaurant to join the donation network."
                    </p>
                    <Show when=move || error.get().is_some()>
                        <p class="form-error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <form class="onboarding-form" on:submit=on_submit.clone()>
                        <label for="restaurant-name">"Restaurant name"</label>
                        <input
                            id="restaurant-name"
                            type="text"
                            required
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                        <label for="restaurant-phone">"Phone"</label>
                        <input
                            id="restaurant-phone"
                            type="tel"
                            required
                            placeholder="(11) 99999-9999"
                            prop:value=move || phone.get()
                            on:input=move |ev| phone.set(event_target_value(&ev))
                        />
                        <label for="restaurant-cep">"Postal code (CEP)"</label>
                        <input
                            id="restaurant-cep"
                            type="text"
                            required
                            placeholder="00000-000"
                            prop:value=move || cep.get()
                            on:input=move |ev| cep.set(event_target_value(&ev))
                        />
                        <button class="primary-button" type="submit" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving..." } else { "Finish registration" }}
                        </button>
                    </form>
                    <button class="link-button" on:click=on_sign_out>"Sign out"</button>
                </div>
            </div>
        </Show>
    }
}
