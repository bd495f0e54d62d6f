//! Public OSC page for answering a donation offer by security code.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reached from the link sent to the social organization; no session is
//! required. The OSC sees the donation's status, a live countdown while it is
//! pending, and the packages on offer, and may accept or deny until the
//! deadline passes. Every action is followed by a re-fetch; the status shown
//! is always the server's.

#[cfg(test)]
#[path = "confirm_donation_test.rs"]
mod confirm_donation_test;

use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::countdown_panel::CountdownPanel;
use crate::components::spinner::Spinner;
use crate::components::status_badge::DonationStatusBadge;
use crate::components::toast::{Toast, Toasts};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::net::api::{self, DonationAction};
use crate::net::types::{DonationRecord, DonationStatus};
use crate::util::countdown::Countdown;
use crate::util::format::{format_decimal, format_weight};

/// Accept/deny is offered only for a pending donation whose deadline has not passed.
fn can_respond(donation: &DonationRecord, now: DateTime<Utc>) -> bool {
    donation.status == DonationStatus::Pending
        && donation.expires_at.is_none_or(|at| !Countdown::between(now, at).is_expired)
}

fn success_message(action: DonationAction) -> Option<&'static str> {
    match action {
        DonationAction::Accept => Some("Donation accepted! The restaurant has been notified."),
        DonationAction::Deny => Some("Donation denied. The restaurant has been notified."),
        DonationAction::Details | DonationAction::Release => None,
    }
}

/// Dismissable notification for a failed accept/deny.
fn failure_toast(action: DonationAction, err: &ApiError) -> Toast {
    let title = match action {
        DonationAction::Accept => "Could not accept donation",
        DonationAction::Deny => "Could not deny donation",
        DonationAction::Details | DonationAction::Release => "Request failed",
    };
    Toast::error(title, err)
}

#[derive(Clone, Debug, Default)]
struct ConfirmState {
    donation: Option<DonationRecord>,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
    pending_action: Option<DonationAction>,
}

fn fetch_details(config: AppConfig, code: String, state: RwSignal<ConfirmState>) {
    if code.trim().is_empty() {
        state.update(|s| {
            s.loading = false;
            s.error = Some(DonationAction::Details.fallback_message().to_owned());
        });
        return;
    }
    leptos::task::spawn_local(async move {
        let result = api::fetch_donation_details(&config, &code).await;
        state.update(|s| {
            s.loading = false;
            match result {
                Ok(donation) => s.donation = Some(donation),
                Err(err) => {
                    log::warn!("donation {code} not loaded: {err}");
                    s.error = Some(err.message);
                }
            }
        });
    });
}

#[component]
pub fn ConfirmDonationPage() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let toasts = expect_context::<Toasts>();
    let params = use_params_map();
    let code = Memo::new(move |_| params.read().get("code").unwrap_or_default());

    let state = RwSignal::new(ConfirmState { loading: true, ..ConfirmState::default() });
    let expired = RwSignal::new(false);

    {
        let config = config.clone();
        Effect::new(move || {
            let code = code.get();
            expired.set(false);
            state.set(ConfirmState { loading: true, ..ConfirmState::default() });
            fetch_details(config.clone(), code, state);
        });
    }

    let respond = {
        let config = config.clone();
        move |action: DonationAction| {
            if state.with_untracked(|s| s.pending_action.is_some()) {
                return;
            }
            let config = config.clone();
            let code = code.get_untracked();
            state.update(|s| {
                s.pending_action = Some(action);
                s.error = None;
                s.success = None;
            });
            leptos::task::spawn_local(async move {
                let result = match action {
                    DonationAction::Accept => api::accept_donation(&config, &code).await,
                    _ => api::deny_donation(&config, &code).await,
                };
                match result {
                    Ok(()) => {
                        state.update(|s| {
                            s.pending_action = None;
                            s.success = success_message(action).map(str::to_owned);
                        });
                        fetch_details(config, code, state);
                    }
                    Err(err) => {
                        log::warn!("{} for {code} failed: {err}", action.function_name());
                        state.update(|s| s.pending_action = None);
                        toasts.show(failure_toast(action, &err));
                    }
                }
            });
        }
    };
    let on_accept = {
        let respond = respond.clone();
        move |_| respond(DonationAction::Accept)
    };
    let on_deny = move |_| respond(DonationAction::Deny);
    let on_expire = Callback::new(move |()| {
        if !expired.get_untracked() {
            expired.set(true);
        }
    });

    let threshold = config.urgency_threshold_hours;
    let tick_ms = config.countdown_tick_ms;
    let busy = move || state.with(|s| s.pending_action.is_some());
    let action_label = move |action: DonationAction, idle: &'static str, working: &'static str| {
        if state.with(|s| s.pending_action == Some(action)) { working } else { idle }
    };

    view! {
        <div class="confirm-page">
            <header class="confirm-header">
                <h1>"Donation offer"</h1>
                <p class="confirm-header__code">{move || code.get()}</p>
            </header>

            <Show when=move || state.with(|s| s.success.is_some())>
                <p class="form-success">{move || state.with(|s| s.success.clone().unwrap_or_default())}</p>
            </Show>
            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="form-error">{move || state.with(|s| s.error.clone().unwrap_or_default())}</p>
            </Show>

            {move || {
                let snapshot = state.get();
                if snapshot.loading && snapshot.donation.is_none() {
                    return view! { <Spinner label="Loading donation..." /> }.into_any();
                }
                let Some(donation) = snapshot.donation else {
                    return view! { <a class="link-button" href="/">"Back"</a> }.into_any();
                };
                let pending = donation.status == DonationStatus::Pending;
                let countdown = donation
                    .expires_at
                    .filter(|_| pending)
                    .map(|at| {
                        view! {
                            <CountdownPanel
                                expires_at=at
                                urgency_threshold_hours=threshold
                                tick_ms=tick_ms
                                on_expire=on_expire
                            />
                        }
                    });
                let open = can_respond(&donation, Utc::now()) && !expired.get();
                let created = donation.created_at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string();
                let restaurant = donation.restaurant.clone().unwrap_or_default();
                let total = format!("{} kg", format_weight(Some(donation.total_kg())));
                let package_count = donation.packages.len();
                let packages = donation
                    .packages
                    .into_iter()
                    .map(|pkg| {
                        let quantity = format!("{} {}", format_decimal(Some(pkg.quantity), 0), pkg.unit);
                        view! {
                            <li class="package-row">
                                <span class="package-row__name">{pkg.item_name}</span>
                                <span>{quantity}</span>
                                {pkg.total_kg.map(|kg| view! { <span>{format!("{} kg", format_weight(Some(kg)))}</span> })}
                            </li>
                        }
                    })
                    .collect_view();
                let on_accept = on_accept.clone();
                let on_deny = on_deny.clone();

                view! {
                    {countdown}
                    <section class="confirm-summary">
                        <DonationStatusBadge status=donation.status.clone() />
                        <p class="confirm-summary__restaurant">{restaurant}</p>
                        <p class="confirm-summary__created">"Created " {created}</p>
                    </section>
                    <section class="confirm-packages">
                        <h2>{format!("Included packages ({package_count})")}</h2>
                        <ul>{packages}</ul>
                        <p class="confirm-packages__total">"Total: " {total}</p>
                    </section>
                    <Show when=move || open>
                        <section class="confirm-actions">
                            <p>"This donation is waiting for your answer. You can accept or deny it."</p>
                            <button class="primary-button" disabled=busy on:click=on_accept.clone()>
                                {move || action_label(DonationAction::Accept, "Accept donation", "Accepting...")}
                            </button>
                            <button class="danger-button" disabled=busy on:click=on_deny.clone()>
                                {move || action_label(DonationAction::Deny, "Deny donation", "Denying...")}
                            </button>
                        </section>
                    </Show>
                    <Show when=move || pending && !open>
                        <section class="confirm-expired">
                            <p>"The deadline to answer this donation offer has passed. It is no longer available."</p>
                            <p>"Contact the restaurant if you are still interested in the items."</p>
                        </section>
                    </Show>
                }
                    .into_any()
            }}

            <footer class="confirm-footer">
                <p>
                    <strong>"Important: "</strong>
                    "after accepting, you will receive pickup instructions. Make sure your organization can receive and distribute these items properly."
                </p>
            </footer>
        </div>
    }
}
