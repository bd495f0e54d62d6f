//! Restaurant dashboard: donation list with search, status filter, and release flow.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected landing route. Donations are fetched once the session is known
//! and re-fetched after every release; the page never edits a donation's
//! status locally.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::time::Duration;

use chrono::{DateTime, Utc};
use leptos::prelude::*;

use crate::app::SessionHandle;
use crate::components::donation_card::DonationCard;
use crate::components::spinner::Spinner;
use crate::components::toast::{Toast, Toasts};
use crate::config::AppConfig;
use crate::net::api::{self, ReleaseReceipt};
use crate::net::types::DonationRecord;
use crate::state::donations::{DonationFilter, DonationsState, FILTERABLE_STATUSES};
use crate::util::format::format_decimal;
use crate::util::status::project_status;
use crate::util::timer::Ticker;

/// Package deadlines are shown in whole hours; refresh them once a minute.
const PACKAGE_CLOCK_PERIOD: Duration = Duration::from_secs(60);

fn validate_release_code(input: &str) -> Result<String, &'static str> {
    let code = input.trim();
    if code.is_empty() {
        return Err("Enter the security code shown by the OSC.");
    }
    Ok(code.to_owned())
}

fn empty_message(filter_active: bool) -> &'static str {
    if filter_active {
        "Try adjusting the search filters."
    } else {
        "Your donations will appear here once you send packages."
    }
}

fn load_donations(config: AppConfig, token: String, user_id: String, donations: RwSignal<DonationsState>) {
    donations.update(|s| {
        s.loading = true;
        s.error = None;
    });
    leptos::task::spawn_local(async move {
        let result = api::fetch_restaurant_donations(&config, &token, &user_id).await;
        donations.update(|s| {
            s.loading = false;
            match result {
                Ok(items) => s.items = items,
                Err(err) => {
                    log::warn!("loading donations failed: {err}");
                    s.error = Some(err.message);
                }
            }
        });
    });
}

#[component]
fn DonationSection(
    title: &'static str,
    items: Vec<DonationRecord>,
    now: ReadSignal<DateTime<Utc>>,
) -> impl IntoView {
    if items.is_empty() {
        return None;
    }
    let heading = format!("{title} ({})", items.len());
    Some(view! {
        <section class="donation-section">
            <h2>{heading}</h2>
            <div class="donation-grid">
                {move || {
                    items
                        .iter()
                        .cloned()
                        .map(|donation| view! { <DonationCard donation=donation now=now.get() /> })
                        .collect_view()
                }}
            </div>
        </section>
    })
}

#[component]
fn ReleaseReceiptModal(receipt: ReleaseReceipt, on_close: Callback<()>) -> impl IntoView {
    let osc = receipt.osc_name.unwrap_or_else(|| "the OSC".to_owned());
    view! {
        <div class="dialog-backdrop">
            <div class="dialog dialog--wide">
                <h2>"Donation released!"</h2>
                <p>"Hand the following packages to " <strong>{osc}</strong></p>
                <ul class="receipt-list">
                    {receipt
                        .packages
                        .into_iter()
                        .map(|pkg| {
                            let quantity = format!("{} {}", format_decimal(Some(pkg.quantity), 0), pkg.unit);
                            view! {
                                <li class="receipt-list__item">
                                    <p class="receipt-list__label">
                                        "Package label: " {pkg.label_code.unwrap_or_default()}
                                    </p>
                                    <p class="receipt-list__name">{pkg.item_name}</p>
                                    <p>"Quantity: " {quantity}</p>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <button class="primary-button" on:click=move |_| on_close.run(())>"Close"</button>
            </div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let config = expect_context::<AppConfig>();
    let toasts = expect_context::<Toasts>();

    let donations = RwSignal::new(DonationsState { loading: true, ..DonationsState::default() });

    let (now, set_now) = signal(Utc::now());
    let _package_clock = Ticker::scoped(PACKAGE_CLOCK_PERIOD, move || set_now.set(Utc::now()));

    // Identity only: token refreshes must not trigger a reload.
    let user_id = Memo::new(move |_| session.state.with(|s| s.user_id().map(str::to_owned)));
    let reload = {
        let config = config.clone();
        move || {
            let Some(user_id) = user_id.get_untracked() else {
                return;
            };
            let Some(token) = session.state.with_untracked(|s| s.access_token().map(str::to_owned)) else {
                return;
            };
            load_donations(config.clone(), token, user_id, donations);
        }
    };
    {
        let reload = reload.clone();
        Effect::new(move || {
            if user_id.get().is_some() {
                reload();
            }
        });
    }

    let show_release = RwSignal::new(false);
    let release_code = RwSignal::new(String::new());
    let release_error = RwSignal::new(None::<String>);
    let releasing = RwSignal::new(false);
    let receipt = RwSignal::new(None::<ReleaseReceipt>);

    let close_release = move || {
        show_release.set(false);
        release_code.set(String::new());
        release_error.set(None);
    };

    let on_release = {
        let config = config.clone();
        let reload = reload.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if releasing.get() {
                return;
            }
            let code = match validate_release_code(&release_code.get()) {
                Ok(code) => code,
                Err(message) => {
                    release_error.set(Some(message.to_owned()));
                    return;
                }
            };
            let Some(token) = session.state.with_untracked(|s| s.access_token().map(str::to_owned)) else {
                return;
            };
            let config = config.clone();
            let reload = reload.clone();
            releasing.set(true);
            leptos::task::spawn_local(async move {
                match api::release_donation(&config, &token, &code).await {
                    Ok(result) => {
                        reload();
                        close_release();
                        receipt.set(Some(result));
                        toasts.show(Toast::success(
                            "Donation released!",
                            "The donation was released for pickup.",
                        ));
                    }
                    Err(err) => {
                        log::warn!("release of {code} failed: {err}");
                        toasts.show(Toast::error("Could not release donation", &err));
                    }
                }
                releasing.set(false);
            });
        }
    };

    let on_sign_out = move |_| {
        if let Some(resolver) = session.resolver() {
            leptos::task::spawn_local(async move { resolver.sign_out().await });
        }
    };

    let groups = Memo::new(move |_| donations.with(DonationsState::groups));
    let on_close_receipt = Callback::new(move |()| receipt.set(None));

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <div>
                    <h1>"Donations"</h1>
                    <p class="dashboard-header__user">
                        {move || session.state.with(|s| s.email().unwrap_or_default().to_owned())}
                    </p>
                </div>
                <button class="link-button" on:click=on_sign_out>"Sign out"</button>
            </header>

            <Show when=move || donations.with(DonationsState::has_accepted)>
                <div class="release-cta">
                    <div>
                        <h2>"Donations ready for pickup"</h2>
                        <p>"Release a donation and ask the OSC for its security code."</p>
                    </div>
                    <button class="primary-button" on:click=move |_| show_release.set(true)>
                        "Release donation"
                    </button>
                </div>
            </Show>

            <div class="donation-filters">
                <input
                    type="search"
                    placeholder="Search by security code..."
                    prop:value=move || donations.with(|s| s.filter.search.clone())
                    on:input=move |ev| donations.update(|s| s.filter.search = event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    donations.update(|s| s.filter.status = DonationFilter::status_from_select(&event_target_value(&ev)));
                }>
                    <option value="all">"All statuses"</option>
                    {FILTERABLE_STATUSES
                        .iter()
                        .map(|status| {
                            let label = project_status(status).label.into_owned();
                            view! { <option value=status.as_str().to_owned()>{label}</option> }
                        })
                        .collect_view()}
                </select>
            </div>

            <Show when=move || donations.with(|s| s.error.is_some())>
                <p class="form-error">{move || donations.with(|s| s.error.clone().unwrap_or_default())}</p>
            </Show>

            <Show
                when=move || !donations.with(|s| s.loading && s.items.is_empty())
                fallback=|| view! { <Spinner label="Loading donations..." /> }
            >
                {move || {
                    let g = groups.get();
                    if g.matched == 0 {
                        let message = empty_message(donations.with(|s| s.filter.is_active()));
                        view! {
                            <div class="empty-state">
                                <h2>"No donations found"</h2>
                                <p>{message}</p>
                            </div>
                        }
                            .into_any()
                    } else {
                        view! {
                            <DonationSection title="Accepted by OSC" items=g.accepted now=now />
                            <DonationSection title="Pending" items=g.pending now=now />
                            <DonationSection title="Delivered" items=g.delivered now=now />
                        }
                            .into_any()
                    }
                }}
            </Show>

            <Show when=move || show_release.get()>
                <div class="dialog-backdrop">
                    <form class="dialog" on:submit=on_release.clone()>
                        <h2>"Release donation"</h2>
                        <label for="release-code">"Security code"</label>
                        <input
                            id="release-code"
                            type="text"
                            placeholder="Code provided by the OSC"
                            prop:value=move || release_code.get()
                            on:input=move |ev| {
                                release_code.set(event_target_value(&ev));
                                release_error.set(None);
                            }
                        />
                        <Show when=move || release_error.get().is_some()>
                            <p class="form-error">{move || release_error.get().unwrap_or_default()}</p>
                        </Show>
                        <div class="dialog__actions">
                            <button type="button" class="link-button" on:click=move |_| close_release()>
                                "Cancel"
                            </button>
                            <button type="submit" class="primary-button" disabled=move || releasing.get()>
                                {move || if releasing.get() { "Releasing..." } else { "Release" }}
                            </button>
                        </div>
                    </form>
                </div>
            </Show>

            {move || receipt.get().map(|r| view! { <ReleaseReceiptModal receipt=r on_close=on_close_receipt /> })}
        </div>
    }
}
