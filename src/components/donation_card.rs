//! Card summarizing one donation on the restaurant dashboard.

use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;

use crate::components::status_badge::DonationStatusBadge;
use crate::net::types::{DonationRecord, PackageSnapshot};
use crate::util::format::{format_decimal, format_time_remaining, format_weight};

fn local_datetime(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

#[component]
fn PackageRow(package: PackageSnapshot, now: DateTime<Utc>) -> impl IntoView {
    let quantity = format!("{} {}", format_decimal(Some(package.quantity), 0), package.unit);
    let expires = package.expires_at.map(|at| format_time_remaining(now, at));
    view! {
        <li class="package-row">
            <div class="package-row__main">
                <span class="package-row__name">{package.item_name}</span>
                {package.label_code.map(|code| view! { <span class="package-row__label">{code}</span> })}
            </div>
            <div class="package-row__meta">
                <span>{quantity}</span>
                {package.total_kg.map(|kg| view! { <span>{format!("{} kg", format_weight(Some(kg)))}</span> })}
                {expires.map(|left| view! { <span class="package-row__expires">{format!("Expires in: {left}")}</span> })}
            </div>
        </li>
    }
}

#[component]
pub fn DonationCard(donation: DonationRecord, now: DateTime<Utc>) -> impl IntoView {
    let total = format!("{} kg", format_weight(Some(donation.total_kg())));
    let created = local_datetime(donation.created_at);
    let accepted = donation.accepted_at.map(local_datetime);
    let released = donation.released_at.map(local_datetime);
    let osc = donation.osc_name.clone().unwrap_or_else(|| "OSC not assigned".to_owned());
    let packages = donation.packages.clone();

    view! {
        <article class="donation-card">
            <header class="donation-card__header">
                <div>
                    <p class="donation-card__code">{donation.security_code.clone()}</p>
                    <p class="donation-card__osc">{osc}</p>
                </div>
                <DonationStatusBadge status=donation.status.clone() />
            </header>
            <dl class="donation-card__dates">
                <dt>"Created"</dt>
                <dd>{created}</dd>
                {accepted.map(|at| view! { <dt>"Accepted"</dt> <dd>{at}</dd> })}
                {released.map(|at| view! { <dt>"Released"</dt> <dd>{at}</dd> })}
            </dl>
            <ul class="donation-card__packages">
                {packages.into_iter().map(|package| view! { <PackageRow package=package now=now /> }).collect_view()}
            </ul>
            <footer class="donation-card__total">"Total: " {total}</footer>
        </article>
    }
}
