//! Colored badge for a donation status.

use leptos::prelude::*;

use crate::net::types::DonationStatus;
use crate::util::status::project_status;

#[component]
pub fn DonationStatusBadge(status: DonationStatus) -> impl IntoView {
    let badge = project_status(&status);
    let class = format!("badge {}", badge.tone.css_class());
    view! {
        <span class=class data-status=status.as_str().to_owned()>
            <span class="badge__icon" aria-hidden="true">{badge.icon.glyph()}</span>
            <span class="badge__label">{badge.label.into_owned()}</span>
        </span>
    }
}
