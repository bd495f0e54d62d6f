//! Loading indicator shared by guarded routes and data fetches.

use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="spinner" role="status" aria-live="polite">
            <div class="spinner__ring"></div>
            {label.map(|text| view! { <p class="spinner__label">{text}</p> })}
        </div>
    }
}
