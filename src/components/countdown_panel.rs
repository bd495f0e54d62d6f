//! Live countdown to a donation's response deadline.
//!
//! DESIGN
//! ======
//! The panel owns one `Ticker` for as long as it is mounted. Each tick only
//! refreshes `now`; the countdown itself is a memo over `now`, so the view
//! recomputes from the deadline instead of decrementing local state. Once the
//! deadline passes the ticker stops, and unmounting drops it.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;

use crate::util::countdown::Countdown;
use crate::util::timer::Ticker;

#[component]
pub fn CountdownPanel(
    expires_at: DateTime<Utc>,
    urgency_threshold_hours: u64,
    tick_ms: u64,
    /// Runs once when the deadline passes while mounted (or immediately if already past).
    #[prop(optional)]
    on_expire: Option<Callback<()>>,
) -> impl IntoView {
    let now = RwSignal::new(Utc::now());
    let countdown = Memo::new(move |_| Countdown::between(now.get(), expires_at));

    let stop = Ticker::scoped(Duration::from_millis(tick_ms), move || now.set(Utc::now()));
    Effect::new(move || {
        if countdown.get().is_expired && stop.is_running() {
            stop.stop();
            if let Some(on_expire) = on_expire {
                on_expire.run(());
            }
        }
    });
    let deadline = expires_at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string();

    let panel_class = move || {
        let c = countdown.get();
        if c.is_expired {
            "countdown countdown--expired"
        } else if c.is_urgent(urgency_threshold_hours) {
            "countdown countdown--urgent"
        } else {
            "countdown"
        }
    };

    view! {
        <div class=panel_class>
            <Show
                when=move || !countdown.get().is_expired
                fallback=|| {
                    view! {
                        <p class="countdown__title">"Response time expired"</p>
                        <p class="countdown__hint">"This donation can no longer be accepted or denied."</p>
                    }
                }
            >
                <p class="countdown__title">"Time left to respond"</p>
                <p class="countdown__clock">{move || countdown.get().clock()}</p>
                <p class="countdown__hint">
                    {move || {
                        if countdown.get().is_urgent(urgency_threshold_hours) {
                            "Hurry! Little time left to respond."
                        } else {
                            "Deadline to accept or deny the donation"
                        }
                    }}
                </p>
                <p class="countdown__deadline">"Expires at: " {deadline.clone()}</p>
            </Show>
        </div>
    }
}
