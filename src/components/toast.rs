//! Dismissable notification shown after donation actions.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use leptos::prelude::*;

use crate::error::ApiError;

pub const GENERIC_FAILURE: &str = "Please try again in a moment.";

#[cfg(feature = "csr")]
const AUTO_DISMISS: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, title: title.into(), message: message.into() }
    }

    /// Error toast carrying the server's message, or a generic retry hint.
    pub fn error(title: impl Into<String>, err: &ApiError) -> Self {
        let message = err.message.trim();
        let message = if message.is_empty() { GENERIC_FAILURE } else { message };
        Self { kind: ToastKind::Error, title: title.into(), message: message.to_owned() }
    }

    fn class(&self) -> &'static str {
        match self.kind {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
        }
    }
}

/// Shared toast slot. A newer toast replaces the current one.
#[derive(Clone, Copy)]
pub struct Toasts {
    current: RwSignal<Option<(u64, Toast)>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self { current: RwSignal::new(None) }
    }

    pub fn show(&self, toast: Toast) {
        let seq = self.current.with_untracked(|c| c.as_ref().map_or(0, |(seq, _)| seq + 1));
        self.current.set(Some((seq, toast)));

        #[cfg(feature = "csr")]
        {
            let current = self.current;
            leptos::task::spawn_local(async move {
                gloo_timers::future::sleep(AUTO_DISMISS).await;
                // Only dismiss the toast this timer was started for.
                if current.try_with_untracked(|c| c.as_ref().is_some_and(|(s, _)| *s == seq)) == Some(true) {
                    current.set(None);
                }
            });
        }
    }

    pub fn dismiss(&self) {
        self.current.set(None);
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    let current = toasts.current;

    move || {
        current.get().map(|(_, toast)| {
            let class = toast.class();
            view! {
                <div class=class role="alert">
                    <div class="toast__body">
                        <p class="toast__title">{toast.title}</p>
                        <p class="toast__message">{toast.message}</p>
                    </div>
                    <button class="toast__close" aria-label="Dismiss" on:click=move |_| toasts.dismiss()>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
