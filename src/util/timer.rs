//! Browser timers as scoped resources.
//!
//! `Ticker` runs a callback on a fixed period until it is stopped or
//! dropped. Views start it with `Ticker::scoped`, which hands the ticker to
//! the reactive owner's cleanup, so no tick can outlive its view.
//!
//! Outside the browser, `sleep` resolves immediately and `Ticker` never
//! fires, which keeps logic that awaits timers testable natively.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Wait for `duration` on the browser event loop.
pub async fn sleep(duration: Duration) {
    #[cfg(feature = "csr")]
    {
        if !duration.is_zero() {
            gloo_timers::future::sleep(duration).await;
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = duration;
    }
}

/// Periodic tick handle. Stops on `stop()` or drop.
#[derive(Debug)]
pub struct Ticker {
    alive: Arc<AtomicBool>,
}

impl Ticker {
    /// Start calling `on_tick` every `period` until stopped.
    pub fn start<F>(period: Duration, on_tick: F) -> Self
    where
        F: Fn() + 'static,
    {
        let alive = Arc::new(AtomicBool::new(true));

        #[cfg(feature = "csr")]
        {
            let alive_task = Arc::clone(&alive);
            leptos::task::spawn_local(async move {
                loop {
                    gloo_timers::future::sleep(period).await;
                    if !alive_task.load(Ordering::Relaxed) {
                        break;
                    }
                    on_tick();
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (period, on_tick);
        }

        Self { alive }
    }

    /// Start a ticker owned by the current reactive scope; it stops when that scope is cleaned up.
    pub fn scoped<F>(period: Duration, on_tick: F) -> TickerStop
    where
        F: Fn() + 'static,
    {
        let ticker = Self::start(period, on_tick);
        let stop = ticker.stop_handle();
        leptos::prelude::on_cleanup(move || drop(ticker));
        stop
    }

    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Shared stop switch, for cleanup hooks that require `Send + Sync`.
    pub fn stop_handle(&self) -> TickerStop {
        TickerStop { alive: Arc::clone(&self.alive) }
    }

    pub fn stop(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Clonable, thread-safe switch that stops the `Ticker` it came from.
#[derive(Clone, Debug)]
pub struct TickerStop {
    alive: Arc<AtomicBool>,
}

impl TickerStop {
    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}
