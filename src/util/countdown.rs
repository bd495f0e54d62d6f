//! Time remaining until a donation's response deadline.

#[cfg(test)]
#[path = "countdown_test.rs"]
mod countdown_test;

use chrono::{DateTime, Utc};

/// Whole hours, minutes, and seconds left before `expires_at`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_expired: bool,
}

impl Countdown {
    const EXPIRED: Self = Self { hours: 0, minutes: 0, seconds: 0, is_expired: true };

    /// Decompose the remaining time with floor division.
    ///
    /// Once the deadline has passed (difference `<= 0`), every later call
    /// returns the same all-zero expired value.
    pub fn between(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        let diff_ms = (expires_at - now).num_milliseconds();
        if diff_ms <= 0 {
            return Self::EXPIRED;
        }
        Self {
            hours: diff_ms / 3_600_000,
            minutes: (diff_ms % 3_600_000) / 60_000,
            seconds: (diff_ms % 60_000) / 1000,
            is_expired: false,
        }
    }

    pub fn is_urgent(&self, threshold_hours: u64) -> bool {
        !self.is_expired && u64::try_from(self.hours).is_ok_and(|h| h <= threshold_hours)
    }

    /// `HH:MM:SS`, hours growing past two digits when needed.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
