//! Donation status badge projection.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

use std::borrow::Cow;

use crate::net::types::DonationStatus;

/// Semantic color of a badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    Warning,
    Info,
    Success,
    Danger,
    Neutral,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Warning => "badge--warning",
            Self::Info => "badge--info",
            Self::Success => "badge--success",
            Self::Danger => "badge--danger",
            Self::Neutral => "badge--neutral",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusIcon {
    Clock,
    CheckCircle,
    Unlock,
    Package,
    XCircle,
    Hourglass,
    AlertCircle,
}

impl StatusIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Clock => "🕒",
            Self::CheckCircle => "✔",
            Self::Unlock => "🔓",
            Self::Package => "📦",
            Self::XCircle => "✖",
            Self::Hourglass => "⌛",
            Self::AlertCircle => "⚠",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: Cow<'static, str>,
    pub tone: Tone,
    pub icon: StatusIcon,
}

/// Badge for `status`. Unknown statuses show their raw string in neutral.
pub fn project_status(status: &DonationStatus) -> StatusBadge {
    let (label, tone, icon): (Cow<'static, str>, _, _) = match status {
        DonationStatus::Pending => ("Awaiting OSC response".into(), Tone::Warning, StatusIcon::Clock),
        DonationStatus::Accepted => ("Accepted by OSC".into(), Tone::Info, StatusIcon::CheckCircle),
        DonationStatus::Released => ("Released for pickup".into(), Tone::Success, StatusIcon::Unlock),
        DonationStatus::PickedUp => ("Picked up".into(), Tone::Success, StatusIcon::Package),
        DonationStatus::Denied => ("Denied by OSC".into(), Tone::Danger, StatusIcon::XCircle),
        DonationStatus::Expired => ("Expired".into(), Tone::Neutral, StatusIcon::Hourglass),
        DonationStatus::Unknown(raw) => (Cow::Owned(raw.clone()), Tone::Neutral, StatusIcon::AlertCircle),
    };
    StatusBadge { label, tone, icon }
}
