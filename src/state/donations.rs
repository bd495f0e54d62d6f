//! Restaurant donation list state for the dashboard.
//!
//! DESIGN
//! ======
//! The list is held exactly as fetched; search, status filter, and grouping
//! are pure projections recomputed on render. Nothing here mutates a
//! donation's status: actions trigger a re-fetch and the list is replaced.

#[cfg(test)]
#[path = "donations_test.rs"]
mod donations_test;

use crate::net::types::{DonationRecord, DonationStatus};

/// Shared donation list state.
#[derive(Clone, Debug, Default)]
pub struct DonationsState {
    pub items: Vec<DonationRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: DonationFilter,
}

/// Search text plus an optional exact status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DonationFilter {
    /// Case-insensitive substring of the security code.
    pub search: String,
    /// `None` means all statuses.
    pub status: Option<DonationStatus>,
}

impl DonationFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.status.is_some()
    }

    pub fn matches(&self, donation: &DonationRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let code_matches = needle.is_empty() || donation.security_code.to_lowercase().contains(&needle);
        code_matches && self.status.as_ref().is_none_or(|s| *s == donation.status)
    }

    /// Parse the status `<select>` value; `"all"` and empty clear the filter.
    pub fn status_from_select(value: &str) -> Option<DonationStatus> {
        match value {
            "" | "all" => None,
            other => Some(DonationStatus::from(other)),
        }
    }
}

/// Statuses offered in the dashboard filter, in display order.
pub const FILTERABLE_STATUSES: [DonationStatus; 5] = [
    DonationStatus::Pending,
    DonationStatus::Accepted,
    DonationStatus::Released,
    DonationStatus::PickedUp,
    DonationStatus::Denied,
];

/// Filtered donations split into the dashboard's sections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DonationGroups {
    pub accepted: Vec<DonationRecord>,
    pub pending: Vec<DonationRecord>,
    /// Released for pickup or already picked up.
    pub delivered: Vec<DonationRecord>,
    /// Number of donations that passed the filter, including ones in no section.
    pub matched: usize,
}

impl DonationsState {
    pub fn filtered(&self) -> Vec<DonationRecord> {
        self.items.iter().filter(|d| self.filter.matches(d)).cloned().collect()
    }

    pub fn groups(&self) -> DonationGroups {
        let mut groups = DonationGroups::default();
        for donation in self.items.iter().filter(|d| self.filter.matches(d)) {
            groups.matched += 1;
            match &donation.status {
                DonationStatus::Accepted => groups.accepted.push(donation.clone()),
                DonationStatus::Pending => groups.pending.push(donation.clone()),
                status if status.is_delivered() => groups.delivered.push(donation.clone()),
                _ => {}
            }
        }
        groups
    }

    /// Whether any donation, regardless of filter, is waiting to be released.
    pub fn has_accepted(&self) -> bool {
        self.items.iter().any(|d| d.status == DonationStatus::Accepted)
    }
}
