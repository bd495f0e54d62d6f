//! Wire DTOs for the auth provider, REST layer, and donation edge functions.
//!
//! DESIGN
//! ======
//! Two backend shapes describe a donation: the edge-function detail payload
//! and the REST row with embedded OSC and package joins. Both are decoded
//! into their own wire structs and flattened into one `DonationRecord` so
//! the view model never sees join layout.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::format;

/// Authenticated user as reported by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Provider-issued session: identity plus bearer credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Whether the access token has passed its expiry at `now_secs`.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_secs)
    }
}

/// Kind of auth-state change announced by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Payload delivered to auth-state listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// A restaurant row owned by the signed-in user. Only existence matters to the session flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRow {
    pub id: String,
}

/// Donation lifecycle status. Unrecognized strings are preserved for display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DonationStatus {
    Pending,
    Accepted,
    Denied,
    Released,
    PickedUp,
    Expired,
    Unknown(String),
}

impl DonationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Denied => "denied",
            Self::Released => "released",
            Self::PickedUp => "picked_up",
            Self::Expired => "expired",
            Self::Unknown(raw) => raw,
        }
    }

    /// Handed over to the OSC (released for pickup or already collected).
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Released | Self::PickedUp)
    }
}

impl From<String> for DonationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "denied" => Self::Denied,
            "released" => Self::Released,
            "picked_up" => Self::PickedUp,
            "expired" => Self::Expired,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<&str> for DonationStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<DonationStatus> for String {
    fn from(status: DonationStatus) -> Self {
        match status {
            DonationStatus::Unknown(raw) => raw,
            other => other.as_str().to_owned(),
        }
    }
}

/// One package as captured on a donation.
#[derive(Clone, Debug, PartialEq)]
pub struct PackageSnapshot {
    pub id: String,
    pub label_code: Option<String>,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub total_kg: Option<f64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Donation as observed by this client. Status only changes through re-fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct DonationRecord {
    pub id: String,
    pub security_code: String,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    /// Deadline for the OSC to answer; present while pending.
    pub expires_at: Option<DateTime<Utc>>,
    pub restaurant: Option<String>,
    pub osc_id: Option<String>,
    pub osc_name: Option<String>,
    pub packages: Vec<PackageSnapshot>,
}

impl DonationRecord {
    /// Sum of package weights; packages without a weight count as zero.
    pub fn total_kg(&self) -> f64 {
        self.packages.iter().filter_map(|p| p.total_kg).sum()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ItemWire {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub unit_to_kg: Option<f64>,
}

/// Package entry in the `osc_get_donation_details` payload.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct DetailPackageWire {
    pub id: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub total_kg: Option<f64>,
    #[serde(default)]
    pub label_code: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub item: Option<ItemWire>,
}

/// Response body of the `osc_get_donation_details` edge function.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct DonationDetailsWire {
    pub id: String,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub restaurant: Option<String>,
    #[serde(default)]
    pub security_code: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub packages: Vec<DetailPackageWire>,
}

impl From<DetailPackageWire> for PackageSnapshot {
    fn from(wire: DetailPackageWire) -> Self {
        let item = wire.item.unwrap_or(ItemWire { name: String::new(), unit: String::new(), unit_to_kg: None });
        let total_kg = wire
            .total_kg
            .or_else(|| item.unit_to_kg.map(|per_unit| format::total_kg(wire.quantity, &item.unit, Some(per_unit))))
            .or_else(|| (item.unit == "kg").then_some(wire.quantity));
        Self {
            id: wire.id,
            label_code: wire.label_code,
            item_name: item.name,
            quantity: wire.quantity,
            unit: item.unit,
            total_kg,
            expires_at: wire.expires_at,
        }
    }
}

impl From<DonationDetailsWire> for DonationRecord {
    fn from(wire: DonationDetailsWire) -> Self {
        Self {
            id: wire.id,
            security_code: wire.security_code,
            status: wire.status,
            created_at: wire.created_at,
            accepted_at: wire.accepted_at,
            released_at: None,
            picked_up_at: wire.picked_up_at,
            expires_at: wire.expires_at,
            restaurant: wire.restaurant,
            osc_id: None,
            osc_name: None,
            packages: wire.packages.into_iter().map(PackageSnapshot::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct OscNameWire {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct DonationPackageLinkWire {
    pub package: Option<DetailPackageWire>,
}

/// Donation row from the REST layer with `osc(name)` and
/// `donation_packages(package(*, item(*)))` embedded.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct DonationRowWire {
    pub id: String,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub osc_id: Option<String>,
    #[serde(default)]
    pub security_code: String,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub osc: Option<OscNameWire>,
    #[serde(default)]
    pub packages: Vec<DonationPackageLinkWire>,
}

impl From<DonationRowWire> for DonationRecord {
    fn from(wire: DonationRowWire) -> Self {
        Self {
            id: wire.id,
            security_code: wire.security_code,
            status: wire.status,
            created_at: wire.created_at,
            accepted_at: wire.accepted_at,
            released_at: wire.released_at,
            picked_up_at: wire.picked_up_at,
            expires_at: wire.expires_at,
            restaurant: wire.restaurant_id,
            osc_id: wire.osc_id,
            osc_name: wire.osc.and_then(|o| o.name),
            packages: wire
                .packages
                .into_iter()
                .filter_map(|link| link.package)
                .map(PackageSnapshot::from)
                .collect(),
        }
    }
}
