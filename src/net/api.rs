//! Donation edge functions and REST queries.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning `ApiError::unavailable()`.
//!
//! ERROR HANDLING
//! ==============
//! Every call resolves to `Result<_, ApiError>`. When the backend explains a
//! failure (`error` or `message` in the body) that text is surfaced as-is;
//! otherwise each action has its own fallback message.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "csr"))]
use super::backend::{endpoint, error_message, restaurants_path};
use super::types::{DetailPackageWire, DonationRecord, PackageSnapshot};
#[cfg(feature = "csr")]
use super::types::{DonationDetailsWire, DonationRowWire, RestaurantRow};
use crate::config::AppConfig;
use crate::error::ApiError;

/// Edge function invoked for a donation by security code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DonationAction {
    Details,
    Accept,
    Deny,
    Release,
}

impl DonationAction {
    pub fn function_name(self) -> &'static str {
        match self {
            Self::Details => "osc_get_donation_details",
            Self::Accept => "osc_accept_donation",
            Self::Deny => "osc_deny_donation",
            Self::Release => "restaurant_release_donation",
        }
    }

    /// Shown when the backend fails without saying why.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Details => "Donation not found or invalid code",
            Self::Accept => "Failed to accept donation",
            Self::Deny => "Failed to deny donation",
            Self::Release => "Failed to release donation",
        }
    }
}

/// Fields submitted by the onboarding form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RestaurantRegistration {
    pub name: String,
    pub phone: String,
    pub cep: String,
}

/// What the restaurant hands over after a successful release.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseReceipt {
    pub osc_name: Option<String>,
    pub packages: Vec<PackageSnapshot>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseResponseWire {
    #[serde(default)]
    osc: Option<String>,
    #[serde(default)]
    packages: Vec<DetailPackageWire>,
}

impl From<ReleaseResponseWire> for ReleaseReceipt {
    fn from(wire: ReleaseResponseWire) -> Self {
        Self { osc_name: wire.osc, packages: wire.packages.into_iter().map(PackageSnapshot::from).collect() }
    }
}

#[cfg(any(test, feature = "csr"))]
fn function_url(config: &AppConfig, name: &str) -> String {
    endpoint(&config.backend_url, &format!("/functions/v1/{name}"))
}

#[cfg(any(test, feature = "csr"))]
fn security_code_body(code: &str) -> serde_json::Value {
    serde_json::json!({ "security_code": code.trim() })
}

#[cfg(any(test, feature = "csr"))]
fn donations_path(restaurant_id: &str) -> String {
    format!(
        "/rest/v1/donations?select=*,osc:osc!inner(name),packages:donation_packages(package:packages(*,item:items(*)))\
         &restaurant_id=eq.{}&order=created_at.desc",
        urlencoding::encode(restaurant_id)
    )
}

/// Build the error for a failed call from its raw response body.
#[cfg(any(test, feature = "csr"))]
fn failure(status: u16, body: &str, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| error_message(&v));
    ApiError::from_server(status, message, fallback)
}

#[cfg(any(test, feature = "csr"))]
fn newest_first(mut donations: Vec<DonationRecord>) -> Vec<DonationRecord> {
    donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    donations
}

#[cfg(feature = "csr")]
fn transport(err: gloo_net::Error) -> ApiError {
    ApiError::new(None, err.to_string())
}

/// Credentials for an edge-function call.
#[cfg(feature = "csr")]
enum Caller<'a> {
    /// Public OSC link: anon key only.
    Anonymous,
    /// Signed-in restaurant.
    Bearer(&'a str),
}

#[cfg(feature = "csr")]
async fn invoke(
    config: &AppConfig,
    name: &str,
    caller: Caller<'_>,
    body: &serde_json::Value,
    fallback: &str,
) -> Result<gloo_net::http::Response, ApiError> {
    let mut request = gloo_net::http::Request::post(&function_url(config, name)).header("apikey", &config.anon_key);
    if let Caller::Bearer(token) = caller {
        request = request.header("Authorization", &format!("Bearer {token}"));
    }
    let resp = request.json(body).map_err(transport)?.send().await.map_err(transport)?;
    if !resp.ok() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        log::warn!("{name} failed with {status}");
        return Err(failure(status, &text, fallback));
    }
    Ok(resp)
}

#[cfg(feature = "csr")]
async fn rest_get<T: serde::de::DeserializeOwned>(
    config: &AppConfig,
    access_token: &str,
    path: &str,
    fallback: &str,
) -> Result<T, ApiError> {
    let resp = gloo_net::http::Request::get(&endpoint(&config.backend_url, path))
        .header("apikey", &config.anon_key)
        .header("Authorization", &format!("Bearer {access_token}"))
        .send()
        .await
        .map_err(transport)?;
    if !resp.ok() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(failure(status, &text, fallback));
    }
    resp.json().await.map_err(|e| ApiError::new(None, e.to_string()))
}

/// Public lookup of a donation by its security code.
///
/// # Errors
///
/// Returns the backend's `error` text, or "Donation not found or invalid code".
pub async fn fetch_donation_details(config: &AppConfig, code: &str) -> Result<DonationRecord, ApiError> {
    #[cfg(feature = "csr")]
    {
        let action = DonationAction::Details;
        let resp = invoke(
            config,
            action.function_name(),
            Caller::Anonymous,
            &security_code_body(code),
            action.fallback_message(),
        )
        .await?;
        let wire: DonationDetailsWire = resp.json().await.map_err(|e| ApiError::new(None, e.to_string()))?;
        Ok(DonationRecord::from(wire))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, code);
        Err(ApiError::unavailable())
    }
}

async fn respond(config: &AppConfig, action: DonationAction, code: &str) -> Result<(), ApiError> {
    #[cfg(feature = "csr")]
    {
        invoke(
            config,
            action.function_name(),
            Caller::Anonymous,
            &security_code_body(code),
            action.fallback_message(),
        )
        .await?;
        Ok(())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, action, code);
        Err(ApiError::unavailable())
    }
}

/// OSC accepts a pending donation.
///
/// # Errors
///
/// Returns the backend's `error` text, or a generic accept failure.
pub async fn accept_donation(config: &AppConfig, code: &str) -> Result<(), ApiError> {
    respond(config, DonationAction::Accept, code).await
}

/// OSC denies a pending donation.
///
/// # Errors
///
/// Returns the backend's `error` text, or a generic deny failure.
pub async fn deny_donation(config: &AppConfig, code: &str) -> Result<(), ApiError> {
    respond(config, DonationAction::Deny, code).await
}

/// Restaurant releases an accepted donation for pickup.
///
/// # Errors
///
/// Returns the backend's `message` text, or "Failed to release donation".
pub async fn release_donation(config: &AppConfig, access_token: &str, code: &str) -> Result<ReleaseReceipt, ApiError> {
    #[cfg(feature = "csr")]
    {
        let action = DonationAction::Release;
        let resp = invoke(
            config,
            action.function_name(),
            Caller::Bearer(access_token),
            &security_code_body(code),
            action.fallback_message(),
        )
        .await?;
        let wire: ReleaseResponseWire = resp.json().await.map_err(|e| ApiError::new(None, e.to_string()))?;
        Ok(ReleaseReceipt::from(wire))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, access_token, code);
        Err(ApiError::unavailable())
    }
}

/// All donations of the restaurant owned by `user_id`, newest first.
///
/// # Errors
///
/// Returns an error if either query fails or the user owns no restaurant.
pub async fn fetch_restaurant_donations(
    config: &AppConfig,
    access_token: &str,
    user_id: &str,
) -> Result<Vec<DonationRecord>, ApiError> {
    #[cfg(feature = "csr")]
    {
        let rows: Vec<RestaurantRow> =
            rest_get(config, access_token, &restaurants_path(user_id), "restaurant lookup failed").await?;
        let Some(restaurant) = rows.into_iter().next() else {
            return Err(ApiError::new(None, "Restaurant not found for user"));
        };
        let wire: Vec<DonationRowWire> =
            rest_get(config, access_token, &donations_path(&restaurant.id), "Failed to load donations").await?;
        Ok(newest_first(wire.into_iter().map(DonationRecord::from).collect()))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, access_token, user_id);
        Err(ApiError::unavailable())
    }
}

/// Create the restaurant for the signed-in user.
///
/// # Errors
///
/// Returns the backend's message, or a generic registration failure.
pub async fn register_restaurant(
    config: &AppConfig,
    access_token: &str,
    registration: &RestaurantRegistration,
) -> Result<(), ApiError> {
    #[cfg(feature = "csr")]
    {
        let body = serde_json::to_value(registration).map_err(|e| ApiError::new(None, e.to_string()))?;
        invoke(
            config,
            "register_restaurant",
            Caller::Bearer(access_token),
            &body,
            "Could not register restaurant. Please try again.",
        )
        .await?;
        Ok(())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, access_token, registration);
        Err(ApiError::unavailable())
    }
}
