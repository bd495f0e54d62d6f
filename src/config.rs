//! Dashboard configuration baked in at build time.
//!
//! The browser has no process environment, so values are captured with
//! `option_env!` when the WASM bundle is compiled and parsed once at startup.
//! Route targets and the urgency threshold are product decisions that live
//! here instead of being repeated across pages.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::ConfigError;

pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_ONBOARDING_ROUTE: &str = "/onboarding";
pub const DEFAULT_DASHBOARD_ROUTE: &str = "/dashboard";
pub const DEFAULT_CALLBACK_ROUTE: &str = "/auth/callback";
pub const DEFAULT_URGENCY_THRESHOLD_HOURS: u64 = 2;
pub const DEFAULT_AUTH_SETTLE_DELAY_MS: u64 = 100;
pub const DEFAULT_COUNTDOWN_TICK_MS: u64 = 1000;

/// Paths the route guard and auth flows redirect to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTargets {
    pub login: String,
    pub onboarding: String,
    pub dashboard: String,
    pub callback: String,
}

impl Default for RouteTargets {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_ROUTE.to_owned(),
            onboarding: DEFAULT_ONBOARDING_ROUTE.to_owned(),
            dashboard: DEFAULT_DASHBOARD_ROUTE.to_owned(),
            callback: DEFAULT_CALLBACK_ROUTE.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the managed backend, without a trailing slash.
    pub backend_url: String,
    /// Public anon key sent as `apikey` on every backend call.
    pub anon_key: String,
    pub routes: RouteTargets,
    /// Remaining whole hours at or below which a pending countdown is shown as urgent.
    pub urgency_threshold_hours: u64,
    /// Pause between an auth-state change and the restaurant existence check.
    pub auth_settle_delay_ms: u64,
    pub countdown_tick_ms: u64,
}

impl AppConfig {
    /// Build config from the values captured at compile time.
    ///
    /// Required:
    /// - `DASHBOARD_BACKEND_URL`
    /// - `DASHBOARD_ANON_KEY`
    ///
    /// Optional:
    /// - `DASHBOARD_ROUTE_LOGIN`, `DASHBOARD_ROUTE_ONBOARDING`,
    ///   `DASHBOARD_ROUTE_DASHBOARD`, `DASHBOARD_ROUTE_CALLBACK`
    /// - `DASHBOARD_URGENCY_HOURS`: default 2
    /// - `DASHBOARD_AUTH_SETTLE_MS`: default 100
    /// - `DASHBOARD_TICK_MS`: default 1000
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required value is missing or a numeric value does not parse.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                "DASHBOARD_BACKEND_URL" => option_env!("DASHBOARD_BACKEND_URL"),
                "DASHBOARD_ANON_KEY" => option_env!("DASHBOARD_ANON_KEY"),
                "DASHBOARD_ROUTE_LOGIN" => option_env!("DASHBOARD_ROUTE_LOGIN"),
                "DASHBOARD_ROUTE_ONBOARDING" => option_env!("DASHBOARD_ROUTE_ONBOARDING"),
                "DASHBOARD_ROUTE_DASHBOARD" => option_env!("DASHBOARD_ROUTE_DASHBOARD"),
                "DASHBOARD_ROUTE_CALLBACK" => option_env!("DASHBOARD_ROUTE_CALLBACK"),
                "DASHBOARD_URGENCY_HOURS" => option_env!("DASHBOARD_URGENCY_HOURS"),
                "DASHBOARD_AUTH_SETTLE_MS" => option_env!("DASHBOARD_AUTH_SETTLE_MS"),
                "DASHBOARD_TICK_MS" => option_env!("DASHBOARD_TICK_MS"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required value is missing or a numeric value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = required(&lookup, "DASHBOARD_BACKEND_URL")?
            .trim_end_matches('/')
            .to_owned();
        let anon_key = required(&lookup, "DASHBOARD_ANON_KEY")?;

        let routes = RouteTargets {
            login: route(&lookup, "DASHBOARD_ROUTE_LOGIN", DEFAULT_LOGIN_ROUTE)?,
            onboarding: route(&lookup, "DASHBOARD_ROUTE_ONBOARDING", DEFAULT_ONBOARDING_ROUTE)?,
            dashboard: route(&lookup, "DASHBOARD_ROUTE_DASHBOARD", DEFAULT_DASHBOARD_ROUTE)?,
            callback: route(&lookup, "DASHBOARD_ROUTE_CALLBACK", DEFAULT_CALLBACK_ROUTE)?,
        };

        Ok(Self {
            backend_url,
            anon_key,
            routes,
            urgency_threshold_hours: parse_u64(&lookup, "DASHBOARD_URGENCY_HOURS", DEFAULT_URGENCY_THRESHOLD_HOURS)?,
            auth_settle_delay_ms: parse_u64(&lookup, "DASHBOARD_AUTH_SETTLE_MS", DEFAULT_AUTH_SETTLE_DELAY_MS)?,
            countdown_tick_ms: parse_u64(&lookup, "DASHBOARD_TICK_MS", DEFAULT_COUNTDOWN_TICK_MS)?,
        })
    }

    /// Absolute URL the one-time sign-in link should land on.
    pub fn callback_url(&self, origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), self.routes.callback)
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn route<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_owned()) {
        None => Ok(default.to_owned()),
        Some(v) if v.starts_with('/') => Ok(v),
        Some(v) => Err(ConfigError::Invalid { key, value: v }),
    }
}

fn parse_u64<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
