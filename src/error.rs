//! Error types shared by the networking and state layers.
//!
//! ERROR HANDLING
//! ==============
//! Auth errors propagate to the caller that triggered them (login form,
//! sign-out button). API errors carry the server's message verbatim when one
//! is present so pages can surface it without re-wording.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors produced by the external auth provider.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The provider answered and rejected the request (unknown email, rate limit, ...).
    #[error("{message}")]
    Provider { status: Option<u16>, message: String },

    /// The request never reached the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider response body could not be decoded.
    #[error("unexpected auth response: {0}")]
    Decode(String),

    /// Auth calls are only available in the browser build.
    #[error("auth provider not available")]
    Unavailable,
}

impl AuthError {
    /// Human-readable text for form-level display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Provider { .. } | Self::Decode(_) | Self::Unavailable => {
                "Something went wrong. Please try again.".to_owned()
            }
            Self::Network(_) => "Could not reach the server. Check your connection.".to_owned(),
        }
    }
}

/// Error returned by a REST query or edge-function call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Build an error from a server message, using `fallback` when the server gave none.
    pub fn from_server(status: u16, message: Option<String>, fallback: &str) -> Self {
        let message = message
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_owned());
        Self { status: Some(status), message }
    }

    pub fn unavailable() -> Self {
        Self::new(None, "not available outside the browser")
    }
}

/// Invalid or missing build-time configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid configuration value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
