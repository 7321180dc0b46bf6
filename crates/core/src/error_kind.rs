//! Heuristic error classification.
//!
//! Errors arriving from the backend are mostly free text. They are sorted
//! into a handful of categories by substring matching so the user sees a
//! sensible message. Structured errors should map to a category directly
//! and only fall back to [`ErrorCategory::classify`].

use serde::{Deserialize, Serialize};

/// Coarse error category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Auth,
    Validation,
    Server,
    Unknown,
}

const NETWORK_MARKERS: &[&str] = &[
    "network",
    "fetch",
    "connection",
    "connect",
    "timed out",
    "timeout",
    "dns",
    "unreachable",
];

const AUTH_MARKERS: &[&str] = &[
    "401",
    "403",
    "unauthorized",
    "unauthorised",
    "forbidden",
    "token",
    "not authenticated",
    "permission",
];

const VALIDATION_MARKERS: &[&str] = &[
    "400",
    "422",
    "validation",
    "invalid",
    "required",
    "must be",
    "bad request",
];

const SERVER_MARKERS: &[&str] = &[
    "500",
    "502",
    "503",
    "504",
    "internal server",
    "server error",
    "service unavailable",
    "bad gateway",
];

impl ErrorCategory {
    /// Classify an error message by substring matching.
    ///
    /// Checks run in order network, auth, validation, server; the first hit wins.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let hit = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        if hit(NETWORK_MARKERS) {
            Self::Network
        } else if hit(AUTH_MARKERS) {
            Self::Auth
        } else if hit(VALIDATION_MARKERS) {
            Self::Validation
        } else if hit(SERVER_MARKERS) {
            Self::Server
        } else {
            Self::Unknown
        }
    }

    /// Category for an HTTP status code returned by the backend.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            400 | 404 | 409 | 422 => Self::Validation,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Message suitable for showing directly in the UI.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Network => "Unable to reach the server. Check your connection and try again.",
            Self::Auth => "Your session has expired or you do not have access. Please sign in again.",
            Self::Validation => "Some of the information provided is invalid. Please review and try again.",
            Self::Server => "The server ran into a problem. Please try again later.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}
