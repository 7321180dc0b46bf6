//! Backend connection settings loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_URL` - Base URL of the REST backend (falls back to `NEXT_PUBLIC_API_URL`)
//!
//! ## Optional
//! - `DEFAULT_CLIENT_ID` - Tenant used when no `client_id` cookie is present
//!   (falls back to `NEXT_PUBLIC_DEFAULT_CLIENT_ID`)
//! - `ENABLE_AUTH` - Require an auth cookie on protected routes (default: true,
//!   falls back to `NEXT_PUBLIC_ENABLE_AUTH`)
//! - `API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//!
//! The helpers in this module are shared by the web services and the CLI so
//! every binary reads the environment the same way.

use std::time::Duration;

use clinica_core::TenantId;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the REST backend, always ending in `/`
    pub base_url: Url,
    /// Tenant used when the request carries no `client_id` cookie
    pub default_client_id: Option<TenantId>,
    /// Whether protected routes require an auth token
    pub enable_auth: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl BackendConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is missing or any value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&process_env)
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is missing or any value fails to parse.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = first_present(env, &["API_URL", "NEXT_PUBLIC_API_URL"])
            .ok_or_else(|| ConfigError::MissingEnvVar("API_URL".to_string()))?;
        let base_url = parse_base_url(&raw_url)?;

        let default_client_id =
            first_present(env, &["DEFAULT_CLIENT_ID", "NEXT_PUBLIC_DEFAULT_CLIENT_ID"])
                .map(TenantId::new);

        let enable_auth = match first_present(env, &["ENABLE_AUTH", "NEXT_PUBLIC_ENABLE_AUTH"]) {
            Some(value) => parse_flag("ENABLE_AUTH", &value)?,
            None => true,
        };

        let timeout_secs = match env("API_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("API_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            default_client_id,
            enable_auth,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read a variable from the process environment, treating blank values as unset.
#[must_use]
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// First non-blank value among `keys`.
#[must_use]
pub fn first_present(env: &dyn Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| env(key).filter(|v| !v.trim().is_empty()))
}

/// Parse a boolean flag such as `true`, `0` or `off`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything else.
pub fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Parse the backend base URL so relative joins stay under its path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("API_URL".to_string(), reason);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BackendConfig::from_lookup(&lookup(&[("API_URL", "http://localhost:4000")]))
            .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:4000/");
        assert!(config.enable_auth);
        assert!(config.default_client_id.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_public_fallbacks() {
        let config = BackendConfig::from_lookup(&lookup(&[
            ("NEXT_PUBLIC_API_URL", "https://api.example.test/v1"),
            ("NEXT_PUBLIC_DEFAULT_CLIENT_ID", "clinic-42"),
            ("NEXT_PUBLIC_ENABLE_AUTH", "false"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.test/v1/");
        assert_eq!(config.default_client_id.unwrap().as_str(), "clinic-42");
        assert!(!config.enable_auth);
    }

    #[test]
    fn test_primary_wins_over_fallback() {
        let config = BackendConfig::from_lookup(&lookup(&[
            ("API_URL", "http://primary:1"),
            ("NEXT_PUBLIC_API_URL", "http://fallback:2"),
            ("ENABLE_AUTH", "on"),
            ("NEXT_PUBLIC_ENABLE_AUTH", "off"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("primary"));
        assert!(config.enable_auth);
    }

    #[test]
    fn test_missing_url() {
        let err = BackendConfig::from_lookup(&lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "API_URL"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(BackendConfig::from_lookup(&lookup(&[("API_URL", "ftp://nope")])).is_err());
        assert!(BackendConfig::from_lookup(&lookup(&[("API_URL", "not a url")])).is_err());
        assert!(
            BackendConfig::from_lookup(&lookup(&[
                ("API_URL", "http://x"),
                ("ENABLE_AUTH", "maybe")
            ]))
            .is_err()
        );
        assert!(
            BackendConfig::from_lookup(&lookup(&[
                ("API_URL", "http://x"),
                ("API_TIMEOUT_SECS", "soon")
            ]))
            .is_err()
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", " YES ").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(parse_flag("X", "").is_err());
    }
}
