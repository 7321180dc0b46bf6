//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_URL` - REST backend base URL (or `NEXT_PUBLIC_API_URL`)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin service (default: `http://localhost:3001`)
//! - `ADMIN_SEED_SCHEDULES` - Mock schedules generated at startup (default: 12)
//! - `DEFAULT_CLIENT_ID`, `ENABLE_AUTH`, `API_TIMEOUT_SECS` - see [`BackendConfig`]
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use clinica_backend::config::process_env;
use clinica_backend::{BackendConfig, ConfigError};

/// Upper bound for `ADMIN_SEED_SCHEDULES`; the schedule book's capacity.
pub const MAX_SEED_SCHEDULES: usize = clinica_core::schedule::MAX_SCHEDULES;

const DEFAULT_SEED_SCHEDULES: usize = 12;

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin service
    pub base_url: String,
    /// REST backend connection (also carries the auth toggle)
    pub backend: BackendConfig,
    /// Number of mock schedules generated at startup
    pub seed_schedules: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&process_env)
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = env("ADMIN_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = env("ADMIN_PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = env("ADMIN_BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}"));
        let seed_schedules = match env("ADMIN_SEED_SCHEDULES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n <= MAX_SEED_SCHEDULES)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "ADMIN_SEED_SCHEDULES".to_string(),
                        format!("expected a number up to {MAX_SEED_SCHEDULES}, got {raw}"),
                    )
                })?,
            None => DEFAULT_SEED_SCHEDULES,
        };
        let backend = BackendConfig::from_lookup(env)?;

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            seed_schedules,
            sentry_dsn: env("SENTRY_DSN"),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: env("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.1),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Whether admin routes require the `auth_token` cookie.
    #[must_use]
    pub const fn auth_required(&self) -> bool {
        self.backend.enable_auth
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        AdminConfig::from_lookup(&|key| map.get(key).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("API_URL", "http://localhost:4000")]).unwrap();
        assert_eq!(config.socket_addr().port(), 3001);
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.seed_schedules, 12);
        assert!(config.auth_required());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_auth_toggle_off() {
        let config = load(&[
            ("NEXT_PUBLIC_API_URL", "http://localhost:4000"),
            ("NEXT_PUBLIC_ENABLE_AUTH", "false"),
        ])
        .unwrap();
        assert!(!config.auth_required());
    }

    #[test]
    fn test_seed_schedules_bounds() {
        let config = load(&[("API_URL", "http://x"), ("ADMIN_SEED_SCHEDULES", "0")]).unwrap();
        assert_eq!(config.seed_schedules, 0);

        let err = load(&[("API_URL", "http://x"), ("ADMIN_SEED_SCHEDULES", "9000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "ADMIN_SEED_SCHEDULES"));
    }

    #[test]
    fn test_invalid_host() {
        let err = load(&[("API_URL", "http://x"), ("ADMIN_HOST", "not-an-ip")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "ADMIN_HOST"));
    }
}
