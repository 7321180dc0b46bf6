//! Backend connectivity check.
//!
//! # Environment Variables
//!
//! - `API_URL` (or `NEXT_PUBLIC_API_URL`) - REST backend base URL
//! - `DEFAULT_CLIENT_ID` - Tenant sent as `x-client-id`

use clinica_backend::{BackendClient, BackendConfig};

use super::CommandError;

/// `GET {API_URL}/health` and report the outcome.
///
/// # Errors
///
/// Returns an error if configuration is missing or the backend is unreachable.
pub async fn check() -> Result<String, CommandError> {
    dotenvy::dotenv().ok();

    let config = BackendConfig::from_env()?;
    let client = BackendClient::new(&config)?;

    tracing::info!(backend = %config.base_url, "Checking backend health");
    client.ping().await?;

    let tenant = config
        .default_client_id
        .as_ref()
        .map_or_else(|| "none".to_string(), ToString::to_string);
    Ok(format!(
        "Backend reachable at {} (tenant: {tenant}, auth {})",
        config.base_url,
        if config.enable_auth { "enabled" } else { "disabled" }
    ))
}
