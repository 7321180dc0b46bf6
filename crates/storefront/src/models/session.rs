//! Typed access to session-stored state.
//!
//! The cart and favorites are kept per visitor session. A value that is
//! missing or no longer deserializes reads as the type's default.

use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;

/// Session keys for visitor state.
pub mod keys {
    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the favorite product list.
    pub const FAVORITES: &str = "favorites";
}

/// Read a value from the session, falling back to its default.
pub async fn load<T>(session: &Session, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, key, "Discarding unreadable session value");
            T::default()
        }
    }
}

/// Write a value to the session.
///
/// # Errors
///
/// Returns the session store error if the value cannot be stored.
pub async fn save<T>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), tower_sessions::session::Error>
where
    T: Serialize + Sync,
{
    session.insert(key, value).await
}
