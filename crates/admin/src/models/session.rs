//! Typed access to session-stored admin state.
//!
//! Each admin session carries its own notification centre and theme. A
//! value that is missing or no longer deserializes reads as the default.

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;

use clinica_core::notifications::{
    Notification, NotificationAction, NotificationCenter, NotificationLevel,
};

/// Session keys for admin state.
pub mod keys {
    /// Key for the notification centre.
    pub const NOTIFICATIONS: &str = "notifications";

    /// Key for the colour theme.
    pub const THEME: &str = "theme";
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

/// Push a notification into the session's notification centre.
///
/// # Errors
///
/// Returns the session store error if the centre cannot be stored.
pub async fn notify(
    session: &Session,
    level: NotificationLevel,
    title: &str,
    message: String,
) -> Result<(), tower_sessions::session::Error> {
    let mut center: NotificationCenter = load(session, keys::NOTIFICATIONS).await;
    center.dispatch(NotificationAction::Push(Notification::new(
        level,
        title,
        message,
        Utc::now(),
    )));
    save(session, keys::NOTIFICATIONS, &center).await
}
