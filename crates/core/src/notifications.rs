//! Notification centre reducer.
//!
//! Notifications are in-session toasts/inbox entries raised by the web
//! services after an action completes (an order shipped, a booking
//! cancelled). Newest entries come first and the centre keeps at most
//! [`MAX_NOTIFICATIONS`] of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of notifications retained; the oldest are dropped first.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification.
    #[must_use]
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            title: title.into(),
            message: message.into(),
            read: false,
            created_at,
        }
    }
}

/// A mutation of the notification centre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAction {
    Push(Notification),
    MarkRead(Uuid),
    MarkAllRead,
    Dismiss(Uuid),
    Clear,
}

/// All notifications for one session, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    /// Apply an action. Returns `false` when an id-targeted action matched nothing.
    pub fn dispatch(&mut self, action: NotificationAction) -> bool {
        match action {
            NotificationAction::Push(notification) => {
                self.items.insert(0, notification);
                self.items.truncate(MAX_NOTIFICATIONS);
                true
            }
            NotificationAction::MarkRead(id) => {
                self.items
                    .iter_mut()
                    .find(|n| n.id == id)
                    .map(|n| n.read = true)
                    .is_some()
            }
            NotificationAction::MarkAllRead => {
                self.items.iter_mut().for_each(|n| n.read = true);
                true
            }
            NotificationAction::Dismiss(id) => {
                let before = self.items.len();
                self.items.retain(|n| n.id != id);
                self.items.len() != before
            }
            NotificationAction::Clear => {
                self.items.clear();
                true
            }
        }
    }

    /// Notifications, newest first.
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Number of unread notifications.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str) -> Notification {
        Notification::new(NotificationLevel::Info, title, "", Utc::now())
    }

    #[test]
    fn test_push_newest_first_and_capped() {
        let mut center = NotificationCenter::default();
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            center.dispatch(NotificationAction::Push(note(&format!("n{i}"))));
        }
        assert_eq!(center.items().len(), MAX_NOTIFICATIONS);
        assert_eq!(center.items()[0].title, format!("n{}", MAX_NOTIFICATIONS + 4));
        assert_eq!(center.unread_count(), MAX_NOTIFICATIONS);
    }

    #[test]
    fn test_mark_read_and_dismiss() {
        let mut center = NotificationCenter::default();
        let first = note("first");
        let first_id = first.id;
        center.dispatch(NotificationAction::Push(first));
        center.dispatch(NotificationAction::Push(note("second")));

        assert!(center.dispatch(NotificationAction::MarkRead(first_id)));
        assert_eq!(center.unread_count(), 1);

        assert!(center.dispatch(NotificationAction::Dismiss(first_id)));
        assert!(!center.dispatch(NotificationAction::Dismiss(first_id)));
        assert!(!center.dispatch(NotificationAction::MarkRead(Uuid::new_v4())));
        assert_eq!(center.items().len(), 1);

        center.dispatch(NotificationAction::MarkAllRead);
        assert_eq!(center.unread_count(), 0);

        center.dispatch(NotificationAction::Clear);
        assert!(center.items().is_empty());
    }
}
