//! Status enums for backend-owned entities, plus their display badges.
//!
//! The backend serializes statuses as `snake_case` strings. Every status
//! implements [`StatusBadge`] so views can render a label and a colour tone
//! without matching on the variants themselves.

use serde::{Deserialize, Serialize};

/// Colour tone used when rendering a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

impl BadgeTone {
    /// Palette colour name for the tone.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Neutral => "gray",
            Self::Info => "blue",
            Self::Success => "green",
            Self::Warning => "yellow",
            Self::Danger => "red",
        }
    }
}

/// A status that can be rendered as a badge.
pub trait StatusBadge {
    /// Human readable label.
    fn label(&self) -> &'static str;

    /// Colour tone of the badge.
    fn tone(&self) -> BadgeTone;
}

/// Serializable badge view for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
    pub color: &'static str,
}

impl Badge {
    /// Build the badge for any status.
    #[must_use]
    pub fn of(status: &impl StatusBadge) -> Self {
        let tone = status.tone();
        Self {
            label: status.label(),
            tone,
            color: tone.color(),
        }
    }
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} status: {value}")]
pub struct InvalidStatus {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `Display` and `FromStr` over the `snake_case` wire names.
macro_rules! wire_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The `snake_case` name used on the wire.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = InvalidStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(InvalidStatus {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_names;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

wire_names!(OrderStatus, "order", {
    Pending => "pending",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
    Refunded => "refunded",
});

impl OrderStatus {
    /// Whether the order still counts towards revenue.
    #[must_use]
    pub const fn counts_as_revenue(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Refunded)
    }
}

impl StatusBadge for OrderStatus {
    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Refunded => "Refunded",
        }
    }

    fn tone(&self) -> BadgeTone {
        match self {
            Self::Pending => BadgeTone::Warning,
            Self::Processing | Self::Shipped => BadgeTone::Info,
            Self::Delivered => BadgeTone::Success,
            Self::Cancelled => BadgeTone::Danger,
            Self::Refunded => BadgeTone::Neutral,
        }
    }
}

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

wire_names!(PaymentStatus, "payment", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

impl StatusBadge for PaymentStatus {
    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Awaiting payment",
            Self::Paid => "Paid",
            Self::Failed => "Payment failed",
            Self::Refunded => "Refunded",
        }
    }

    fn tone(&self) -> BadgeTone {
        match self {
            Self::Pending => BadgeTone::Warning,
            Self::Paid => BadgeTone::Success,
            Self::Failed => BadgeTone::Danger,
            Self::Refunded => BadgeTone::Neutral,
        }
    }
}

/// Clinic appointment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

wire_names!(AppointmentStatus, "appointment", {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
});

impl AppointmentStatus {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Whether an appointment in this status may move to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Scheduled => matches!(
                next,
                Self::Confirmed | Self::InProgress | Self::Cancelled | Self::NoShow
            ),
            Self::Confirmed => matches!(
                next,
                Self::InProgress | Self::Completed | Self::Cancelled | Self::NoShow
            ),
            Self::InProgress => matches!(next, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled | Self::NoShow => false,
        }
    }
}

impl StatusBadge for AppointmentStatus {
    fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No show",
        }
    }

    fn tone(&self) -> BadgeTone {
        match self {
            Self::Scheduled => BadgeTone::Warning,
            Self::Confirmed | Self::InProgress => BadgeTone::Info,
            Self::Completed => BadgeTone::Success,
            Self::Cancelled => BadgeTone::Danger,
            Self::NoShow => BadgeTone::Neutral,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let parsed: AppointmentStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::NoShow);
    }

    #[test]
    fn test_from_str_accepts_dashes_and_case() {
        assert_eq!(
            "In-Progress".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::InProgress
        );
        assert!("bogus".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for status in AppointmentStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_appointment_transitions() {
        use AppointmentStatus::*;
        assert!(Scheduled.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Scheduled.can_transition_to(Scheduled));
        for status in AppointmentStatus::ALL {
            if status.is_terminal() {
                assert!(AppointmentStatus::ALL.iter().all(|n| !status.can_transition_to(*n)));
            }
        }
    }

    #[test]
    fn test_badges() {
        let badge = Badge::of(&OrderStatus::Cancelled);
        assert_eq!(badge.label, "Cancelled");
        assert_eq!(badge.color, "red");
        assert_eq!(Badge::of(&PaymentStatus::Paid).tone, BadgeTone::Success);
    }

    #[test]
    fn test_revenue_statuses() {
        assert!(OrderStatus::Delivered.counts_as_revenue());
        assert!(!OrderStatus::Refunded.counts_as_revenue());
    }
}
