//! Schedule records, the in-memory schedule book and the mock generator.
//!
//! Schedules back the calendar views of the admin service. They are not
//! owned by the backend: the admin process keeps a single [`ScheduleBook`]
//! shared by every session, seeded at startup by [`generate_schedules`] and
//! grown by hand or by [`generate_schedule`]. The book holds at most
//! [`MAX_SCHEDULES`] entries.
//!
//! The generator is structurally deterministic (every field is always
//! populated from a fixed vocabulary) but its content comes from whatever
//! [`rand::Rng`] the caller hands in. Pass `rand::rng()` for demo data or a
//! seeded `StdRng` when a test needs reproducible fixtures.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::status::{BadgeTone, InvalidStatus, StatusBadge, wire_names};

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of a schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

wire_names!(ScheduleStatus, "schedule", {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
    Postponed => "postponed",
});

impl StatusBadge for ScheduleStatus {
    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Postponed => "Postponed",
        }
    }

    fn tone(&self) -> BadgeTone {
        match self {
            Self::Pending => BadgeTone::Warning,
            Self::InProgress => BadgeTone::Info,
            Self::Completed => BadgeTone::Success,
            Self::Cancelled => BadgeTone::Danger,
            Self::Postponed => BadgeTone::Neutral,
        }
    }
}

/// How urgent a schedule entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

wire_names!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

impl StatusBadge for Priority {
    fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    fn tone(&self) -> BadgeTone {
        match self {
            Self::Low => BadgeTone::Neutral,
            Self::Medium => BadgeTone::Info,
            Self::High => BadgeTone::Warning,
            Self::Urgent => BadgeTone::Danger,
        }
    }
}

/// Kind of clinic activity a schedule entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleCategory {
    #[default]
    Consultation,
    FollowUp,
    Procedure,
    Checkup,
    Therapy,
    Administrative,
}

wire_names!(ScheduleCategory, "category", {
    Consultation => "consultation",
    FollowUp => "follow_up",
    Procedure => "procedure",
    Checkup => "checkup",
    Therapy => "therapy",
    Administrative => "administrative",
});

impl StatusBadge for ScheduleCategory {
    fn label(&self) -> &'static str {
        match self {
            Self::Consultation => "Consultation",
            Self::FollowUp => "Follow-up",
            Self::Procedure => "Procedure",
            Self::Checkup => "Check-up",
            Self::Therapy => "Therapy",
            Self::Administrative => "Administrative",
        }
    }

    fn tone(&self) -> BadgeTone {
        match self {
            Self::Consultation | Self::Checkup => BadgeTone::Info,
            Self::FollowUp | Self::Therapy => BadgeTone::Success,
            Self::Procedure => BadgeTone::Warning,
            Self::Administrative => BadgeTone::Neutral,
        }
    }
}

/// Repetition unit of a recurring schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: &'static [Self] = &[Self::Daily, Self::Weekly, Self::Monthly];
}

/// Optional recurrence pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    /// Repeat every `interval` units; always at least 1.
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

/// Channel a reminder is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    Email,
    Sms,
    Push,
}

impl ReminderChannel {
    pub const ALL: &'static [Self] = &[Self::Email, Self::Sms, Self::Push];
}

/// A reminder sent ahead of the scheduled time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub minutes_before: u32,
    pub channel: ReminderChannel,
}

// =============================================================================
// Schedule
// =============================================================================

/// A single calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: ScheduleStatus,
    pub priority: Priority,
    pub category: ScheduleCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a schedule created by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSchedule {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: ScheduleCategory,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

const fn default_duration() -> u32 {
    30
}

/// Errors raised when schedule input is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("duration must be between 5 and 720 minutes")]
    InvalidDuration,
    #[error("recurrence interval must be at least 1")]
    InvalidInterval,
    #[error("schedule {0} not found")]
    NotFound(Uuid),
    #[error("schedule book is full ({0} schedules max)")]
    BookFull(usize),
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
}

impl NewSchedule {
    /// Validate the input and build a schedule stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if the title is blank, the duration is out
    /// of range or the recurrence interval is zero.
    pub fn into_schedule(self, now: DateTime<Utc>) -> Result<Schedule, ScheduleError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ScheduleError::EmptyTitle);
        }
        validate_duration(self.duration_minutes)?;
        validate_recurrence(self.recurrence.as_ref())?;

        Ok(Schedule {
            id: Uuid::new_v4(),
            title,
            description: self.description.trim().to_string(),
            date: self.date,
            duration_minutes: self.duration_minutes,
            status: self.status,
            priority: self.priority,
            category: self.category,
            recurrence: self.recurrence,
            reminders: self.reminders,
            created_at: now,
            updated_at: now,
        })
    }
}

fn validate_duration(minutes: u32) -> Result<(), ScheduleError> {
    if (5..=720).contains(&minutes) {
        Ok(())
    } else {
        Err(ScheduleError::InvalidDuration)
    }
}

fn validate_recurrence(recurrence: Option<&Recurrence>) -> Result<(), ScheduleError> {
    match recurrence {
        Some(r) if r.interval == 0 => Err(ScheduleError::InvalidInterval),
        _ => Ok(()),
    }
}

/// Partial update of a schedule; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub status: Option<ScheduleStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ScheduleCategory>,
    /// `Some(None)` clears the recurrence.
    #[serde(default, with = "double_option")]
    pub recurrence: Option<Option<Recurrence>>,
    pub reminders: Option<Vec<Reminder>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Criteria for listing schedules. Empty criteria match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleFilter {
    pub status: Option<ScheduleStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ScheduleCategory>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive match against title and description.
    pub search: Option<String>,
}

impl ScheduleFilter {
    /// Whether a schedule satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, schedule: &Schedule) -> bool {
        if self.status.is_some_and(|s| s != schedule.status)
            || self.priority.is_some_and(|p| p != schedule.priority)
            || self.category.is_some_and(|c| c != schedule.category)
            || self.from.is_some_and(|from| schedule.date < from)
            || self.to.is_some_and(|to| schedule.date > to)
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                schedule.title.to_lowercase().contains(&needle)
                    || schedule.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

// =============================================================================
// ScheduleBook
// =============================================================================

/// Count of schedules per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ScheduleStatus,
    pub count: usize,
}

/// Most schedules a [`ScheduleBook`] holds.
pub const MAX_SCHEDULES: usize = 500;

/// A bounded collection of schedules, mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBook {
    schedules: Vec<Schedule>,
}

impl ScheduleBook {
    /// Build a book from existing schedules, keeping the first
    /// [`MAX_SCHEDULES`].
    #[must_use]
    pub fn from_schedules(mut schedules: Vec<Schedule>) -> Self {
        schedules.truncate(MAX_SCHEDULES);
        Self { schedules }
    }

    /// Number of schedules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    /// Whether the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Every schedule in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Add a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::BookFull`] if the book is at capacity.
    pub fn insert(&mut self, schedule: Schedule) -> Result<(), ScheduleError> {
        self.extend(vec![schedule])
    }

    /// Add several schedules. Either all of them are added or none.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::BookFull`] if they do not all fit.
    pub fn extend(&mut self, schedules: Vec<Schedule>) -> Result<(), ScheduleError> {
        if self.schedules.len() + schedules.len() > MAX_SCHEDULES {
            return Err(ScheduleError::BookFull(MAX_SCHEDULES));
        }
        self.schedules.extend(schedules);
        Ok(())
    }

    /// Look up a schedule by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    /// Apply a patch to a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NotFound`] for an unknown id, or a validation
    /// error if the patch would make the schedule invalid (nothing is changed then).
    pub fn update(
        &mut self,
        id: Uuid,
        patch: SchedulePatch,
        now: DateTime<Utc>,
    ) -> Result<&Schedule, ScheduleError> {
        let schedule = self
            .schedules
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ScheduleError::NotFound(id))?;

        let title = match patch.title {
            Some(title) if title.trim().is_empty() => return Err(ScheduleError::EmptyTitle),
            Some(title) => Some(title.trim().to_string()),
            None => None,
        };
        if let Some(minutes) = patch.duration_minutes {
            validate_duration(minutes)?;
        }
        if let Some(recurrence) = &patch.recurrence {
            validate_recurrence(recurrence.as_ref())?;
        }

        if let Some(title) = title {
            schedule.title = title;
        }
        if let Some(description) = patch.description {
            schedule.description = description.trim().to_string();
        }
        if let Some(date) = patch.date {
            schedule.date = date;
        }
        if let Some(minutes) = patch.duration_minutes {
            schedule.duration_minutes = minutes;
        }
        if let Some(status) = patch.status {
            schedule.status = status;
        }
        if let Some(priority) = patch.priority {
            schedule.priority = priority;
        }
        if let Some(category) = patch.category {
            schedule.category = category;
        }
        if let Some(recurrence) = patch.recurrence {
            schedule.recurrence = recurrence;
        }
        if let Some(reminders) = patch.reminders {
            schedule.reminders = reminders;
        }
        schedule.updated_at = now;

        Ok(schedule)
    }

    /// Change only the status of a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NotFound`] for an unknown id.
    pub fn set_status(
        &mut self,
        id: Uuid,
        status: ScheduleStatus,
        now: DateTime<Utc>,
    ) -> Result<&Schedule, ScheduleError> {
        self.update(
            id,
            SchedulePatch {
                status: Some(status),
                ..SchedulePatch::default()
            },
            now,
        )
    }

    /// Remove a schedule, returning it.
    pub fn remove(&mut self, id: Uuid) -> Option<Schedule> {
        let index = self.schedules.iter().position(|s| s.id == id)?;
        Some(self.schedules.remove(index))
    }

    /// Remove every schedule.
    pub fn clear(&mut self) {
        self.schedules.clear();
    }

    /// Schedules matching `filter`, sorted by date.
    #[must_use]
    pub fn filter(&self, filter: &ScheduleFilter) -> Vec<&Schedule> {
        let mut matches: Vec<&Schedule> =
            self.schedules.iter().filter(|s| filter.matches(s)).collect();
        matches.sort_by_key(|s| s.date);
        matches
    }

    /// The next `limit` open schedules at or after `now`.
    #[must_use]
    pub fn upcoming(&self, now: DateTime<Utc>, limit: usize) -> Vec<&Schedule> {
        let mut upcoming: Vec<&Schedule> = self
            .schedules
            .iter()
            .filter(|s| {
                s.date >= now
                    && matches!(
                        s.status,
                        ScheduleStatus::Pending | ScheduleStatus::InProgress | ScheduleStatus::Postponed
                    )
            })
            .collect();
        upcoming.sort_by_key(|s| s.date);
        upcoming.truncate(limit);
        upcoming
    }

    /// Number of schedules per status, covering every status.
    #[must_use]
    pub fn status_counts(&self) -> Vec<StatusCount> {
        ScheduleStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: self.schedules.iter().filter(|s| s.status == status).count(),
            })
            .collect()
    }
}

// =============================================================================
// Mock generator
// =============================================================================

/// Title and matching description used for generated schedules.
const TEMPLATES: &[(&str, &str)] = &[
    (
        "Initial consultation",
        "First visit to review medical history and discuss treatment goals.",
    ),
    (
        "Follow-up visit",
        "Review progress since the last appointment and adjust the care plan.",
    ),
    (
        "Annual check-up",
        "Routine physical examination with standard blood work.",
    ),
    (
        "Physiotherapy session",
        "Guided mobility exercises and manual therapy.",
    ),
    (
        "Minor procedure",
        "Outpatient procedure under local anaesthetic.",
    ),
    (
        "Lab results review",
        "Walk through recent lab results with the patient.",
    ),
    (
        "Vaccination",
        "Scheduled immunisation and post-injection observation.",
    ),
    (
        "Inventory count",
        "Count pharmacy and retail stock before the monthly order.",
    ),
    (
        "Staff meeting",
        "Weekly coordination meeting for front desk and practitioners.",
    ),
    (
        "Nutrition counselling",
        "Dietary assessment and meal planning session.",
    ),
];

const DURATIONS: &[u32] = &[15, 30, 45, 60, 90];
const REMINDER_OFFSETS: &[u32] = &[15, 60, 1440];

/// First and last opening hour for generated slots.
const OPENING_HOUR: u32 = 8;
const CLOSING_HOUR: u32 = 17;

/// Field overrides for [`generate_schedule`]. `None` means "pick at random".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub status: Option<ScheduleStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ScheduleCategory>,
    pub recurrence: Option<Recurrence>,
    pub reminders: Option<Vec<Reminder>>,
}

impl ScheduleOverrides {
    /// Check the overrides against the same rules as user input.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] for a blank title, an out-of-range
    /// duration or a zero recurrence interval.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ScheduleError::EmptyTitle);
        }
        if let Some(minutes) = self.duration_minutes {
            validate_duration(minutes)?;
        }
        validate_recurrence(self.recurrence.as_ref())
    }
}

fn pick<T: Copy + Default, R: Rng + ?Sized>(rng: &mut R, values: &[T]) -> T {
    values.choose(rng).copied().unwrap_or_default()
}

/// A random slot 1..=30 days after `now`, on the hour, during opening hours.
fn random_future_date<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    let day = (now + Duration::days(rng.random_range(1..=30))).date_naive();
    let hour = rng.random_range(OPENING_HOUR..=CLOSING_HOUR);
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&day.and_time(time))
}

fn random_recurrence<R: Rng + ?Sized>(rng: &mut R, date: DateTime<Utc>) -> Recurrence {
    let frequency = Frequency::ALL
        .choose(rng)
        .copied()
        .unwrap_or(Frequency::Weekly);
    let interval = rng.random_range(1..=3);
    let until = rng
        .random_bool(0.5)
        .then(|| date + Duration::weeks(rng.random_range(4..=12)));
    Recurrence {
        frequency,
        interval,
        until,
    }
}

fn random_reminders<R: Rng + ?Sized>(rng: &mut R) -> Vec<Reminder> {
    let count = rng.random_range(0..=2);
    let mut reminders: Vec<Reminder> = REMINDER_OFFSETS
        .choose_multiple(rng, count)
        .map(|&minutes_before| Reminder {
            minutes_before,
            channel: ReminderChannel::ALL
                .choose(rng)
                .copied()
                .unwrap_or(ReminderChannel::Email),
        })
        .collect();
    reminders.sort_by_key(|r| std::cmp::Reverse(r.minutes_before));
    reminders
}

/// Generate one fake schedule.
///
/// Title and description are picked as a pair so they always agree. Any
/// field set in `overrides` replaces the random choice.
///
/// # Errors
///
/// Returns a [`ScheduleError`] if the overrides fail
/// [`ScheduleOverrides::validate`].
pub fn generate_schedule<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    overrides: ScheduleOverrides,
) -> Result<Schedule, ScheduleError> {
    overrides.validate()?;
    Ok(build_schedule(rng, now, overrides))
}

fn build_schedule<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    overrides: ScheduleOverrides,
) -> Schedule {
    let (title, description) = TEMPLATES
        .choose(rng)
        .copied()
        .unwrap_or(("Appointment", ""));
    let date = overrides
        .date
        .unwrap_or_else(|| random_future_date(rng, now));
    let recurrence = overrides.recurrence.or_else(|| {
        rng.random_bool(0.3)
            .then(|| random_recurrence(rng, date))
    });
    let reminders = overrides
        .reminders
        .unwrap_or_else(|| random_reminders(rng));

    Schedule {
        id: Uuid::new_v4(),
        title: overrides
            .title
            .map_or_else(|| title.to_string(), |t| t.trim().to_string()),
        description: overrides
            .description
            .unwrap_or_else(|| description.to_string()),
        date,
        duration_minutes: overrides
            .duration_minutes
            .unwrap_or_else(|| pick(rng, DURATIONS)),
        status: overrides
            .status
            .unwrap_or_else(|| pick(rng, ScheduleStatus::ALL)),
        priority: overrides
            .priority
            .unwrap_or_else(|| pick(rng, Priority::ALL)),
        category: overrides
            .category
            .unwrap_or_else(|| pick(rng, ScheduleCategory::ALL)),
        recurrence,
        reminders,
        created_at: now,
        updated_at: now,
    }
}

/// Generate `count` fake schedules with no overrides.
pub fn generate_schedules<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    count: usize,
) -> Vec<Schedule> {
    (0..count)
        .map(|_| build_schedule(rng, now, ScheduleOverrides::default()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Timelike;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_generated_enums_are_members() {
        let mut rng = StdRng::seed_from_u64(11);
        for schedule in generate_schedules(&mut rng, now(), 200) {
            assert!(ScheduleStatus::ALL.contains(&schedule.status));
            assert!(Priority::ALL.contains(&schedule.priority));
            assert!(ScheduleCategory::ALL.contains(&schedule.category));
        }
    }

    #[test]
    fn test_generated_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        for schedule in generate_schedules(&mut rng, now(), 100) {
            assert!(schedule.date > now());
            assert!(schedule.date <= now() + Duration::days(31));
            assert!((OPENING_HOUR..=CLOSING_HOUR).contains(&schedule.date.hour()));
            assert!(DURATIONS.contains(&schedule.duration_minutes));
            assert!(schedule.reminders.len() <= 2);
            assert!(TEMPLATES
                .iter()
                .any(|(t, d)| *t == schedule.title && *d == schedule.description));
            if let Some(recurrence) = &schedule.recurrence {
                assert!(recurrence.interval >= 1);
            }
        }
    }

    #[test]
    fn test_overrides_win() {
        let mut rng = StdRng::seed_from_u64(5);
        let date = now() + Duration::days(2);
        let schedule = generate_schedule(
            &mut rng,
            now(),
            ScheduleOverrides {
                title: Some("Board review".to_string()),
                date: Some(date),
                status: Some(ScheduleStatus::Postponed),
                priority: Some(Priority::Urgent),
                category: Some(ScheduleCategory::Administrative),
                reminders: Some(vec![]),
                ..ScheduleOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(schedule.title, "Board review");
        assert_eq!(schedule.date, date);
        assert_eq!(schedule.status, ScheduleStatus::Postponed);
        assert_eq!(schedule.priority, Priority::Urgent);
        assert_eq!(schedule.category, ScheduleCategory::Administrative);
        assert!(schedule.reminders.is_empty());
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let cases = [
            (
                ScheduleOverrides {
                    title: Some("   ".to_string()),
                    ..ScheduleOverrides::default()
                },
                ScheduleError::EmptyTitle,
            ),
            (
                ScheduleOverrides {
                    duration_minutes: Some(0),
                    ..ScheduleOverrides::default()
                },
                ScheduleError::InvalidDuration,
            ),
            (
                ScheduleOverrides {
                    recurrence: Some(Recurrence {
                        frequency: Frequency::Daily,
                        interval: 0,
                        until: None,
                    }),
                    ..ScheduleOverrides::default()
                },
                ScheduleError::InvalidInterval,
            ),
        ];
        for (overrides, expected) in cases {
            assert_eq!(
                generate_schedule(&mut rng, now(), overrides),
                Err(expected)
            );
        }

        let trimmed = generate_schedule(
            &mut rng,
            now(),
            ScheduleOverrides {
                title: Some(" Triage ".to_string()),
                ..ScheduleOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(trimmed.title, "Triage");
    }

    #[test]
    fn test_book_is_capped() {
        let mut rng = StdRng::seed_from_u64(4);
        let seeded = ScheduleBook::from_schedules(generate_schedules(
            &mut rng,
            now(),
            MAX_SCHEDULES + 10,
        ));
        assert_eq!(seeded.len(), MAX_SCHEDULES);

        let mut book =
            ScheduleBook::from_schedules(generate_schedules(&mut rng, now(), MAX_SCHEDULES - 2));
        let mut batch = generate_schedules(&mut rng, now(), 3);
        assert_eq!(
            book.extend(batch.clone()),
            Err(ScheduleError::BookFull(MAX_SCHEDULES))
        );
        assert_eq!(book.len(), MAX_SCHEDULES - 2);

        let last = batch.pop().unwrap();
        book.extend(batch).unwrap();
        assert_eq!(book.len(), MAX_SCHEDULES);
        assert_eq!(book.insert(last), Err(ScheduleError::BookFull(MAX_SCHEDULES)));
    }

    #[test]
    fn test_new_schedule_validation() {
        let input = NewSchedule {
            title: "  ".to_string(),
            description: String::new(),
            date: now(),
            duration_minutes: 30,
            status: ScheduleStatus::Pending,
            priority: Priority::Low,
            category: ScheduleCategory::Checkup,
            recurrence: None,
            reminders: vec![],
        };
        assert_eq!(
            input.clone().into_schedule(now()),
            Err(ScheduleError::EmptyTitle)
        );

        let bad_duration = NewSchedule {
            title: "Ok".to_string(),
            duration_minutes: 2,
            ..input.clone()
        };
        assert_eq!(
            bad_duration.into_schedule(now()),
            Err(ScheduleError::InvalidDuration)
        );

        let good = NewSchedule {
            title: " Intake ".to_string(),
            ..input
        };
        assert_eq!(good.into_schedule(now()).unwrap().title, "Intake");
    }

    fn book() -> ScheduleBook {
        let mut rng = StdRng::seed_from_u64(21);
        ScheduleBook::from_schedules(generate_schedules(&mut rng, now(), 40))
    }

    #[test]
    fn test_filter_is_sorted_and_consistent() {
        let book = book();
        let filter = ScheduleFilter {
            status: Some(ScheduleStatus::Pending),
            ..ScheduleFilter::default()
        };
        let pending = book.filter(&filter);
        assert!(pending.iter().all(|s| s.status == ScheduleStatus::Pending));
        assert!(pending.windows(2).all(|w| w[0].date <= w[1].date));

        let counts = book.status_counts();
        let pending_count = counts
            .iter()
            .find(|c| c.status == ScheduleStatus::Pending)
            .unwrap()
            .count;
        assert_eq!(pending_count, pending.len());
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), book.len());
    }

    #[test]
    fn test_filter_by_search_and_range() {
        let book = book();
        let from = now() + Duration::days(10);
        let to = now() + Duration::days(20);
        let filter = ScheduleFilter {
            from: Some(from),
            to: Some(to),
            search: Some("VISIT".to_string()),
            ..ScheduleFilter::default()
        };
        for s in book.filter(&filter) {
            assert!(s.date >= from && s.date <= to);
            let haystack = format!("{} {}", s.title, s.description).to_lowercase();
            assert!(haystack.contains("visit"));
        }
    }

    #[test]
    fn test_update_set_status_and_remove() {
        let mut book = book();
        let id = book.all()[0].id;
        let later = now() + Duration::hours(1);

        let updated = book
            .update(
                id,
                SchedulePatch {
                    title: Some("Renamed".to_string()),
                    recurrence: Some(None),
                    ..SchedulePatch::default()
                },
                later,
            )
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert!(updated.recurrence.is_none());
        assert_eq!(updated.updated_at, later);

        let status = book.set_status(id, ScheduleStatus::Completed, later).unwrap().status;
        assert_eq!(status, ScheduleStatus::Completed);

        let before = book.len();
        assert!(book.remove(id).is_some());
        assert_eq!(book.len(), before - 1);
        assert!(book.get(id).is_none());
        assert_eq!(
            book.set_status(id, ScheduleStatus::Pending, later),
            Err(ScheduleError::NotFound(id))
        );
    }

    #[test]
    fn test_update_rejects_blank_title_without_changes() {
        let mut book = book();
        let original = book.all()[0].clone();
        let result = book.update(
            original.id,
            SchedulePatch {
                title: Some(" ".to_string()),
                status: Some(ScheduleStatus::Cancelled),
                ..SchedulePatch::default()
            },
            now(),
        );
        assert_eq!(result.map(|s| s.id), Err(ScheduleError::EmptyTitle));
        assert_eq!(book.get(original.id), Some(&original));
    }

    #[test]
    fn test_upcoming_excludes_closed() {
        let book = book();
        let upcoming = book.upcoming(now(), 5);
        assert!(upcoming.len() <= 5);
        assert!(upcoming.iter().all(|s| !matches!(
            s.status,
            ScheduleStatus::Completed | ScheduleStatus::Cancelled
        )));
    }

    #[test]
    fn test_patch_distinguishes_missing_and_null_recurrence() {
        let missing: SchedulePatch = serde_json::from_str("{}").unwrap();
        assert!(missing.recurrence.is_none());
        let cleared: SchedulePatch = serde_json::from_str(r#"{"recurrence":null}"#).unwrap();
        assert_eq!(cleared.recurrence, Some(None));
    }
}
