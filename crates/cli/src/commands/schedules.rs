//! Mock schedule generation.
//!
//! # Usage
//!
//! ```bash
//! # Ten random schedules
//! clinica-cli schedules generate
//!
//! # Five completed high-priority consultations, reproducibly
//! clinica-cli schedules generate -n 5 --status completed --priority high --category consultation --seed 7
//! ```

use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};

use clinica_core::schedule::{
    Priority, Schedule, ScheduleCategory, ScheduleError, ScheduleOverrides, ScheduleStatus,
    generate_schedule,
};

use super::CommandError;

/// Most schedules one invocation may generate.
pub const MAX_COUNT: usize = 1_000;

/// Options for `schedules generate`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub count: usize,
    pub status: Option<ScheduleStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ScheduleCategory>,
    pub seed: Option<u64>,
}

/// Generate schedules and render them as pretty JSON.
///
/// # Errors
///
/// Returns an error if the count is zero or above [`MAX_COUNT`].
pub fn generate(options: &GenerateOptions, now: DateTime<Utc>) -> Result<String, CommandError> {
    let schedules = build(options, now)?;
    tracing::debug!(count = schedules.len(), "Generated schedules");
    Ok(serde_json::to_string_pretty(&schedules)?)
}

fn build(options: &GenerateOptions, now: DateTime<Utc>) -> Result<Vec<Schedule>, CommandError> {
    if options.count == 0 || options.count > MAX_COUNT {
        return Err(CommandError::InvalidArgument(format!(
            "count must be between 1 and {MAX_COUNT}"
        )));
    }

    let overrides = ScheduleOverrides {
        status: options.status,
        priority: options.priority,
        category: options.category,
        ..ScheduleOverrides::default()
    };
    let mut rng = options
        .seed
        .map_or_else(|| StdRng::from_rng(&mut rand::rng()), StdRng::seed_from_u64);

    Ok((0..options.count)
        .map(|_| generate_schedule(&mut rng, now, overrides.clone()))
        .collect::<Result<Vec<_>, ScheduleError>>()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_every_schedule() {
        let options = GenerateOptions {
            count: 20,
            status: Some(ScheduleStatus::Completed),
            priority: Some(Priority::High),
            ..GenerateOptions::default()
        };
        let schedules = build(&options, Utc::now()).unwrap();
        assert_eq!(schedules.len(), 20);
        assert!(schedules.iter().all(|s| s.status == ScheduleStatus::Completed));
        assert!(schedules.iter().all(|s| s.priority == Priority::High));
    }

    #[test]
    fn test_count_bounds() {
        let zero = GenerateOptions::default();
        assert!(matches!(
            build(&zero, Utc::now()),
            Err(CommandError::InvalidArgument(_))
        ));

        let too_many = GenerateOptions {
            count: MAX_COUNT + 1,
            ..GenerateOptions::default()
        };
        assert!(build(&too_many, Utc::now()).is_err());
    }

    #[test]
    fn test_output_is_json_array() {
        let options = GenerateOptions {
            count: 2,
            seed: Some(1),
            ..GenerateOptions::default()
        };
        let json = generate(&options, Utc::now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
