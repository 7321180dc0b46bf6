//! CLI subcommand implementations.

pub mod backend;
pub mod cart;
pub mod schedules;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Backend configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] clinica_backend::ConfigError),

    /// Backend request failed.
    #[error(transparent)]
    Backend(#[from] clinica_backend::BackendError),

    /// Generated schedule was rejected.
    #[error(transparent)]
    Schedule(#[from] clinica_core::schedule::ScheduleError),

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// An argument was out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
