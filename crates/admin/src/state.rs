//! Application state shared across handlers.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use clinica_backend::{BackendClient, BackendError};
use clinica_core::schedule::{ScheduleBook, generate_schedules};

use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and the schedule book.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: BackendClient,
    schedules: RwLock<ScheduleBook>,
}

impl AppState {
    /// Create a new application state, seeding the schedule book with
    /// `config.seed_schedules` generated entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let seeded = generate_schedules(&mut rand::rng(), Utc::now(), config.seed_schedules);
        Self::with_schedules(config, ScheduleBook::from_schedules(seeded))
    }

    /// Create a new application state with a given schedule book.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn with_schedules(config: AdminConfig, book: ScheduleBook) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                schedules: RwLock::new(book),
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the shared schedule book.
    #[must_use]
    pub fn schedules(&self) -> &RwLock<ScheduleBook> {
        &self.inner.schedules
    }
}
