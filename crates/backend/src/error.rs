use clinica_core::ErrorCategory;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Base URL cannot carry path segments.
    #[error("Base URL cannot be a base: {0}")]
    CannotBeABase(String),
}

impl BackendError {
    /// Coarse category for this error.
    ///
    /// Structured information (timeouts, status codes) decides first; free
    /// text falls back to substring classification.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                ErrorCategory::Network
            }
            Self::Http(e) if e.is_decode() => ErrorCategory::Server,
            Self::Http(e) => ErrorCategory::classify(&e.to_string()),
            Self::Status { status, body } => match ErrorCategory::from_status(*status) {
                ErrorCategory::Unknown => ErrorCategory::classify(body),
                category => category,
            },
            Self::Parse(_) => ErrorCategory::Server,
            Self::Url(_) | Self::CannotBeABase(_) => ErrorCategory::Unknown,
        }
    }

    /// HTTP status returned by the backend, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// The `message` field of a JSON error body.
    ///
    /// The backend reports errors as `{"statusCode", "message", "error"}`
    /// where `message` is either a string or a list of strings.
    #[must_use]
    pub fn backend_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("message")? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        }
    }

    /// Message safe to show the user.
    ///
    /// Validation failures surface the backend's own explanation; everything
    /// else gets the generic text for its category.
    #[must_use]
    pub fn user_message(&self) -> String {
        let category = self.category();
        if category == ErrorCategory::Validation
            && let Some(message) = self.backend_message()
        {
            return message;
        }
        category.user_message().to_string()
    }
}

/// Client-side validation failure on an input DTO.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {problem}")]
pub struct InputError {
    pub field: &'static str,
    pub problem: String,
}

impl InputError {
    #[must_use]
    pub fn new(field: &'static str, problem: impl Into<String>) -> Self {
        Self {
            field,
            problem: problem.into(),
        }
    }
}

/// Require a non-blank string field.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        return Err(InputError::new(field, "is required"));
    }
    Ok(())
}
