use thiserror::Error;

/// Core error types for Summit domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid entity key: {0}")]
    InvalidKey(String),

    #[error("Invalid date '{value}': expected {expected}")]
    InvalidDate { value: String, expected: &'static str },

    #[error("Invalid time '{value}': expected {expected}")]
    InvalidTime { value: String, expected: &'static str },

    #[error("Invalid session type: {0}")]
    InvalidSessionType(String),

    #[error("Invalid shirt size: {0}")]
    InvalidShirtSize(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl CoreError {
    /// Create a new InvalidKey error
    pub fn invalid_key(token: impl Into<String>) -> Self {
        Self::InvalidKey(token.into())
    }

    /// Create a new InvalidDate error
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Create a new InvalidTime error
    pub fn invalid_time(value: impl Into<String>) -> Self {
        Self::InvalidTime {
            value: value.into(),
            expected: "HHMM",
        }
    }

    /// Create a new MissingField error
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(field)
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
