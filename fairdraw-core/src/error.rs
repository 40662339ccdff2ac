use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Min must be less than max (min {min}, max {max})")]
    RangeInverted { min: i64, max: i64 },

    #[error("Min must not be negative (got {0})")]
    NegativeMinimum(i64),

    #[error("Range too large: span {span} exceeds the limit of {limit}")]
    RangeTooLarge { span: u64, limit: u64 },

    #[error("Could not allocate a unique draw key after {attempts} attempts")]
    KeyAllocationFailed { attempts: u32 },

    #[error("Draw not found: {id}")]
    NotFound { id: String },

    // Backend details stay in `source()`, never in the message.
    #[error("Storage failure: the draw store could not complete the request")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage failure: the draw store could not be opened")]
    Io(#[from] std::io::Error),

    #[error("Secure random source unavailable: {0}")]
    SecureRandomUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable, machine-readable error code reported alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    RangeInverted,
    NegativeMinimum,
    RangeTooLarge,
    KeyAllocationFailed,
    NotFound,
    StorageFailure,
    SecureRandomUnavailable,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::RangeInverted => "range_inverted",
            ErrorKind::NegativeMinimum => "negative_minimum",
            ErrorKind::RangeTooLarge => "range_too_large",
            ErrorKind::KeyAllocationFailed => "key_allocation_failed",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StorageFailure => "storage_failure",
            ErrorKind::SecureRandomUnavailable => "secure_random_unavailable",
            ErrorKind::Config => "config",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl DrawError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DrawError::InvalidInput(_) => ErrorKind::InvalidInput,
            DrawError::RangeInverted { .. } => ErrorKind::RangeInverted,
            DrawError::NegativeMinimum(_) => ErrorKind::NegativeMinimum,
            DrawError::RangeTooLarge { .. } => ErrorKind::RangeTooLarge,
            DrawError::KeyAllocationFailed { .. } => ErrorKind::KeyAllocationFailed,
            DrawError::NotFound { .. } => ErrorKind::NotFound,
            DrawError::Storage(_) | DrawError::Io(_) => ErrorKind::StorageFailure,
            DrawError::SecureRandomUnavailable(_) => ErrorKind::SecureRandomUnavailable,
            DrawError::Config(_) => ErrorKind::Config,
            DrawError::Serialization(_) | DrawError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Mistakes the caller can fix by changing the request.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidInput
                | ErrorKind::RangeInverted
                | ErrorKind::NegativeMinimum
                | ErrorKind::RangeTooLarge
                | ErrorKind::NotFound
        )
    }

    /// Backend faults worth retrying later with the same request.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StorageFailure
    }
}
