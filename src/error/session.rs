// Session error types

use crate::error::{ErrorCode, SerializationError, SettingsError};
use std::fmt;

/// Errors surfaced by `TuningSession` operations
///
/// Wraps the underlying settings or serialization failure; `code()` reports
/// the wrapped error's code so hosts see the same numbers either way.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Settings snapshot rejected; the previous snapshot stays active
    Settings(SettingsError),

    /// Document generation failed; the last-known-good payload stays active
    Serialization(SerializationError),
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::Settings(err) => err.code(),
            SessionError::Serialization(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::Settings(err) => err.message(),
            SessionError::Serialization(err) => err.message(),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Settings(err) => write!(f, "{}", err),
            SessionError::Serialization(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Settings(err) => Some(err),
            SessionError::Serialization(err) => Some(err),
        }
    }
}

impl From<SettingsError> for SessionError {
    fn from(err: SettingsError) -> Self {
        SessionError::Settings(err)
    }
}

impl From<SerializationError> for SessionError {
    fn from(err: SerializationError) -> Self {
        SessionError::Serialization(err)
    }
}
