// Error types for the stream tuner
//
// This module defines custom error types for settings loading/validation and
// for server document generation, with stable numeric codes so hosts embedding
// the library can react to failures programmatically.

mod serialization;
mod session;
mod settings;

pub use serialization::{log_serialization_error, SerializationError, SerializationErrorCodes};
pub use session::SessionError;
pub use settings::{log_settings_error, SettingsError, SettingsErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the embedding boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
