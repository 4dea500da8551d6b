// Serialization error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Serialization error code constants
///
/// Error code range: 2001-2003
pub struct SerializationErrorCodes {}

impl SerializationErrorCodes {
    /// Internal enum value has no server tag and no safe fallback
    pub const UNMAPPABLE_ENUM: i32 = 2001;

    /// Numeric or structural value outside its legal domain
    pub const OUT_OF_DOMAIN: i32 = 2002;

    /// JSON encoding of an otherwise valid document failed
    pub const ENCODE: i32 = 2003;
}

/// Log a serialization error with structured context
pub fn log_serialization_error(err: &SerializationError, context: &str) {
    error!(
        "Serialization error in {}: code={}, component=WireSerializer, field={}, message={}",
        context,
        err.code(),
        err.field().unwrap_or("-"),
        err.message()
    );
}

/// Errors raised while building the server configuration document
///
/// A failed serialization never yields a partial document; the caller keeps
/// whatever it last dispatched successfully.
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, PartialEq)]
pub enum SerializationError {
    /// Internal enum value cannot be expressed on the wire
    UnmappableEnum { field: String, value: String },

    /// Value outside its legal domain (e.g. non-positive bitrate)
    OutOfDomain {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// serde_json failed to render the document
    Encode { reason: String },
}

impl SerializationError {
    pub(crate) fn out_of_domain(
        field: impl Into<String>,
        value: impl fmt::Display,
        expected: &'static str,
    ) -> Self {
        SerializationError::OutOfDomain {
            field: field.into(),
            value: value.to_string(),
            expected,
        }
    }

    /// Name of the offending field, when the failure is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            SerializationError::UnmappableEnum { field, .. }
            | SerializationError::OutOfDomain { field, .. } => Some(field),
            SerializationError::Encode { .. } => None,
        }
    }
}

impl ErrorCode for SerializationError {
    fn code(&self) -> i32 {
        match self {
            SerializationError::UnmappableEnum { .. } => SerializationErrorCodes::UNMAPPABLE_ENUM,
            SerializationError::OutOfDomain { .. } => SerializationErrorCodes::OUT_OF_DOMAIN,
            SerializationError::Encode { .. } => SerializationErrorCodes::ENCODE,
        }
    }

    fn message(&self) -> String {
        match self {
            SerializationError::UnmappableEnum { field, value } => {
                format!("No server mapping for {} = {}", field, value)
            }
            SerializationError::OutOfDomain {
                field,
                value,
                expected,
            } => format!("{} = {} is out of domain (expected {})", field, value, expected),
            SerializationError::Encode { reason } => {
                format!("Failed to encode server document: {}", reason)
            }
        }
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerializationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SerializationError {}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::Encode {
            reason: err.to_string(),
        }
    }
}
