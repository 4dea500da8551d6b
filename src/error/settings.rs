// Settings error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Settings error code constants
///
/// Single source of truth for the codes reported by `SettingsError`.
///
/// Error code range: 1001-1006
pub struct SettingsErrorCodes {}

impl SettingsErrorCodes {
    /// Settings JSON could not be parsed
    pub const PARSE: i32 = 1001;

    /// Scene complexity max threshold is not above the min threshold
    pub const INVERTED_COMPLEXITY_THRESHOLDS: i32 = 1002;

    /// Foveation layer list is empty
    pub const EMPTY_FOVEATION_LAYERS: i32 = 1003;

    /// A foveation layer carries an out-of-range value
    pub const INVALID_LAYER: i32 = 1004;

    /// A scalar setting is outside its legal range
    pub const INVALID_VALUE: i32 = 1005;

    /// Settings file could not be read
    pub const IO: i32 = 1006;
}

/// Log a settings error with structured context
///
/// Emits the numeric code, the owning component and the message so failures
/// can be grepped out of device logs.
pub fn log_settings_error(err: &SettingsError, context: &str) {
    error!(
        "Settings error in {}: code={}, component=SettingsValidator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Settings loading and validation errors
///
/// Adjustment and classification never fail at runtime, so every
/// configuration problem that would make them ill-defined (for example a
/// zero-width complexity range) is rejected here, before a snapshot is
/// accepted.
///
/// Error code range: 1001-1006
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Settings JSON is malformed
    Parse { reason: String },

    /// `scene_complexity_max_threshold` must be strictly above the min
    InvertedComplexityThresholds { min: f32, max: f32 },

    /// At least one foveation layer is required
    EmptyFoveationLayers,

    /// Foveation layer at `index` is invalid
    InvalidLayer { index: usize, reason: String },

    /// Named field is out of range
    InvalidValue { field: String, reason: String },

    /// Settings file could not be read
    Io { reason: String },
}

impl ErrorCode for SettingsError {
    fn code(&self) -> i32 {
        match self {
            SettingsError::Parse { .. } => SettingsErrorCodes::PARSE,
            SettingsError::InvertedComplexityThresholds { .. } => {
                SettingsErrorCodes::INVERTED_COMPLEXITY_THRESHOLDS
            }
            SettingsError::EmptyFoveationLayers => SettingsErrorCodes::EMPTY_FOVEATION_LAYERS,
            SettingsError::InvalidLayer { .. } => SettingsErrorCodes::INVALID_LAYER,
            SettingsError::InvalidValue { .. } => SettingsErrorCodes::INVALID_VALUE,
            SettingsError::Io { .. } => SettingsErrorCodes::IO,
        }
    }

    fn message(&self) -> String {
        match self {
            SettingsError::Parse { reason } => format!("Failed to parse settings: {}", reason),
            SettingsError::InvertedComplexityThresholds { min, max } => format!(
                "Scene complexity thresholds inverted: max {} must exceed min {}",
                max, min
            ),
            SettingsError::EmptyFoveationLayers => {
                "Foveation requires at least one layer".to_string()
            }
            SettingsError::InvalidLayer { index, reason } => {
                format!("Foveation layer {} invalid: {}", index, reason)
            }
            SettingsError::InvalidValue { field, reason } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            SettingsError::Io { reason } => format!("Failed to read settings: {}", reason),
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SettingsError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SettingsError {}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_error_codes() {
        assert_eq!(
            SettingsError::Parse {
                reason: "x".to_string()
            }
            .code(),
            SettingsErrorCodes::PARSE
        );
        assert_eq!(
            SettingsError::InvertedComplexityThresholds { min: 0.8, max: 0.3 }.code(),
            SettingsErrorCodes::INVERTED_COMPLEXITY_THRESHOLDS
        );
        assert_eq!(
            SettingsError::EmptyFoveationLayers.code(),
            SettingsErrorCodes::EMPTY_FOVEATION_LAYERS
        );
        assert_eq!(
            SettingsError::InvalidLayer {
                index: 1,
                reason: "x".to_string()
            }
            .code(),
            SettingsErrorCodes::INVALID_LAYER
        );
        assert_eq!(
            SettingsError::InvalidValue {
                field: "f".to_string(),
                reason: "x".to_string()
            }
            .code(),
            SettingsErrorCodes::INVALID_VALUE
        );
        assert_eq!(
            SettingsError::Io {
                reason: "x".to_string()
            }
            .code(),
            SettingsErrorCodes::IO
        );
    }

    #[test]
    fn test_settings_error_messages() {
        let err = SettingsError::InvertedComplexityThresholds { min: 0.8, max: 0.3 };
        assert!(err.message().contains("0.8"));
        assert!(err.message().contains("0.3"));

        let err = SettingsError::InvalidLayer {
            index: 2,
            reason: "quality 0".to_string(),
        };
        assert_eq!(err.message(), "Foveation layer 2 invalid: quality 0");

        let display = format!("{}", SettingsError::EmptyFoveationLayers);
        assert!(display.contains("SettingsError"));
        assert!(display.contains("1003"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
