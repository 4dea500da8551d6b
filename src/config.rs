//! Configuration management for engine tuning
//!
//! This module provides runtime configuration loading from JSON files for the
//! engine's own knobs (cadence, gaze window, field of view, telemetry sizing).
//! User-facing quality intent lives in `settings::OptimizationSettings`; this
//! file only covers parameters a developer would tweak while tuning the engine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    pub adjustment: AdjustmentConfig,
    pub gaze: GazeConfig,
    pub field_of_view: FieldOfViewConfig,
    pub telemetry: TelemetryConfig,
}

/// Dynamic adjustment cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentConfig {
    /// Minimum time between two recomputations
    pub interval_ms: u64,
}

impl AdjustmentConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// Gaze stability classifier parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Number of movement magnitudes averaged per classification
    pub movement_window_size: usize,
    /// Stillness required after a significant movement before reporting stable
    pub stability_cooldown_ms: u64,
    /// Capacity of the lock-free gaze feed between tracker and classifier
    pub feed_capacity: usize,
}

impl GazeConfig {
    pub fn stability_cooldown(&self) -> Duration {
        Duration::from_millis(self.stability_cooldown_ms)
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            movement_window_size: 5,
            stability_cooldown_ms: 200,
            feed_capacity: 256,
        }
    }
}

/// Display field of view used to normalize foveation radii
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOfViewConfig {
    pub horizontal_degrees: f32,
    pub vertical_degrees: f32,
}

impl Default for FieldOfViewConfig {
    fn default() -> Self {
        Self {
            horizontal_degrees: 100.0,
            vertical_degrees: 100.0,
        }
    }
}

/// Diagnostics telemetry sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Broadcast channel capacity for live subscribers
    pub channel_capacity: usize,
    /// Number of recent events kept for snapshot queries
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_capacity: 64,
        }
    }
}

impl TunerConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or defaults if the file doesn't exist or the
    /// JSON is invalid. Zero-sized windows and capacities are replaced by
    /// their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<TunerConfig>(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        };
        config.sanitized()
    }

    /// Load configuration from the bundled assets directory
    pub fn load() -> Self {
        Self::load_from_file("assets/tuner_config.json")
    }

    fn sanitized(mut self) -> Self {
        let defaults = TunerConfig::default();
        if self.gaze.movement_window_size == 0 {
            log::warn!("[Config] gaze.movement_window_size must be > 0, using default");
            self.gaze.movement_window_size = defaults.gaze.movement_window_size;
        }
        if self.gaze.feed_capacity == 0 {
            log::warn!("[Config] gaze.feed_capacity must be > 0, using default");
            self.gaze.feed_capacity = defaults.gaze.feed_capacity;
        }
        if self.telemetry.channel_capacity == 0 {
            log::warn!("[Config] telemetry.channel_capacity must be > 0, using default");
            self.telemetry.channel_capacity = defaults.telemetry.channel_capacity;
        }
        if !(self.field_of_view.horizontal_degrees > 0.0
            && self.field_of_view.vertical_degrees > 0.0)
        {
            log::warn!("[Config] field_of_view must be positive, using default");
            self.field_of_view = defaults.field_of_view;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TunerConfig::default();
        assert_eq!(config.adjustment.interval(), Duration::from_secs(1));
        assert_eq!(config.gaze.movement_window_size, 5);
        assert_eq!(config.gaze.stability_cooldown(), Duration::from_millis(200));
        assert_eq!(config.field_of_view.horizontal_degrees, 100.0);
        assert_eq!(config.telemetry.history_capacity, 64);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TunerConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: TunerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = TunerConfig::load_from_file("/nonexistent/tuner_config.json");
        assert_eq!(config, TunerConfig::default());
    }

    #[test]
    fn test_partial_file_and_zero_capacity() {
        let path = std::env::temp_dir().join(format!(
            "stream_tuner_config_test_{}.json",
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{ "gaze": {{ "stability_cooldown_ms": 300, "feed_capacity": 0 }} }}"#
        )
        .unwrap();

        let config = TunerConfig::load_from_file(&path);
        fs::remove_file(&path).ok();

        assert_eq!(config.gaze.stability_cooldown_ms, 300);
        assert_eq!(config.gaze.feed_capacity, 256);
        assert_eq!(config.adjustment.interval_ms, 1000);
    }
}
