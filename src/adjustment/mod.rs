//! Telemetry-driven dynamic adjustment
//!
//! The controller turns live telemetry (frame rate, scene luminance and
//! complexity) plus the settings snapshot into an effective bitrate and a
//! foveation-strength multiplier, recomputed at most once per interval.

use std::time::Instant;

use serde::{Deserialize, Serialize};

pub mod bitrate;
pub mod controller;
pub mod foveation;
pub mod frame_rate;

pub use controller::AdjustmentController;
pub use frame_rate::FrameRateMeter;

/// Performance telemetry for one adjustment tick; no history is retained
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub frames_per_second: f32,
    /// Normalized scene luminance in [0, 1]
    pub scene_luminance: f32,
    /// Normalized scene complexity in [0, 1]
    pub scene_complexity: f32,
    pub round_trip_latency_ms: f32,
}

impl TelemetrySample {
    /// Mid-range scene with no frame-rate reading, used before the first tick
    pub fn neutral() -> Self {
        Self {
            frames_per_second: 0.0,
            scene_luminance: 0.5,
            scene_complexity: 0.5,
            round_trip_latency_ms: 0.0,
        }
    }

    /// Copy with non-finite values zeroed and unit values clamped to [0, 1]
    pub fn sanitized(self) -> Self {
        Self {
            frames_per_second: finite_or_zero(self.frames_per_second).max(0.0),
            scene_luminance: finite_or_zero(self.scene_luminance).clamp(0.0, 1.0),
            scene_complexity: finite_or_zero(self.scene_complexity).clamp(0.0, 1.0),
            round_trip_latency_ms: finite_or_zero(self.round_trip_latency_ms).max(0.0),
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Controller outputs consumed by the wire serializer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    pub effective_bitrate_mbps: f32,
    /// Scales every foveation layer quality, in [0.5, 1.0]
    pub foveation_strength_multiplier: f32,
    /// `None` until the first recomputation
    pub last_adjustment: Option<Instant>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            effective_bitrate_mbps: 0.0,
            foveation_strength_multiplier: foveation::MAX_MULTIPLIER,
            last_adjustment: None,
        }
    }
}
