//! Core telemetry event types describing engine diagnostics exposed to
//! embedding hosts.

use serde::{Deserialize, Serialize};

/// Metric events covering adjustment decisions, gaze stability and dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    BitrateAdjusted {
        previous_mbps: f32,
        effective_mbps: f32,
    },
    FoveationStrength {
        multiplier: f32,
    },
    GazeStability {
        stable: bool,
        mean_movement: f32,
    },
    Latency {
        avg_ms: f32,
        max_ms: f32,
        sample_count: usize,
    },
    ConfigDispatched {
        revision: u64,
        bytes: usize,
    },
    SerializationFailed {
        code: i32,
        field: Option<String>,
        message: String,
    },
    GazeFeedOverflow {
        dropped: u64,
    },
}
