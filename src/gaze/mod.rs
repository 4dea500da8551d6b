//! Gaze stability classification
//!
//! Raw normalized eye-tracking samples arrive at display rate (~90 Hz) and are
//! smoothed into a stability signal that tells the adjustment layer whether
//! the user is fixating or scanning. The classifier also reports a center
//! shift derived from the clamped gaze position.

use std::time::Instant;

pub mod classifier;
pub mod feed;
mod window;

pub use classifier::GazeClassifier;
pub use feed::{GazeFeed, GazeFeedConsumer, GazeFeedProducer};
pub use window::MovementWindow;

/// Raw gaze position in normalized display space, nominally [-0.5, 0.5]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazeSample {
    pub x: f32,
    pub y: f32,
}

impl GazeSample {
    pub const ORIGIN: GazeSample = GazeSample { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both axes into [-0.5, 0.5]; NaN collapses to the center
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_axis(self.x),
            y: clamp_axis(self.y),
        }
    }

    pub fn distance_to(self, other: GazeSample) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Gaze sample stamped on the tracker thread, as carried by the gaze feed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedGazeSample {
    pub sample: GazeSample,
    pub tracking_active: bool,
    pub captured_at: Instant,
}

/// Classifier output for one ingested sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeState {
    /// Center shift in [-1, 1]
    pub shift_x: f32,
    pub shift_y: f32,
    pub is_tracking_active: bool,
    pub is_stable: bool,
    /// Mean movement over the window, 0 when no movement was evaluated
    pub mean_movement: f32,
}

impl Default for GazeState {
    fn default() -> Self {
        Self {
            shift_x: 0.0,
            shift_y: 0.0,
            is_tracking_active: false,
            is_stable: true,
            mean_movement: 0.0,
        }
    }
}

pub(crate) const GAZE_AXIS_LIMIT: f32 = 0.5;

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-GAZE_AXIS_LIMIT, GAZE_AXIS_LIMIT)
    }
}
