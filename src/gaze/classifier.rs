// GazeClassifier - smooths raw gaze samples into a stability signal
//
// Each sample contributes the Euclidean distance from the previous position
// to a rolling window. A window mean above the sensitivity-derived threshold
// marks the gaze unstable and restarts the cooldown; the gaze only becomes
// stable again once the cooldown has fully elapsed without another
// significant movement.

use std::time::{Duration, Instant};

use crate::config::GazeConfig;
use crate::gaze::{GazeSample, GazeState, MovementWindow, TimedGazeSample};
use crate::settings::FoveationConfig;

/// Threshold at sensitivity 1.0
const BASE_MOVEMENT_THRESHOLD: f32 = 0.01;
/// Added threshold range as sensitivity falls to 0
const SENSITIVITY_THRESHOLD_SPAN: f32 = 0.1;
/// Clamped [-0.5, 0.5] gaze maps onto a [-1, 1] center shift
const SHIFT_SCALE: f32 = 2.0;

/// Movement threshold for a sensitivity in [0, 1]; higher is more sensitive
pub fn movement_threshold(sensitivity: f32) -> f32 {
    BASE_MOVEMENT_THRESHOLD + (1.0 - sensitivity.clamp(0.0, 1.0)) * SENSITIVITY_THRESHOLD_SPAN
}

/// Stateful gaze stability classifier
///
/// Owned by a single consumer (the tuning session or the caller driving the
/// eye-tracking loop). `ingest` never fails; out-of-range and NaN inputs are
/// clamped.
#[derive(Debug, Clone)]
pub struct GazeClassifier {
    window: MovementWindow,
    last_position: GazeSample,
    last_significant_movement: Option<Instant>,
    cooldown: Duration,
    current: GazeState,
}

impl GazeClassifier {
    pub fn new(config: &GazeConfig) -> Self {
        Self {
            window: MovementWindow::new(config.movement_window_size),
            last_position: GazeSample::ORIGIN,
            last_significant_movement: None,
            cooldown: config.stability_cooldown(),
            current: GazeState::default(),
        }
    }

    /// Classify one raw gaze sample
    ///
    /// # Arguments
    /// * `raw_x`, `raw_y` - Normalized gaze position, nominally [-0.5, 0.5]
    /// * `tracking_active` - Whether the eye tracker currently has a lock
    /// * `foveation` - Supplies the dynamic-adjustment flag and sensitivity
    /// * `now` - Sample time, used for the stability cooldown
    pub fn ingest(
        &mut self,
        raw_x: f32,
        raw_y: f32,
        tracking_active: bool,
        foveation: &FoveationConfig,
        now: Instant,
    ) -> GazeState {
        let position = GazeSample::new(raw_x, raw_y).clamped();
        let mut is_stable = true;
        let mut mean_movement = 0.0;

        if tracking_active
            && foveation.dynamic_adjustment_enabled
            && foveation.gaze_movement_sensitivity > 0.0
        {
            let threshold = movement_threshold(foveation.gaze_movement_sensitivity);
            let movement = position.distance_to(self.last_position);
            mean_movement = self.window.observe(movement);

            if mean_movement > threshold {
                is_stable = false;
                self.last_significant_movement = Some(now);
            } else {
                is_stable = self.cooldown_elapsed(now);
            }
            self.last_position = position;
        } else {
            self.window.clear();
            self.last_position = GazeSample::ORIGIN;
        }

        let state = GazeState {
            shift_x: position.x * SHIFT_SCALE,
            shift_y: position.y * SHIFT_SCALE,
            is_tracking_active: tracking_active,
            is_stable,
            mean_movement,
        };

        if state.is_stable != self.current.is_stable {
            tracing::debug!(
                stable = state.is_stable,
                mean_movement = state.mean_movement,
                "[GazeClassifier] stability changed"
            );
        }
        self.current = state;
        state
    }

    /// Classify a sample taken from the gaze feed
    pub fn ingest_timed(&mut self, sample: TimedGazeSample, foveation: &FoveationConfig) -> GazeState {
        self.ingest(
            sample.sample.x,
            sample.sample.y,
            sample.tracking_active,
            foveation,
            sample.captured_at,
        )
    }

    /// Most recent classification
    pub fn current(&self) -> GazeState {
        self.current
    }

    pub fn last_position(&self) -> GazeSample {
        self.last_position
    }

    pub fn last_significant_movement(&self) -> Option<Instant> {
        self.last_significant_movement
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.last_significant_movement {
            Some(at) => now.saturating_duration_since(at) >= self.cooldown,
            None => true,
        }
    }
}

impl Default for GazeClassifier {
    fn default() -> Self {
        Self::new(&GazeConfig::default())
    }
}
