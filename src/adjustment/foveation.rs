// Foveation strength stepping
//
// Below the performance target the multiplier steps down quickly so that
// peripheral quality drops; otherwise it recovers slowly towards 1.0.

use crate::settings::FoveationConfig;

pub const MIN_MULTIPLIER: f32 = 0.5;
pub const MAX_MULTIPLIER: f32 = 1.0;
pub const STEP_DOWN: f32 = 0.05;
pub const STEP_UP: f32 = 0.02;

/// Next foveation-strength multiplier given the measured frame rate
///
/// A frame rate of 0 means "not measured yet" and counts as on target.
pub fn next_multiplier(current: f32, foveation: &FoveationConfig, frames_per_second: f32) -> f32 {
    if !(foveation.enabled && foveation.dynamic_adjustment_enabled) {
        return MAX_MULTIPLIER;
    }

    let current = if current.is_finite() {
        current.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    } else {
        MAX_MULTIPLIER
    };
    let target = foveation.performance_target_fps as f32;
    if frames_per_second > 0.0 && frames_per_second < target {
        (current - STEP_DOWN).max(MIN_MULTIPLIER)
    } else {
        (current + STEP_UP).min(MAX_MULTIPLIER)
    }
}
