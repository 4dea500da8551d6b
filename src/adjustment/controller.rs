// AdjustmentController - throttled recomputation of bitrate and foveation
//
// Driven by an external ~1 Hz scheduler. Calls arriving before the interval
// has elapsed return the previous state untouched, so repeated calls with the
// same `now` are idempotent.

use std::time::{Duration, Instant};

use crate::adjustment::{bitrate, foveation, ControllerState, TelemetrySample};
use crate::config::AdjustmentConfig;
use crate::settings::OptimizationSettings;

/// Owner of `ControllerState`; the only code path that mutates it
#[derive(Debug, Clone)]
pub struct AdjustmentController {
    state: ControllerState,
    interval: Duration,
}

impl AdjustmentController {
    pub fn new(config: &AdjustmentConfig) -> Self {
        Self {
            state: ControllerState::default(),
            interval: config.interval(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Recompute effective bitrate and foveation strength
    ///
    /// No-op returning the previous state if less than one interval has
    /// passed since the last recomputation. The first call always computes.
    pub fn recompute(
        &mut self,
        telemetry: &TelemetrySample,
        settings: &OptimizationSettings,
        now: Instant,
    ) -> ControllerState {
        if let Some(last) = self.state.last_adjustment {
            if now.saturating_duration_since(last) < self.interval {
                return self.state;
            }
        }

        let telemetry = telemetry.sanitized();
        let effective_bitrate_mbps = bitrate::target_bitrate(settings, &telemetry);
        let foveation_strength_multiplier = foveation::next_multiplier(
            self.state.foveation_strength_multiplier,
            &settings.foveation,
            telemetry.frames_per_second,
        );

        if effective_bitrate_mbps != self.state.effective_bitrate_mbps {
            log::info!(
                "[AdjustmentController] Effective bitrate {:.1} -> {:.1} Mbps",
                self.state.effective_bitrate_mbps,
                effective_bitrate_mbps
            );
        }
        tracing::debug!(
            fps = telemetry.frames_per_second,
            luminance = telemetry.scene_luminance,
            complexity = telemetry.scene_complexity,
            bitrate_mbps = effective_bitrate_mbps,
            multiplier = foveation_strength_multiplier,
            "[AdjustmentController] recomputed"
        );

        self.state = ControllerState {
            effective_bitrate_mbps,
            foveation_strength_multiplier,
            last_adjustment: Some(now),
        };
        self.state
    }
}

impl Default for AdjustmentController {
    fn default() -> Self {
        Self::new(&AdjustmentConfig::default())
    }
}
