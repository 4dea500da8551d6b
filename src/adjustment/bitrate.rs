// Target bitrate computation
//
// Dark scenes take precedence over complexity scaling: when the dark-scene
// rule fires, the boosted ceiling is kept and the complexity interpolation is
// discarded. The result is always clamped into [0, ceiling].

use crate::adjustment::TelemetrySample;
use crate::settings::{DynamicBitrateConfig, OptimizationSettings, SceneProfileConfig};

/// Whether the scene profile's dark-scene rule applies at this luminance
pub fn is_dark_scene(scene: &SceneProfileConfig, luminance: f32) -> bool {
    scene.enabled && scene.adapt_to_dark_scenes && luminance < scene.dark_scene_luminance_threshold
}

/// Position of `complexity` within the configured range, clamped to [0, 1]
///
/// A degenerate range (which validation rejects) degrades to a step at the
/// max threshold instead of dividing by zero.
pub fn complexity_factor(dynamic: &DynamicBitrateConfig, complexity: f32) -> f32 {
    let min = dynamic.scene_complexity_min_threshold;
    let max = dynamic.scene_complexity_max_threshold;
    let span = max - min;
    if span.is_nan() || span <= f32::EPSILON {
        return if complexity >= max { 1.0 } else { 0.0 };
    }
    ((complexity - min) / span).clamp(0.0, 1.0)
}

/// Bitrate interpolated between base and max boost by complexity
pub fn interpolated_bitrate(dynamic: &DynamicBitrateConfig, complexity: f32) -> f32 {
    let base = dynamic.base_bitrate_mbps as f32;
    let boost = dynamic.max_boost_bitrate_mbps as f32 - base;
    base + boost * complexity_factor(dynamic, complexity)
}

/// Effective target bitrate for the given telemetry
pub fn target_bitrate(settings: &OptimizationSettings, telemetry: &TelemetrySample) -> f32 {
    let ceiling = settings.video.target_max_bitrate_mbps as f32;
    let dark = is_dark_scene(&settings.scene_profile, telemetry.scene_luminance);

    let mut candidate = ceiling;
    if dark {
        candidate *= settings.scene_profile.dark_scene_bitrate_boost_factor;
    }

    let dynamic = &settings.video.dynamic_bitrate;
    if dynamic.enabled && !dark {
        candidate = interpolated_bitrate(dynamic, telemetry.scene_complexity);
    }

    candidate.min(ceiling).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry(luminance: f32, complexity: f32) -> TelemetrySample {
        TelemetrySample {
            frames_per_second: 90.0,
            scene_luminance: luminance,
            scene_complexity: complexity,
            round_trip_latency_ms: 30.0,
        }
    }

    #[test]
    fn test_complexity_interpolation() {
        let settings = OptimizationSettings::default();
        // base 45, boost 68, range 0.3..0.8
        assert_eq!(target_bitrate(&settings, &telemetry(0.5, 0.1)), 45.0);
        assert_eq!(target_bitrate(&settings, &telemetry(0.5, 0.9)), 68.0);
        let mid = target_bitrate(&settings, &telemetry(0.5, 0.55));
        assert!((mid - 56.5).abs() < 1e-4);
    }

    #[test]
    fn test_dark_scene_wins_over_complexity() {
        let settings = OptimizationSettings::default();
        // 70 * 1.3 = 91, clamped back to the 70 ceiling
        let bitrate = target_bitrate(&settings, &telemetry(0.05, 0.0));
        assert_eq!(bitrate, 70.0);
    }

    #[test]
    fn test_dark_scene_boost_below_ceiling_is_clamped() {
        let mut settings = OptimizationSettings::default();
        settings.scene_profile.dark_scene_bitrate_boost_factor = 0.5;
        let bitrate = target_bitrate(&settings, &telemetry(0.05, 1.0));
        assert_eq!(bitrate, 35.0);
    }

    #[test]
    fn test_dynamic_disabled_uses_ceiling() {
        let mut settings = OptimizationSettings::default();
        settings.video.dynamic_bitrate.enabled = false;
        assert_eq!(target_bitrate(&settings, &telemetry(0.5, 0.0)), 70.0);
    }

    #[test]
    fn test_boost_above_ceiling_is_clamped() {
        let mut settings = OptimizationSettings::default();
        settings.video.dynamic_bitrate.max_boost_bitrate_mbps = 150;
        assert_eq!(target_bitrate(&settings, &telemetry(0.5, 1.0)), 70.0);
    }

    #[test]
    fn test_degenerate_complexity_range() {
        let mut dynamic = DynamicBitrateConfig::default();
        dynamic.scene_complexity_min_threshold = 0.5;
        dynamic.scene_complexity_max_threshold = 0.5;
        assert_eq!(complexity_factor(&dynamic, 0.4), 0.0);
        assert_eq!(complexity_factor(&dynamic, 0.5), 1.0);
    }

    #[test]
    fn test_dark_scene_requires_profile_flags() {
        let mut scene = SceneProfileConfig::default();
        assert!(is_dark_scene(&scene, 0.05));
        assert!(!is_dark_scene(&scene, 0.12));

        scene.adapt_to_dark_scenes = false;
        assert!(!is_dark_scene(&scene, 0.05));

        scene.adapt_to_dark_scenes = true;
        scene.enabled = false;
        assert!(!is_dark_scene(&scene, 0.05));
    }
}
