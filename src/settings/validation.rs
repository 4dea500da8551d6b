// Settings validation
//
// The controller and classifier have no failure modes, so anything that
// would make their arithmetic ill-defined has to be rejected before a
// snapshot is accepted. Validation runs whenever a snapshot is loaded or
// applied to a session.

use crate::error::SettingsError;
use crate::settings::OptimizationSettings;

/// Validator for optimization settings snapshots
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate a full settings snapshot
    ///
    /// # Validation Rules
    /// * Bitrate ceiling > 0, base/boost bitrates >= 0
    /// * Complexity max threshold strictly above min threshold
    /// * At least one foveation layer; quality in (0, 1], radius finite and >= 0
    /// * Gaze sensitivity and dark luminance threshold in [0, 1]
    /// * Dark-scene boost factor > 0
    /// * FEC percentage <= 100
    /// * Eye size and refresh rate > 0
    pub fn validate(settings: &OptimizationSettings) -> Result<(), SettingsError> {
        let video = &settings.video;
        if video.target_max_bitrate_mbps <= 0 {
            return Err(invalid(
                "video.target_max_bitrate_mbps",
                format!("must be > 0 (got {})", video.target_max_bitrate_mbps),
            ));
        }

        let dynamic = &video.dynamic_bitrate;
        if dynamic.base_bitrate_mbps < 0 || dynamic.max_boost_bitrate_mbps < 0 {
            return Err(invalid(
                "video.dynamic_bitrate",
                format!(
                    "bitrates must be >= 0 (base {}, boost {})",
                    dynamic.base_bitrate_mbps, dynamic.max_boost_bitrate_mbps
                ),
            ));
        }
        let (min, max) = (
            dynamic.scene_complexity_min_threshold,
            dynamic.scene_complexity_max_threshold,
        );
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(SettingsError::InvertedComplexityThresholds { min, max });
        }

        if video.target_eye_width == 0 || video.target_eye_height == 0 {
            return Err(invalid(
                "video.target_eye_size",
                format!(
                    "must be non-zero (got {}x{})",
                    video.target_eye_width, video.target_eye_height
                ),
            ));
        }
        if !(video.target_refresh_rate > 0.0 && video.target_refresh_rate.is_finite()) {
            return Err(invalid(
                "video.target_refresh_rate",
                format!("must be > 0 (got {})", video.target_refresh_rate),
            ));
        }

        if settings.network.fec_percentage > 100 {
            return Err(invalid(
                "network.fec_percentage",
                format!("must be <= 100 (got {})", settings.network.fec_percentage),
            ));
        }

        let foveation = &settings.foveation;
        if foveation.layers.is_empty() {
            return Err(SettingsError::EmptyFoveationLayers);
        }
        for (index, layer) in foveation.layers.iter().enumerate() {
            if !(layer.quality_factor > 0.0 && layer.quality_factor <= 1.0) {
                return Err(SettingsError::InvalidLayer {
                    index,
                    reason: format!("quality_factor {} out of range (0, 1]", layer.quality_factor),
                });
            }
            if !(layer.radius_degrees >= 0.0 && layer.radius_degrees.is_finite()) {
                return Err(SettingsError::InvalidLayer {
                    index,
                    reason: format!("radius_degrees {} must be finite and >= 0", layer.radius_degrees),
                });
            }
        }
        if !(0.0..=1.0).contains(&foveation.gaze_movement_sensitivity) {
            return Err(invalid(
                "foveation.gaze_movement_sensitivity",
                format!(
                    "{} out of range [0, 1]",
                    foveation.gaze_movement_sensitivity
                ),
            ));
        }

        let scene = &settings.scene_profile;
        if !(0.0..=1.0).contains(&scene.dark_scene_luminance_threshold) {
            return Err(invalid(
                "scene_profile.dark_scene_luminance_threshold",
                format!("{} out of range [0, 1]", scene.dark_scene_luminance_threshold),
            ));
        }
        if !(scene.dark_scene_bitrate_boost_factor > 0.0
            && scene.dark_scene_bitrate_boost_factor.is_finite())
        {
            return Err(invalid(
                "scene_profile.dark_scene_bitrate_boost_factor",
                format!("must be > 0 (got {})", scene.dark_scene_bitrate_boost_factor),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> SettingsError {
    SettingsError::InvalidValue {
        field: field.to_string(),
        reason,
    }
}
