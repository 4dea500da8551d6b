//! Optimization settings snapshot
//!
//! `OptimizationSettings` is the user-level quality intent the engine works
//! from. A snapshot is immutable once handed to the controller or serializer;
//! hosts swap whole snapshots when the user edits something.
//!
//! Internal enums use their own vocabulary and are translated to server tags
//! by `wire::serializer`. Each one carries an `Unrecognized` variant so that a
//! settings file written by a newer client still loads; the serializer decides
//! what an unrecognized value means on the wire.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

pub mod validation;

pub use validation::SettingsValidator;

/// Complete optimization settings snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    pub video: VideoConfig,
    pub network: NetworkConfig,
    pub foveation: FoveationConfig,
    pub scene_profile: SceneProfileConfig,
    pub latency_reduction: LatencyReductionConfig,
}

impl OptimizationSettings {
    /// Parse and validate a settings snapshot from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: OptimizationSettings = serde_json::from_str(json)?;
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

/// Load settings from a JSON file and validate them
///
/// Unlike `TunerConfig::load_from_file` this does not fall back to defaults:
/// silently streaming with different quality settings than the user chose is
/// worse than refusing to start.
pub fn load_settings<P: AsRef<Path>>(path: P) -> anyhow::Result<OptimizationSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let settings = OptimizationSettings::from_json_str(&contents)
        .with_context(|| format!("loading settings from {}", path.display()))?;
    log::info!("[Settings] Loaded optimization settings from {:?}", path);
    Ok(settings)
}

// ============================================================================
// VIDEO
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    H264,
    H265,
    Av1,
    #[serde(other)]
    Unrecognized,
}

/// NVENC quality preset, P1 (fastest) to P7 (slowest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NvencPreset {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NvencTuning {
    HighQuality,
    LowLatency,
    UltraLowLatency,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NvencMultiPassMode {
    Disabled,
    QuarterResolution,
    FullResolution,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateControlMode {
    Cbr,
    Vbr,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveQuantizationMode {
    Disabled,
    Spatial,
    Temporal,
    #[serde(other)]
    Unrecognized,
}

/// Complexity-driven bitrate scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicBitrateConfig {
    pub enabled: bool,
    /// Bitrate at or below the min complexity threshold
    pub base_bitrate_mbps: i32,
    /// Bitrate at or above the max complexity threshold
    pub max_boost_bitrate_mbps: i32,
    pub scene_complexity_min_threshold: f32,
    pub scene_complexity_max_threshold: f32,
    /// Reserved for smoothing between ticks; the controller currently jumps
    /// straight to the interpolated value
    pub bitrate_adjustment_speed_factor: f32,
}

impl Default for DynamicBitrateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_bitrate_mbps: 45,
            max_boost_bitrate_mbps: 68,
            scene_complexity_min_threshold: 0.3,
            scene_complexity_max_threshold: 0.8,
            bitrate_adjustment_speed_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub codec: VideoCodec,
    pub use_10bit_encoding: bool,
    /// Hard ceiling for every dynamically computed bitrate
    pub target_max_bitrate_mbps: i32,
    pub nvenc_preset: NvencPreset,
    pub nvenc_tuning_preset: NvencTuning,
    pub nvenc_multi_pass: NvencMultiPassMode,
    pub rate_control_mode: RateControlMode,
    pub adaptive_quantization_mode: AdaptiveQuantizationMode,
    pub dynamic_bitrate: DynamicBitrateConfig,
    pub sharpening_strength: f32,
    pub encoding_gamma: f32,
    pub enable_hdr: bool,
    pub target_eye_width: u32,
    pub target_eye_height: u32,
    pub target_refresh_rate: f32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            codec: VideoCodec::H265,
            use_10bit_encoding: true,
            target_max_bitrate_mbps: 70,
            nvenc_preset: NvencPreset::P5,
            nvenc_tuning_preset: NvencTuning::UltraLowLatency,
            nvenc_multi_pass: NvencMultiPassMode::QuarterResolution,
            rate_control_mode: RateControlMode::Vbr,
            adaptive_quantization_mode: AdaptiveQuantizationMode::Spatial,
            dynamic_bitrate: DynamicBitrateConfig::default(),
            sharpening_strength: 0.20,
            encoding_gamma: 2.2,
            enable_hdr: true,
            target_eye_width: 2880,
            target_eye_height: 2880,
            target_refresh_rate: 90.0,
        }
    }
}

// ============================================================================
// NETWORK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketLossRecoveryMode {
    AggressiveRetransmission,
    BalancedFecRetransmission,
    RobustFec,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Latency budget added on top of the local link for the cloud hop
    pub extra_latency_ms: u32,
    pub prioritize_video_data: bool,
    pub packet_loss_recovery_mode: PacketLossRecoveryMode,
    pub fec_percentage: u32,
    pub adaptive_qos_enabled: bool,
    pub qos_check_interval_seconds: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            extra_latency_ms: 25,
            prioritize_video_data: true,
            packet_loss_recovery_mode: PacketLossRecoveryMode::BalancedFecRetransmission,
            fec_percentage: 8,
            adaptive_qos_enabled: false,
            qos_check_interval_seconds: 5,
        }
    }
}

// ============================================================================
// FOVEATION
// ============================================================================

/// One concentric quality region around the gaze point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoveationLayer {
    /// Relative render quality in (0, 1]
    pub quality_factor: f32,
    /// Angular radius; 0 on the outermost layer means "rest of the field"
    pub radius_degrees: f32,
    /// Blend width into the next layer
    #[serde(default)]
    pub transition_degrees: f32,
}

impl FoveationLayer {
    pub const fn new(quality_factor: f32, radius_degrees: f32, transition_degrees: f32) -> Self {
        Self {
            quality_factor,
            radius_degrees,
            transition_degrees,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSmoothing {
    None,
    Low,
    Medium,
    High,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoveationConfig {
    pub enabled: bool,
    /// Innermost (highest quality) to outermost
    pub layers: Vec<FoveationLayer>,
    pub dynamic_adjustment_enabled: bool,
    /// Gaze movement sensitivity in [0, 1]; 0 disables stability tracking
    pub gaze_movement_sensitivity: f32,
    /// Below this frame rate foveation becomes more aggressive
    pub performance_target_fps: u32,
    pub edge_smoothing: EdgeSmoothing,
}

impl Default for FoveationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            layers: vec![
                FoveationLayer::new(1.0, 22.0, 7.0),
                FoveationLayer::new(0.55, 42.0, 10.0),
                FoveationLayer::new(0.20, 0.0, 0.0),
            ],
            dynamic_adjustment_enabled: true,
            gaze_movement_sensitivity: 0.75,
            performance_target_fps: 87,
            edge_smoothing: EdgeSmoothing::Medium,
        }
    }
}

// ============================================================================
// SCENE PROFILE
// ============================================================================

/// Content-specific bitrate rules (dark scenes, fast motion)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneProfileConfig {
    pub enabled: bool,
    pub adapt_to_dark_scenes: bool,
    /// Normalized luminance below which a scene counts as dark
    pub dark_scene_luminance_threshold: f32,
    pub dark_scene_bitrate_boost_factor: f32,
    pub dark_scene_contrast_enhancement: f32,
    pub motion_adaptive_quality_enabled: bool,
    pub high_motion_speed_threshold: f32,
    pub quality_reduction_factor_high_motion: f32,
    pub quality_increase_factor_low_motion: f32,
    pub optimize_hdr_tonemapping: bool,
    pub hdr_peak_luminance_nits: f32,
    pub hdr_paper_white_nits: f32,
}

impl Default for SceneProfileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            adapt_to_dark_scenes: true,
            dark_scene_luminance_threshold: 0.12,
            dark_scene_bitrate_boost_factor: 1.30,
            dark_scene_contrast_enhancement: 0.05,
            motion_adaptive_quality_enabled: true,
            high_motion_speed_threshold: 2.5,
            quality_reduction_factor_high_motion: 0.80,
            quality_increase_factor_low_motion: 1.0,
            optimize_hdr_tonemapping: true,
            hdr_peak_luminance_nits: 1200.0,
            hdr_paper_white_nits: 220.0,
        }
    }
}

// ============================================================================
// LATENCY REDUCTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimewarpMode {
    Native,
    EnhancedPrediction,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyReductionConfig {
    pub enable_predictive_frame_interpolation: bool,
    pub interpolation_max_predicted_frames: u32,
    pub timewarp_mode: TimewarpMode,
    pub input_prediction_strength: f32,
}

impl Default for LatencyReductionConfig {
    fn default() -> Self {
        Self {
            enable_predictive_frame_interpolation: true,
            interpolation_max_predicted_frames: 1,
            timewarp_mode: TimewarpMode::EnhancedPrediction,
            input_prediction_strength: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = OptimizationSettings::default();
        assert_eq!(settings.video.codec, VideoCodec::H265);
        assert_eq!(settings.video.target_max_bitrate_mbps, 70);
        assert_eq!(settings.video.dynamic_bitrate.base_bitrate_mbps, 45);
        assert_eq!(settings.foveation.layers.len(), 3);
        assert_eq!(settings.foveation.performance_target_fps, 87);
        assert!((settings.scene_profile.dark_scene_bitrate_boost_factor - 1.30).abs() < 1e-6);
        assert!(SettingsValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = OptimizationSettings::default();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let parsed = OptimizationSettings::from_json_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "video": { "target_max_bitrate_mbps": 50 } }"#;
        let settings = OptimizationSettings::from_json_str(json).unwrap();

        assert_eq!(settings.video.target_max_bitrate_mbps, 50);
        assert_eq!(settings.video.codec, VideoCodec::H265);
        assert_eq!(settings.foveation, FoveationConfig::default());
    }

    #[test]
    fn test_unknown_enum_strings_load_as_unrecognized() {
        let json = r#"{
            "video": { "codec": "vp9", "nvenc_preset": "p9", "rate_control_mode": "const_qp" },
            "foveation": { "edge_smoothing": "ultra" }
        }"#;
        let settings = OptimizationSettings::from_json_str(json).unwrap();

        assert_eq!(settings.video.codec, VideoCodec::Unrecognized);
        assert_eq!(settings.video.nvenc_preset, NvencPreset::Unrecognized);
        assert_eq!(settings.video.rate_control_mode, RateControlMode::Unrecognized);
        assert_eq!(settings.foveation.edge_smoothing, EdgeSmoothing::Unrecognized);
    }

    #[test]
    fn test_from_json_str_rejects_invalid_settings() {
        let json = r#"{ "foveation": { "layers": [] } }"#;
        let result = OptimizationSettings::from_json_str(json);
        assert_eq!(result.unwrap_err(), SettingsError::EmptyFoveationLayers);
    }

    #[test]
    fn test_from_json_str_reports_parse_errors() {
        let result = OptimizationSettings::from_json_str("{ video: ");
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
