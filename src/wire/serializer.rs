// WireSerializer - maps a settings snapshot plus controller outputs onto the
// server configuration document
//
// Pure and stateless apart from the field-of-view constants, so it is safe to
// call from any thread. Either a complete document is produced or a
// SerializationError naming the offending field; never a partial document.

use crate::config::FieldOfViewConfig;
use crate::error::SerializationError;
use crate::settings::{
    AdaptiveQuantizationMode, FoveationConfig, NvencMultiPassMode, NvencPreset, NvencTuning,
    OptimizationSettings, RateControlMode, VideoCodec, VideoConfig,
};
use crate::wire::{
    BitrateConfig, BitrateMode, EncoderConfig, FoveatedEncodingContent, FoveationGeometry,
    FrameSize, NvencConfig, Switch, WireAdaptiveQuantization, WireCodec, WireConfigDocument,
    WireMultiPass, WireQualityPreset, WireRateControlMode, WireTuningPreset, WireVideoConfig,
};

/// Settings-to-wire serializer
#[derive(Debug, Clone, Default)]
pub struct WireSerializer {
    field_of_view: FieldOfViewConfig,
}

impl WireSerializer {
    pub fn new(field_of_view: FieldOfViewConfig) -> Self {
        Self { field_of_view }
    }

    /// Build the server document
    ///
    /// # Arguments
    /// * `settings` - Settings snapshot
    /// * `effective_bitrate_mbps` - Controller output; rounded to whole Mbps
    /// * `multiplier` - Foveation strength multiplier in [0.5, 1.0]
    pub fn serialize(
        &self,
        settings: &OptimizationSettings,
        effective_bitrate_mbps: f32,
        multiplier: f32,
    ) -> Result<WireConfigDocument, SerializationError> {
        let video = &settings.video;
        check_video_domain(video)?;
        check_field_of_view(&self.field_of_view)?;

        let document = WireConfigDocument {
            video: WireVideoConfig {
                preferred_codec: map_codec(video.codec)?,
                foveated_encoding: self.foveated_encoding(&settings.foveation, multiplier)?,
                encoder_config: encoder_config(video),
                bitrate: BitrateConfig {
                    mode: BitrateMode::ConstantMbps(constant_mbps(effective_bitrate_mbps)?),
                },
                transcoding_view_resolution: FrameSize::Absolute {
                    width: video.target_eye_width,
                    height: Some(video.target_eye_height),
                },
                preferred_fps: video.target_refresh_rate,
                use_10bit_decoder: Some(video.use_10bit_encoding),
                enable_hdr_decoder: Some(video.enable_hdr),
                encoding_gamma_decoder: Some(video.encoding_gamma),
            },
        };

        tracing::debug!(
            bitrate_mbps = effective_bitrate_mbps,
            multiplier,
            "[WireSerializer] document built"
        );
        Ok(document)
    }

    fn foveated_encoding(
        &self,
        foveation: &FoveationConfig,
        multiplier: f32,
    ) -> Result<Switch<FoveatedEncodingContent>, SerializationError> {
        if !(multiplier.is_finite() && (0.5..=1.0).contains(&multiplier)) {
            return Err(SerializationError::out_of_domain(
                "foveation_strength_multiplier",
                multiplier,
                "within [0.5, 1.0]",
            ));
        }
        for (index, layer) in foveation.layers.iter().enumerate() {
            if !(layer.quality_factor > 0.0 && layer.quality_factor <= 1.0) {
                return Err(SerializationError::out_of_domain(
                    format!("foveation.layers[{}].quality_factor", index),
                    layer.quality_factor,
                    "within (0, 1]",
                ));
            }
            if !(layer.radius_degrees.is_finite() && layer.radius_degrees >= 0.0) {
                return Err(SerializationError::out_of_domain(
                    format!("foveation.layers[{}].radius_degrees", index),
                    layer.radius_degrees,
                    "finite and >= 0",
                ));
            }
        }

        let geometry = FoveationGeometry::resolve(&foveation.layers).scaled(multiplier);
        let (center_size_x, center_size_y) = geometry.center_size(&self.field_of_view);
        let edge_ratio = geometry.edge_ratio();

        Ok(Switch {
            enabled: foveation.enabled,
            content: FoveatedEncodingContent {
                force_enable: foveation.enabled,
                center_size_x,
                center_size_y,
                center_shift_x: 0.0,
                center_shift_y: 0.0,
                edge_ratio_x: edge_ratio,
                edge_ratio_y: edge_ratio,
            },
        })
    }
}

/// Serialize with the default field of view
pub fn serialize(
    settings: &OptimizationSettings,
    effective_bitrate_mbps: f32,
    multiplier: f32,
) -> Result<WireConfigDocument, SerializationError> {
    WireSerializer::default().serialize(settings, effective_bitrate_mbps, multiplier)
}

/// Render a document as pretty-printed JSON
pub fn to_pretty_json(document: &WireConfigDocument) -> Result<String, SerializationError> {
    Ok(serde_json::to_string_pretty(document)?)
}

fn check_video_domain(video: &VideoConfig) -> Result<(), SerializationError> {
    if video.target_max_bitrate_mbps <= 0 {
        return Err(SerializationError::out_of_domain(
            "video.target_max_bitrate_mbps",
            video.target_max_bitrate_mbps,
            "> 0",
        ));
    }
    if video.target_eye_width == 0 {
        return Err(SerializationError::out_of_domain(
            "video.target_eye_width",
            video.target_eye_width,
            "> 0",
        ));
    }
    if video.target_eye_height == 0 {
        return Err(SerializationError::out_of_domain(
            "video.target_eye_height",
            video.target_eye_height,
            "> 0",
        ));
    }
    if !(video.target_refresh_rate.is_finite() && video.target_refresh_rate > 0.0) {
        return Err(SerializationError::out_of_domain(
            "video.target_refresh_rate",
            video.target_refresh_rate,
            "finite and > 0",
        ));
    }
    if !(video.encoding_gamma.is_finite() && video.encoding_gamma > 0.0) {
        return Err(SerializationError::out_of_domain(
            "video.encoding_gamma",
            video.encoding_gamma,
            "finite and > 0",
        ));
    }
    Ok(())
}

fn check_field_of_view(field_of_view: &FieldOfViewConfig) -> Result<(), SerializationError> {
    for (field, degrees) in [
        ("field_of_view.horizontal_degrees", field_of_view.horizontal_degrees),
        ("field_of_view.vertical_degrees", field_of_view.vertical_degrees),
    ] {
        if !(degrees.is_finite() && degrees > 0.0) {
            return Err(SerializationError::out_of_domain(field, degrees, "finite and > 0"));
        }
    }
    Ok(())
}

fn constant_mbps(effective_bitrate_mbps: f32) -> Result<u64, SerializationError> {
    let rounded = effective_bitrate_mbps.round();
    if !(rounded.is_finite() && rounded >= 1.0) {
        return Err(SerializationError::out_of_domain(
            "effective_bitrate_mbps",
            effective_bitrate_mbps,
            ">= 1 Mbps after rounding",
        ));
    }
    Ok(rounded as u64)
}

fn encoder_config(video: &VideoConfig) -> EncoderConfig {
    EncoderConfig {
        rate_control_mode: map_rate_control(video.rate_control_mode),
        use_10bit: video.use_10bit_encoding,
        encoding_gamma: video.encoding_gamma,
        enable_hdr: video.enable_hdr,
        nvenc: NvencConfig {
            quality_preset: map_preset(video.nvenc_preset),
            tuning_preset: map_tuning(video.nvenc_tuning_preset),
            multi_pass: map_multi_pass(video.nvenc_multi_pass),
            adaptive_quantization_mode: map_adaptive_quantization(video.adaptive_quantization_mode),
        },
    }
}

/// Codec has no safe fallback: guessing one could stream a format the
/// headset cannot decode.
pub fn map_codec(codec: VideoCodec) -> Result<WireCodec, SerializationError> {
    match codec {
        VideoCodec::H264 => Ok(WireCodec::H264),
        VideoCodec::H265 => Ok(WireCodec::Hevc),
        VideoCodec::Av1 => Ok(WireCodec::Av1),
        VideoCodec::Unrecognized => Err(SerializationError::UnmappableEnum {
            field: "video.codec".to_string(),
            value: "unrecognized".to_string(),
        }),
    }
}

pub fn map_rate_control(mode: RateControlMode) -> WireRateControlMode {
    match mode {
        RateControlMode::Cbr => WireRateControlMode::Cbr,
        RateControlMode::Vbr => WireRateControlMode::Vbr,
        RateControlMode::Unrecognized => {
            log_fallback("video.rate_control_mode", "Cbr");
            WireRateControlMode::Cbr
        }
    }
}

pub fn map_preset(preset: NvencPreset) -> WireQualityPreset {
    match preset {
        NvencPreset::P1 => WireQualityPreset::P1,
        NvencPreset::P2 => WireQualityPreset::P2,
        NvencPreset::P3 => WireQualityPreset::P3,
        NvencPreset::P4 => WireQualityPreset::P4,
        NvencPreset::P5 => WireQualityPreset::P5,
        NvencPreset::P6 => WireQualityPreset::P6,
        NvencPreset::P7 => WireQualityPreset::P7,
        NvencPreset::Unrecognized => {
            log_fallback("video.nvenc_preset", "P5");
            WireQualityPreset::P5
        }
    }
}

pub fn map_tuning(tuning: NvencTuning) -> WireTuningPreset {
    match tuning {
        NvencTuning::HighQuality => WireTuningPreset::HighQuality,
        NvencTuning::LowLatency => WireTuningPreset::LowLatency,
        NvencTuning::UltraLowLatency => WireTuningPreset::UltraLowLatency,
        NvencTuning::Unrecognized => {
            log_fallback("video.nvenc_tuning_preset", "UltraLowLatency");
            WireTuningPreset::UltraLowLatency
        }
    }
}

pub fn map_multi_pass(mode: NvencMultiPassMode) -> WireMultiPass {
    match mode {
        NvencMultiPassMode::Disabled => WireMultiPass::Disabled,
        NvencMultiPassMode::QuarterResolution => WireMultiPass::QuarterResolution,
        NvencMultiPassMode::FullResolution => WireMultiPass::FullResolution,
        NvencMultiPassMode::Unrecognized => {
            log_fallback("video.nvenc_multi_pass", "Disabled");
            WireMultiPass::Disabled
        }
    }
}

pub fn map_adaptive_quantization(mode: AdaptiveQuantizationMode) -> WireAdaptiveQuantization {
    match mode {
        AdaptiveQuantizationMode::Disabled => WireAdaptiveQuantization::Disabled,
        AdaptiveQuantizationMode::Spatial => WireAdaptiveQuantization::Spatial,
        AdaptiveQuantizationMode::Temporal => WireAdaptiveQuantization::Temporal,
        AdaptiveQuantizationMode::Unrecognized => {
            log_fallback("video.adaptive_quantization_mode", "Disabled");
            WireAdaptiveQuantization::Disabled
        }
    }
}

fn log_fallback(field: &str, fallback: &str) {
    log::warn!(
        "[WireSerializer] Unrecognized value for {}, falling back to {}",
        field,
        fallback
    );
}
