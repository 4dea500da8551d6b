//! Server configuration document
//!
//! Mirrors the video section of the remote server's session settings. Field
//! names are lower_snake_case and tagged unions use serde's externally tagged
//! representation (`{"ConstantMbps": 55}`, `{"Absolute": {...}}`), which is
//! what the server's own settings deserializer expects.
//!
//! Documents are write-only: nothing in this crate parses them back.

use serde::Serialize;

pub mod geometry;
pub mod serializer;

pub use geometry::FoveationGeometry;
pub use serializer::{serialize, to_pretty_json, WireSerializer};

/// Root of the generated document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireConfigDocument {
    pub video: WireVideoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireVideoConfig {
    pub preferred_codec: WireCodec,
    pub foveated_encoding: Switch<FoveatedEncodingContent>,
    pub encoder_config: EncoderConfig,
    pub bitrate: BitrateConfig,
    pub transcoding_view_resolution: FrameSize,
    pub preferred_fps: f32,
    pub use_10bit_decoder: Option<bool>,
    pub enable_hdr_decoder: Option<bool>,
    pub encoding_gamma_decoder: Option<f32>,
}

/// Toggleable section, `{"enabled": .., "content": ..}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Switch<T> {
    pub enabled: bool,
    pub content: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoveatedEncodingContent {
    pub force_enable: bool,
    pub center_size_x: f32,
    pub center_size_y: f32,
    pub center_shift_x: f32,
    pub center_shift_y: f32,
    pub edge_ratio_x: f32,
    pub edge_ratio_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncoderConfig {
    pub rate_control_mode: WireRateControlMode,
    pub use_10bit: bool,
    pub encoding_gamma: f32,
    pub enable_hdr: bool,
    pub nvenc: NvencConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NvencConfig {
    pub quality_preset: WireQualityPreset,
    pub tuning_preset: WireTuningPreset,
    pub multi_pass: WireMultiPass,
    pub adaptive_quantization_mode: WireAdaptiveQuantization,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BitrateConfig {
    pub mode: BitrateMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BitrateMode {
    ConstantMbps(u64),
    Adaptive(AdaptiveBitrate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdaptiveBitrate {
    pub saturation_multiplier: f32,
    pub max_throughput_mbps: Switch<u64>,
    pub min_throughput_mbps: Switch<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameSize {
    Scale(f32),
    Absolute {
        width: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireCodec {
    H264,
    Hevc,
    #[serde(rename = "AV1")]
    Av1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireRateControlMode {
    Cbr,
    Vbr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireQualityPreset {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireTuningPreset {
    HighQuality,
    LowLatency,
    UltraLowLatency,
    Lossless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireMultiPass {
    Disabled,
    QuarterResolution,
    FullResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireAdaptiveQuantization {
    Disabled,
    Spatial,
    Temporal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_union_shapes() {
        let constant = serde_json::to_value(BitrateMode::ConstantMbps(55)).unwrap();
        assert_eq!(constant, json!({ "ConstantMbps": 55 }));

        let absolute = serde_json::to_value(FrameSize::Absolute {
            width: 2880,
            height: Some(2880),
        })
        .unwrap();
        assert_eq!(
            absolute,
            json!({ "Absolute": { "width": 2880, "height": 2880 } })
        );

        let width_only = serde_json::to_value(FrameSize::Absolute {
            width: 1920,
            height: None,
        })
        .unwrap();
        assert_eq!(width_only, json!({ "Absolute": { "width": 1920 } }));

        let scale = serde_json::to_value(FrameSize::Scale(0.75)).unwrap();
        assert_eq!(scale, json!({ "Scale": 0.75 }));
    }

    #[test]
    fn test_enum_tags() {
        assert_eq!(serde_json::to_value(WireCodec::Av1).unwrap(), json!("AV1"));
        assert_eq!(serde_json::to_value(WireCodec::Hevc).unwrap(), json!("Hevc"));
        assert_eq!(
            serde_json::to_value(WireTuningPreset::UltraLowLatency).unwrap(),
            json!("UltraLowLatency")
        );
        assert_eq!(
            serde_json::to_value(WireMultiPass::QuarterResolution).unwrap(),
            json!("QuarterResolution")
        );
    }

    #[test]
    fn test_adaptive_bitrate_shape() {
        let mode = BitrateMode::Adaptive(AdaptiveBitrate {
            saturation_multiplier: 0.5,
            max_throughput_mbps: Switch {
                enabled: true,
                content: 100,
            },
            min_throughput_mbps: Switch {
                enabled: false,
                content: 10,
            },
        });
        let value = serde_json::to_value(mode).unwrap();
        assert_eq!(value["Adaptive"]["max_throughput_mbps"]["content"], json!(100));
        assert_eq!(value["Adaptive"]["min_throughput_mbps"]["enabled"], json!(false));
    }
}
