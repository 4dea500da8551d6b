//! Integration tests for settings and engine config loading
//!
//! These tests cover the file-loading edge:
//! - `load_settings` reads, parses and validates, with anyhow context
//! - `TunerConfig::load_from_file` falls back to defaults
//! - The bundled engine config matches the built-in defaults

use std::fs;
use std::path::PathBuf;

use stream_tuner::config::TunerConfig;
use stream_tuner::error::SettingsError;
use stream_tuner::settings::{load_settings, OptimizationSettings, VideoCodec};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "stream_tuner_{}_{}.json",
        name,
        std::process::id()
    ));
    fs::write(&path, contents).expect("temp file should be writable");
    path
}

#[test]
fn test_load_settings_from_file() {
    let path = temp_file(
        "settings_ok",
        r#"{
            "video": { "codec": "av1", "target_max_bitrate_mbps": 60 },
            "foveation": {
                "layers": [
                    { "quality_factor": 1.0, "radius_degrees": 25.0, "transition_degrees": 5.0 },
                    { "quality_factor": 0.3, "radius_degrees": 0.0 }
                ]
            }
        }"#,
    );

    let settings = load_settings(&path).expect("valid settings should load");
    fs::remove_file(&path).ok();

    assert_eq!(settings.video.codec, VideoCodec::Av1);
    assert_eq!(settings.video.target_max_bitrate_mbps, 60);
    assert_eq!(settings.foveation.layers.len(), 2);
    assert_eq!(settings.foveation.layers[1].transition_degrees, 0.0);
    assert_eq!(settings.network, OptimizationSettings::default().network);
}

#[test]
fn test_load_settings_reports_validation_error() {
    let path = temp_file(
        "settings_invalid",
        r#"{ "video": { "dynamic_bitrate": { "scene_complexity_min_threshold": 0.9 } } }"#,
    );

    let err = load_settings(&path).expect_err("inverted thresholds must be rejected");
    fs::remove_file(&path).ok();

    let settings_err = err
        .downcast_ref::<SettingsError>()
        .expect("root cause should be a SettingsError");
    assert!(matches!(
        settings_err,
        SettingsError::InvertedComplexityThresholds { .. }
    ));
    assert!(format!("{:#}", err).contains("loading settings from"));
}

#[test]
fn test_load_settings_missing_file() {
    let err = load_settings("/nonexistent/stream_tuner_settings.json").unwrap_err();
    assert!(format!("{:#}", err).contains("reading settings file"));
}

#[test]
fn test_bundled_tuner_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/tuner_config.json");
    let config = TunerConfig::load_from_file(path);
    assert_eq!(config, TunerConfig::default());
}

#[test]
fn test_invalid_tuner_config_falls_back() {
    let path = temp_file("tuner_invalid", "{ not json");
    let config = TunerConfig::load_from_file(&path);
    fs::remove_file(&path).ok();
    assert_eq!(config, TunerConfig::default());
}
