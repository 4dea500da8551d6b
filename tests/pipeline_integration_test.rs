//! Integration tests for the gaze/telemetry -> adjustment -> dispatch pipeline
//!
//! These tests drive a `TuningSession` the way a host scheduler would:
//! - ~90 Hz gaze samples through the lock-free feed
//! - ~1 Hz adjustment ticks with scene telemetry
//! - settings edits regenerating the server configuration

use std::time::{Duration, Instant};

use futures::StreamExt;
use once_cell::sync::Lazy;
use stream_tuner::adjustment::TelemetrySample;
use stream_tuner::config::TunerConfig;
use stream_tuner::gaze::{GazeSample, TimedGazeSample};
use stream_tuner::settings::OptimizationSettings;
use stream_tuner::telemetry::{MetricEvent, TelemetryHub};
use stream_tuner::{SessionStatus, TuningSession};

static HUB: Lazy<TelemetryHub> = Lazy::new(|| TelemetryHub::new(256, 512, 16));

fn new_session() -> TuningSession {
    TuningSession::with_telemetry(
        &TunerConfig::default(),
        OptimizationSettings::default(),
        &HUB,
    )
    .expect("default settings are valid")
}

fn scene(fps: f32, luminance: f32, complexity: f32) -> TelemetrySample {
    TelemetrySample {
        frames_per_second: fps,
        scene_luminance: luminance,
        scene_complexity: complexity,
        round_trip_latency_ms: 42.0,
    }
}

/// Sustained low frame rate drives the multiplier to its floor and the
/// peripheral edge ratio up accordingly
#[test]
fn test_sustained_low_fps_tightens_foveation() {
    let mut session = new_session();
    let t0 = Instant::now();
    session.initialize(t0).unwrap();

    let mut last = None;
    for second in 1..=15 {
        if let Some(dispatched) = session
            .tick(scene(60.0, 0.5, 0.5), t0 + Duration::from_secs(second))
            .unwrap()
        {
            last = Some(dispatched);
        }
    }

    let state = session.controller_state();
    assert_eq!(state.foveation_strength_multiplier, 0.5);

    let dispatched = last.expect("multiplier changes should re-dispatch");
    let value: serde_json::Value = serde_json::from_str(&dispatched.json).unwrap();
    let edge = value["video"]["foveated_encoding"]["content"]["edge_ratio_x"]
        .as_f64()
        .unwrap();
    assert!((edge - 10.0).abs() < 1e-4);
}

/// Dark scenes keep the (boosted, clamped) ceiling regardless of complexity
#[test]
fn test_dark_scene_holds_ceiling() {
    let mut session = new_session();
    let t0 = Instant::now();
    session.initialize(t0).unwrap();

    let dispatched = session
        .tick(scene(90.0, 0.02, 0.0), t0 + Duration::from_secs(1))
        .unwrap()
        .expect("bitrate change should re-dispatch");
    assert_eq!(session.controller_state().effective_bitrate_mbps, 70.0);
    assert!(dispatched.json.contains("\"ConstantMbps\": 70"));
}

/// Gaze samples pushed from another thread are classified on drain
#[test]
fn test_gaze_feed_from_tracker_thread() {
    let mut session = new_session();
    let mut producer = session.gaze_feed();
    let t0 = Instant::now();

    let tracker = std::thread::spawn(move || {
        // One large saccade away from center, then stillness at the new position
        for i in 0..30u64 {
            producer.push(TimedGazeSample {
                sample: GazeSample::new(0.3, 0.0),
                tracking_active: true,
                captured_at: t0 + Duration::from_millis(11 * i),
            });
        }
    });
    tracker.join().unwrap();

    let state = session.drain_gaze_feed().expect("samples were queued");
    // Last sample is ~319 ms after the saccade
    assert!(state.is_stable);
    assert!((state.shift_x - 0.6).abs() < 1e-6);
}

#[test]
fn test_gaze_feed_overflow_is_reported() {
    let mut config = TunerConfig::default();
    config.gaze.feed_capacity = 4;
    let mut session =
        TuningSession::with_telemetry(&config, OptimizationSettings::default(), &HUB).unwrap();
    let mut producer = session.gaze_feed();

    for _ in 0..10 {
        producer.push_raw(0.0, 0.0, true);
    }
    session.drain_gaze_feed();

    assert!(HUB
        .snapshot()
        .recent
        .iter()
        .any(|event| matches!(event, MetricEvent::GazeFeedOverflow { dropped: 6 })));
}

/// Settings edits are validated before they replace the active snapshot
#[test]
fn test_settings_edit_cycle() {
    let mut session = new_session();
    let t0 = Instant::now();
    session.initialize(t0).unwrap();
    session.mark_streaming();

    let mut edited = session.settings().clone();
    edited.video.target_max_bitrate_mbps = 40;
    edited.video.dynamic_bitrate.enabled = false;
    let dispatched = session
        .apply_settings(edited, t0 + Duration::from_secs(1))
        .unwrap();
    assert!(dispatched.json.contains("\"ConstantMbps\": 40"));
    assert_eq!(session.status(), SessionStatus::StreamingActive);

    let mut invalid = session.settings().clone();
    invalid.foveation.gaze_movement_sensitivity = 2.0;
    assert!(session
        .apply_settings(invalid, t0 + Duration::from_secs(2))
        .is_err());
    assert_eq!(session.settings().video.target_max_bitrate_mbps, 40);
    assert_eq!(session.last_known_good().unwrap().revision, dispatched.revision);
}

#[tokio::test]
async fn test_dispatch_stream_delivers_revisions() {
    let mut session = new_session();
    let stream = session.dispatcher().stream();
    let t0 = Instant::now();

    session.initialize(t0).unwrap();
    session
        .tick(scene(90.0, 0.5, 1.0), t0 + Duration::from_secs(1))
        .unwrap();

    let revisions: Vec<u64> = stream.take(2).map(|config| config.revision).collect().await;
    assert_eq!(revisions, vec![1, 2]);
}
