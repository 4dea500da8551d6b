// TuningSession - integration layer wiring classifier, controller,
// serializer and dispatcher together
//
// The host drives the session from its own scheduler:
// - eye-tracker loop: `ingest_gaze`, or push into the gaze feed and call
//   `drain_gaze_feed`
// - compositor: `record_frame` once per composited frame
// - ~1 Hz timer: `tick` with fresh scene telemetry
// - settings UI: `apply_settings` with a new snapshot
//
// All state is owned here and mutated through `&mut self`.

use std::time::Instant;

use crate::adjustment::{AdjustmentController, ControllerState, FrameRateMeter, TelemetrySample};
use crate::config::TunerConfig;
use crate::dispatch::{ConfigDispatcher, DispatchedConfig};
use crate::error::{log_settings_error, SerializationError, SessionError};
use crate::gaze::{GazeClassifier, GazeFeed, GazeFeedConsumer, GazeFeedProducer, GazeState};
use crate::settings::{OptimizationSettings, SettingsValidator};
use crate::telemetry::{self, TelemetryHub};
use crate::wire::WireSerializer;

/// Lifecycle of a tuning session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Constructed, nothing generated yet
    Idle,
    /// A server configuration has been generated
    Initialized,
    /// The host reported an active stream
    StreamingActive,
    /// The most recent generation failed; cleared by the next success
    Error,
}

/// Values the last dispatched document was generated from
#[derive(Debug, Clone, Copy, PartialEq)]
struct DispatchedInputs {
    bitrate_mbps: i64,
    multiplier: f32,
}

pub struct TuningSession {
    settings: OptimizationSettings,
    classifier: GazeClassifier,
    controller: AdjustmentController,
    frame_meter: FrameRateMeter,
    gaze_feed: Option<GazeFeedConsumer>,
    feed_capacity: usize,
    serializer: WireSerializer,
    dispatcher: ConfigDispatcher,
    telemetry: &'static TelemetryHub,
    status: SessionStatus,
    streaming: bool,
    last_telemetry: TelemetrySample,
    last_inputs: Option<DispatchedInputs>,
}

impl TuningSession {
    /// Create a session; the settings snapshot is validated up front
    pub fn new(config: &TunerConfig, settings: OptimizationSettings) -> Result<Self, SessionError> {
        Self::with_telemetry(config, settings, telemetry::hub())
    }

    pub fn with_telemetry(
        config: &TunerConfig,
        settings: OptimizationSettings,
        telemetry: &'static TelemetryHub,
    ) -> Result<Self, SessionError> {
        if let Err(err) = SettingsValidator::validate(&settings) {
            log_settings_error(&err, "TuningSession::new");
            return Err(err.into());
        }

        Ok(Self {
            settings,
            classifier: GazeClassifier::new(&config.gaze),
            controller: AdjustmentController::new(&config.adjustment),
            frame_meter: FrameRateMeter::new(Instant::now()),
            gaze_feed: None,
            feed_capacity: config.gaze.feed_capacity,
            serializer: WireSerializer::new(config.field_of_view.clone()),
            dispatcher: ConfigDispatcher::with_telemetry(
                config.telemetry.channel_capacity,
                telemetry,
            ),
            telemetry,
            status: SessionStatus::Idle,
            streaming: false,
            last_telemetry: TelemetrySample::neutral(),
            last_inputs: None,
        })
    }

    /// Run the first adjustment and dispatch the initial configuration
    pub fn initialize(&mut self, now: Instant) -> Result<DispatchedConfig, SessionError> {
        log::info!("[Session] Initializing tuning session");
        self.frame_meter.reset(now);
        let state = self
            .controller
            .recompute(&self.last_telemetry, &self.settings, now);
        self.record_controller_state(0.0, state);

        let dispatched = self.generate(state)?;
        log::info!(
            "[Session] Initialized with revision {}",
            dispatched.revision
        );
        Ok(dispatched)
    }

    /// Swap in a new settings snapshot and regenerate the configuration
    ///
    /// An invalid snapshot is rejected and the current one stays active. The
    /// controller recompute is subject to the usual cadence, so inside the
    /// interval the document is rebuilt from the previous effective values.
    pub fn apply_settings(
        &mut self,
        settings: OptimizationSettings,
        now: Instant,
    ) -> Result<DispatchedConfig, SessionError> {
        if let Err(err) = SettingsValidator::validate(&settings) {
            log_settings_error(&err, "TuningSession::apply_settings");
            return Err(err.into());
        }

        self.settings = settings;
        let previous = self.controller.state();
        let state = self
            .controller
            .recompute(&self.last_telemetry, &self.settings, now);
        self.record_controller_state(previous.effective_bitrate_mbps, state);

        log::info!("[Session] Applied new optimization settings");
        Ok(self.generate(state)?)
    }

    /// Periodic adjustment tick
    ///
    /// A non-positive `frames_per_second` in the sample is replaced by the
    /// session's own frame meter reading. Returns the newly dispatched
    /// configuration when the effective values changed, `None` otherwise.
    /// Does nothing until the session has been initialized.
    pub fn tick(
        &mut self,
        telemetry: TelemetrySample,
        now: Instant,
    ) -> Result<Option<DispatchedConfig>, SessionError> {
        self.frame_meter.update(now);
        if self.status == SessionStatus::Idle {
            return Ok(None);
        }

        let mut telemetry = telemetry;
        if telemetry.frames_per_second.is_nan() || telemetry.frames_per_second <= 0.0 {
            telemetry.frames_per_second = self.frame_meter.current_fps();
        }
        self.last_telemetry = telemetry;
        self.telemetry
            .record_round_trip_latency(telemetry.round_trip_latency_ms);

        let previous = self.controller.state();
        let state = self.controller.recompute(&telemetry, &self.settings, now);
        if state.last_adjustment == previous.last_adjustment {
            return Ok(None);
        }
        self.record_controller_state(previous.effective_bitrate_mbps, state);

        let inputs = dispatched_inputs(state);
        if self.status != SessionStatus::Error && self.last_inputs == Some(inputs) {
            return Ok(None);
        }
        Ok(Some(self.generate(state)?))
    }

    /// Classify one gaze sample
    pub fn ingest_gaze(
        &mut self,
        raw_x: f32,
        raw_y: f32,
        tracking_active: bool,
        now: Instant,
    ) -> GazeState {
        let state =
            self.classifier
                .ingest(raw_x, raw_y, tracking_active, &self.settings.foveation, now);
        self.telemetry
            .record_gaze_stability(state.is_stable, state.mean_movement);
        state
    }

    /// Create the lock-free gaze feed and return its producer end
    ///
    /// Calling this again replaces the previous feed.
    pub fn gaze_feed(&mut self) -> GazeFeedProducer {
        let (producer, consumer) = GazeFeed::new(self.feed_capacity);
        self.gaze_feed = Some(consumer);
        producer
    }

    /// Classify every queued feed sample; returns the latest state, if any
    pub fn drain_gaze_feed(&mut self) -> Option<GazeState> {
        let (samples, dropped) = match self.gaze_feed.as_mut() {
            Some(feed) => (feed.drain(), feed.take_dropped()),
            None => return None,
        };

        if dropped > 0 {
            log::warn!("[Session] Gaze feed overflow, {} samples dropped", dropped);
            self.telemetry.record_gaze_overflow(dropped);
        }

        let mut latest = None;
        for sample in samples {
            let state = self
                .classifier
                .ingest_timed(sample, &self.settings.foveation);
            self.telemetry
                .record_gaze_stability(state.is_stable, state.mean_movement);
            latest = Some(state);
        }
        latest
    }

    /// Count one composited frame
    pub fn record_frame(&mut self) {
        self.frame_meter.record_frame();
    }

    /// Host reports that the stream has started
    pub fn mark_streaming(&mut self) {
        match self.status {
            SessionStatus::Initialized => {
                self.streaming = true;
                self.status = SessionStatus::StreamingActive;
                log::info!("[Session] Streaming active");
            }
            SessionStatus::Error => {
                self.streaming = true;
            }
            SessionStatus::StreamingActive => {}
            SessionStatus::Idle => {
                log::warn!("[Session] Ignoring stream start before initialization");
            }
        }
    }

    /// Return to `Idle`; the last-known-good payload is kept
    pub fn shutdown(&mut self) {
        self.status = SessionStatus::Idle;
        self.streaming = false;
        self.gaze_feed = None;
        log::info!("[Session] Shutdown complete");
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn settings(&self) -> &OptimizationSettings {
        &self.settings
    }

    pub fn controller_state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn gaze_state(&self) -> GazeState {
        self.classifier.current()
    }

    pub fn current_fps(&self) -> f32 {
        self.frame_meter.current_fps()
    }

    pub fn dispatcher(&self) -> &ConfigDispatcher {
        &self.dispatcher
    }

    pub fn last_known_good(&self) -> Option<&DispatchedConfig> {
        self.dispatcher.last_known_good()
    }

    fn generate(&mut self, state: ControllerState) -> Result<DispatchedConfig, SerializationError> {
        let result = self.serializer.serialize(
            &self.settings,
            state.effective_bitrate_mbps,
            state.foveation_strength_multiplier,
        );
        match self.dispatcher.dispatch_result(result) {
            Ok(dispatched) => {
                self.last_inputs = Some(dispatched_inputs(state));
                self.status = if self.streaming {
                    SessionStatus::StreamingActive
                } else {
                    SessionStatus::Initialized
                };
                Ok(dispatched)
            }
            Err(err) => {
                log::error!("[Session] Failed to generate server configuration: {}", err);
                self.status = SessionStatus::Error;
                Err(err)
            }
        }
    }

    fn record_controller_state(&self, previous_bitrate: f32, state: ControllerState) {
        self.telemetry
            .record_bitrate(previous_bitrate, state.effective_bitrate_mbps);
        self.telemetry
            .record_foveation_strength(state.foveation_strength_multiplier);
    }
}

fn dispatched_inputs(state: ControllerState) -> DispatchedInputs {
    DispatchedInputs {
        bitrate_mbps: state.effective_bitrate_mbps.round() as i64,
        multiplier: state.foveation_strength_multiplier,
    }
}
