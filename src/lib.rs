// Stream Tuner Core - adaptive parameter engine for remote VR streaming
// Gaze stability, telemetry-driven bitrate/foveation adjustment and server
// configuration generation

// Module declarations
pub mod adjustment;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gaze;
pub mod session;
pub mod settings;
pub mod telemetry;
pub mod wire;

// Re-exports for convenience
pub use adjustment::{AdjustmentController, ControllerState, TelemetrySample};
pub use config::TunerConfig;
pub use dispatch::{ConfigDispatcher, DispatchedConfig};
pub use error::{ErrorCode, SerializationError, SessionError, SettingsError};
pub use gaze::{GazeClassifier, GazeState};
pub use session::{SessionStatus, TuningSession};
pub use settings::{load_settings, OptimizationSettings};
pub use wire::{serialize, WireConfigDocument};

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Install the fmt subscriber once per process
///
/// Honors `RUST_LOG`, defaulting to `info`. `log` records are forwarded
/// through the subscriber's log bridge. Safe to call repeatedly; a subscriber
/// installed by the host takes precedence.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
        log::info!("stream tuner logging initialized");
    });
}
