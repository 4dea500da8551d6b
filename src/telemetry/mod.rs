//! Diagnostics telemetry collector and helpers.
//!
//! The collector multiplexes adjustment, gaze, latency and dispatch events
//! into a bounded history plus an async broadcast stream.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tokio::sync::broadcast;

use crate::config::TelemetryConfig;
use crate::error::{ErrorCode, SerializationError};

pub mod events;

pub use events::MetricEvent;

/// Global telemetry hub shared across the crate.
static HUB: Lazy<TelemetryHub> = Lazy::new(TelemetryHub::default);

/// Access the global telemetry hub.
pub fn hub() -> &'static TelemetryHub {
    &HUB
}

/// Multiplier changes smaller than this are not re-published.
const FOVEATION_GAUGE_STEP: f32 = 0.01;

/// Snapshot of collector state for host-side reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast-based collector retaining a bounded history of metrics.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if self.history_capacity > 0 {
            let mut history = lock(&self.history);
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        }

        // No subscribers is fine
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = lock(&self.history);
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        let config = TelemetryConfig::default();
        Self::new(config.channel_capacity, config.history_capacity)
    }
}

/// Latency tracker maintains a rolling window to compute avg/max latency.
struct LatencyTracker {
    samples: VecDeque<f32>,
    max_samples: usize,
}

impl LatencyTracker {
    fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    fn observe(&mut self, value: f32) -> (f32, f32, usize) {
        if self.samples.len() == self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(value.abs());

        let count = self.samples.len();
        let sum: f32 = self.samples.iter().copied().sum();
        let max = self
            .samples
            .iter()
            .copied()
            .fold(0.0_f32, |acc, next| acc.max(next));
        let avg = if count == 0 { 0.0 } else { sum / count as f32 };
        (avg, max, count)
    }
}

/// Top-level hub wrapping collector state plus derived gauges.
pub struct TelemetryHub {
    collector: TelemetryCollector,
    latency: Mutex<LatencyTracker>,
    foveation_gauge: Mutex<Option<f32>>,
    gaze_stable: Mutex<Option<bool>>,
}

impl TelemetryHub {
    pub fn new(channel_capacity: usize, history_capacity: usize, latency_window: usize) -> Self {
        Self {
            collector: TelemetryCollector::new(channel_capacity, history_capacity),
            latency: Mutex::new(LatencyTracker::new(latency_window)),
            foveation_gauge: Mutex::new(None),
            gaze_stable: Mutex::new(None),
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.channel_capacity, config.history_capacity, 32)
    }

    pub fn collector(&self) -> &TelemetryCollector {
        &self.collector
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.collector.snapshot()
    }

    pub fn record_bitrate(&self, previous_mbps: f32, effective_mbps: f32) {
        if previous_mbps == effective_mbps {
            return;
        }
        self.collector.publish(MetricEvent::BitrateAdjusted {
            previous_mbps,
            effective_mbps,
        });
    }

    pub fn record_foveation_strength(&self, multiplier: f32) {
        let mut gauge = lock(&self.foveation_gauge);
        let should_emit = gauge
            .map(|last| (last - multiplier).abs() >= FOVEATION_GAUGE_STEP)
            .unwrap_or(true);

        if should_emit {
            *gauge = Some(multiplier);
            self.collector
                .publish(MetricEvent::FoveationStrength { multiplier });
        }
    }

    /// Publish only when stability flips (or on the first observation)
    pub fn record_gaze_stability(&self, stable: bool, mean_movement: f32) {
        let mut last = lock(&self.gaze_stable);
        if *last == Some(stable) {
            return;
        }
        *last = Some(stable);
        self.collector.publish(MetricEvent::GazeStability {
            stable,
            mean_movement,
        });
    }

    pub fn record_round_trip_latency(&self, latency_ms: f32) {
        if !latency_ms.is_finite() || latency_ms <= 0.0 {
            return;
        }
        let (avg, max, count) = lock(&self.latency).observe(latency_ms);
        self.collector.publish(MetricEvent::Latency {
            avg_ms: avg,
            max_ms: max,
            sample_count: count,
        });
    }

    pub fn record_dispatch(&self, revision: u64, bytes: usize) {
        self.collector
            .publish(MetricEvent::ConfigDispatched { revision, bytes });
    }

    pub fn record_serialization_failure(&self, err: &SerializationError) {
        self.collector.publish(MetricEvent::SerializationFailed {
            code: err.code(),
            field: err.field().map(str::to_string),
            message: err.message(),
        });
    }

    pub fn record_gaze_overflow(&self, dropped: u64) {
        if dropped > 0 {
            self.collector
                .publish(MetricEvent::GazeFeedOverflow { dropped });
        }
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
