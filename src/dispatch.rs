// ConfigDispatcher - hands generated documents to the transport
//
// Every successful generation gets the next revision number, becomes the
// last-known-good payload and is broadcast to subscribers. A failed
// generation is logged and reported to telemetry but leaves the
// last-known-good payload in place.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::{log_serialization_error, SerializationError};
use crate::telemetry::{self, TelemetryHub};
use crate::wire::{to_pretty_json, WireConfigDocument};

const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// A rendered document as handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedConfig {
    /// Monotonically increasing, starting at 1
    pub revision: u64,
    /// Pretty-printed JSON payload
    pub json: Arc<str>,
}

pub struct ConfigDispatcher {
    tx: broadcast::Sender<DispatchedConfig>,
    revision: u64,
    last_known_good: Option<DispatchedConfig>,
    telemetry: &'static TelemetryHub,
}

impl ConfigDispatcher {
    pub fn new(channel_capacity: usize) -> Self {
        Self::with_telemetry(channel_capacity, telemetry::hub())
    }

    pub fn with_telemetry(channel_capacity: usize, telemetry: &'static TelemetryHub) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            tx,
            revision: 0,
            last_known_good: None,
            telemetry,
        }
    }

    /// Render and broadcast a document
    pub fn dispatch(
        &mut self,
        document: &WireConfigDocument,
    ) -> Result<DispatchedConfig, SerializationError> {
        let json = match to_pretty_json(document) {
            Ok(json) => json,
            Err(err) => return Err(self.reject(err)),
        };

        self.revision += 1;
        let dispatched = DispatchedConfig {
            revision: self.revision,
            json: Arc::from(json),
        };
        self.last_known_good = Some(dispatched.clone());
        self.telemetry
            .record_dispatch(dispatched.revision, dispatched.json.len());
        log::info!(
            "[Dispatch] Server configuration revision {} ready ({} bytes)",
            dispatched.revision,
            dispatched.json.len()
        );

        // Lagging or absent subscribers still see last_known_good
        let _ = self.tx.send(dispatched.clone());
        Ok(dispatched)
    }

    /// Dispatch the outcome of a serialization attempt
    ///
    /// Failures are logged and published to telemetry; the last-known-good
    /// payload is kept.
    pub fn dispatch_result(
        &mut self,
        result: Result<WireConfigDocument, SerializationError>,
    ) -> Result<DispatchedConfig, SerializationError> {
        match result {
            Ok(document) => self.dispatch(&document),
            Err(err) => Err(self.reject(err)),
        }
    }

    fn reject(&self, err: SerializationError) -> SerializationError {
        log_serialization_error(&err, "ConfigDispatcher");
        self.telemetry.record_serialization_failure(&err);
        if let Some(good) = &self.last_known_good {
            log::warn!(
                "[Dispatch] Keeping last known good revision {}",
                good.revision
            );
        }
        err
    }

    pub fn last_known_good(&self) -> Option<&DispatchedConfig> {
        self.last_known_good.as_ref()
    }

    /// Revision of the most recent successful dispatch, 0 if none
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DispatchedConfig> {
        self.tx.subscribe()
    }

    /// Stream of dispatched configurations; lagged items are skipped
    pub fn stream(&self) -> impl Stream<Item = DispatchedConfig> + Send + 'static {
        BroadcastStream::new(self.tx.subscribe())
            .filter_map(|result| async move { result.ok() })
    }
}

impl Default for ConfigDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
