// GazeFeed - lock-free handoff from the eye-tracker thread to the classifier
//
// The tracker thread must never block on the consumer, so the feed is a
// single-producer single-consumer rtrb ring buffer. When the ring is full the
// newest sample is dropped and counted; the consumer reports the drop count
// when it drains.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::gaze::{GazeSample, TimedGazeSample};

/// Constructor for split gaze feed endpoints
pub struct GazeFeed;

impl GazeFeed {
    /// Create a feed holding up to `capacity` samples (minimum 1)
    #[allow(clippy::new_ret_no_self)]
    pub fn new(capacity: usize) -> (GazeFeedProducer, GazeFeedConsumer) {
        let (producer, consumer) = RingBuffer::new(capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));
        (
            GazeFeedProducer {
                producer,
                dropped: Arc::clone(&dropped),
            },
            GazeFeedConsumer { consumer, dropped },
        )
    }
}

/// Tracker-side endpoint; `Send` but not `Sync`
pub struct GazeFeedProducer {
    producer: Producer<TimedGazeSample>,
    dropped: Arc<AtomicU64>,
}

impl GazeFeedProducer {
    /// Push a sample without blocking
    ///
    /// Returns `false` when the feed is full and the sample was dropped.
    pub fn push(&mut self, sample: TimedGazeSample) -> bool {
        match self.producer.push(sample) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Stamp and push a raw sample
    pub fn push_raw(&mut self, x: f32, y: f32, tracking_active: bool) -> bool {
        self.push(TimedGazeSample {
            sample: GazeSample::new(x, y),
            tracking_active,
            captured_at: Instant::now(),
        })
    }

    /// Free slots remaining
    pub fn available(&self) -> usize {
        self.producer.slots()
    }
}

/// Classifier-side endpoint
pub struct GazeFeedConsumer {
    consumer: Consumer<TimedGazeSample>,
    dropped: Arc<AtomicU64>,
}

impl GazeFeedConsumer {
    pub fn pop(&mut self) -> Option<TimedGazeSample> {
        self.consumer.pop().ok()
    }

    /// Pop every queued sample in arrival order
    pub fn drain(&mut self) -> Vec<TimedGazeSample> {
        let mut samples = Vec::with_capacity(self.consumer.slots());
        while let Ok(sample) = self.consumer.pop() {
            samples.push(sample);
        }
        samples
    }

    pub fn pending(&self) -> usize {
        self.consumer.slots()
    }

    /// Number of samples dropped since the last call, resetting the counter
    pub fn take_dropped(&mut self) -> u64 {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}
