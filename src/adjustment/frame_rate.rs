use std::time::{Duration, Instant};

const MEASUREMENT_WINDOW: Duration = Duration::from_secs(1);

/// Frames-per-second meter fed by the compositor
///
/// Counts composited frames and publishes a new reading once at least one
/// second has elapsed since the previous reading.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    frames: u32,
    window_start: Instant,
    current_fps: f32,
}

impl FrameRateMeter {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            current_fps: 0.0,
        }
    }

    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    /// Close the window if it is due and return the new reading
    pub fn update(&mut self, now: Instant) -> Option<f32> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < MEASUREMENT_WINDOW {
            return None;
        }

        self.current_fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.current_fps)
    }

    /// Last published reading, 0 before the first window closes
    pub fn current_fps(&self) -> f32 {
        self.current_fps
    }

    pub fn reset(&mut self, now: Instant) {
        self.frames = 0;
        self.window_start = now;
        self.current_fps = 0.0;
    }
}
