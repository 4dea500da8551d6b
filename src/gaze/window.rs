use std::collections::VecDeque;

/// Fixed-capacity rolling window of movement magnitudes
///
/// Pushing into a full window evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct MovementWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl MovementWindow {
    /// Create a window holding at most `capacity` values (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a magnitude and return the mean of the window
    pub fn observe(&mut self, magnitude: f32) -> f32 {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(magnitude);
        self.mean()
    }

    pub fn mean(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.samples.iter().copied().sum();
        sum / self.samples.len() as f32
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = MovementWindow::new(3);
        window.observe(3.0);
        window.observe(0.0);
        window.observe(0.0);
        assert!((window.mean() - 1.0).abs() < 1e-6);

        // 3.0 falls out
        let mean = window.observe(0.0);
        assert_eq!(mean, 0.0);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_window_mean_of_partial_fill() {
        let mut window = MovementWindow::new(5);
        assert_eq!(window.mean(), 0.0);
        assert!((window.observe(0.2) - 0.2).abs() < 1e-6);
        assert!((window.observe(0.4) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_zero_capacity_is_promoted() {
        let mut window = MovementWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.observe(1.0);
        window.observe(2.0);
        assert_eq!(window.len(), 1);
        assert_eq!(window.mean(), 2.0);

        window.clear();
        assert!(window.is_empty());
    }
}
