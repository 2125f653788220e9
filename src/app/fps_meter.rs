use std::time::{Duration, Instant};

pub const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Counts frames and turns the count into a rate once per window.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window: Duration,
    window_start: Instant,
    frames: u32,
    last_fps: f32,
}

impl FpsMeter {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self::with_window(FPS_WINDOW, now)
    }

    #[must_use]
    pub fn with_window(window: Duration, now: Instant) -> Self {
        Self {
            window,
            window_start: now,
            frames: 0,
            last_fps: 0.0,
        }
    }

    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    /// Returns the rate for the window that just closed, if one has, and starts
    /// a new one.
    #[allow(clippy::cast_precision_loss)]
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }
        self.last_fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.last_fps)
    }

    #[must_use]
    pub fn last_fps(&self) -> f32 {
        self.last_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window_and_resets() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::new(t0);
        for _ in 0..30 {
            meter.record_frame();
        }
        assert_eq!(meter.tick(t0 + Duration::from_millis(500)), None);

        let fps = meter.tick(t0 + FPS_WINDOW).unwrap_or_default();
        assert!((fps - 30.0).abs() < f32::EPSILON, "{fps}");

        // nothing recorded in the next window
        assert_eq!(meter.tick(t0 + FPS_WINDOW * 2), Some(0.0));
        assert!(meter.last_fps().abs() < f32::EPSILON);
    }
}
