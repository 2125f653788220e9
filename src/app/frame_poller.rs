use std::time::{Duration, Instant};

use crate::{
    app::{fps_meter::FpsMeter, session_facade::SessionFacade},
    media::VideoFrame,
};

pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Frames taken in one poll. `None` means nothing new since the last poll.
#[derive(Debug, Default)]
pub struct PolledFrames {
    pub local: Option<VideoFrame>,
    pub remote: Option<VideoFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRates {
    pub local: f32,
    pub remote: f32,
}

/// Fixed-cadence, non-blocking poll of both frame slots for a UI loop.
///
/// Call [`FramePoller::tick`] as often as the UI redraws; it polls at most once
/// per interval and folds delivered frames into the two FPS meters.
#[derive(Debug)]
pub struct FramePoller {
    interval: Duration,
    next_poll: Instant,
    local_fps: FpsMeter,
    remote_fps: FpsMeter,
}

impl FramePoller {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self::with_interval(POLL_INTERVAL, now)
    }

    #[must_use]
    pub fn with_interval(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_poll: now,
            local_fps: FpsMeter::new(now),
            remote_fps: FpsMeter::new(now),
        }
    }

    /// Polls `facade` if the interval has elapsed.
    pub fn tick(&mut self, facade: &SessionFacade, now: Instant) -> Option<PolledFrames> {
        if now < self.next_poll {
            return None;
        }
        // skip missed ticks instead of bursting to catch up
        self.next_poll = (self.next_poll + self.interval).max(now);
        Some(self.record(facade.poll_local_frame(), facade.poll_remote_frame()))
    }

    /// Closes the FPS window if due.
    pub fn frame_rates(&mut self, now: Instant) -> Option<FrameRates> {
        match (self.local_fps.tick(now), self.remote_fps.tick(now)) {
            (Some(local), Some(remote)) => Some(FrameRates { local, remote }),
            _ => None,
        }
    }

    fn record(&mut self, local: Option<VideoFrame>, remote: Option<VideoFrame>) -> PolledFrames {
        if local.is_some() {
            self.local_fps.record_frame();
        }
        if remote.is_some() {
            self.remote_fps.record_frame();
        }
        PolledFrames { local, remote }
    }
}
