use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::media::video_frame::VideoFrame;

/// Single-item, latest-wins mailbox between a frame producer (a media-engine
/// callback thread) and a polling consumer.
///
/// `publish` overwrites any unread frame. `take_and_clear` hands the pending
/// frame to the caller and leaves the slot empty, so each frame is observed at
/// most once. Each slot has its own lock and no code path holds two slots at once.
#[derive(Debug, Default)]
pub struct FrameSlot {
    pending: Mutex<Option<VideoFrame>>,
}

impl FrameSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, frame: VideoFrame) {
        *self.lock() = Some(frame);
    }

    #[must_use]
    pub fn take_and_clear(&self) -> Option<VideoFrame> {
        self.lock().take()
    }

    pub fn clear(&self) {
        self.lock().take();
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.lock().is_some()
    }

    // A panicking producer must not wedge the display; the slot holds no invariant
    // that a half-finished publish could break.
    fn lock(&self) -> MutexGuard<'_, Option<VideoFrame>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
