use std::sync::Arc;

use crate::{
    log::LogSink,
    media::{
        media_engine::{LocalVideoSource, LocalVideoTrack, MediaEngine},
        media_error::MediaError,
        frame_slot::FrameSlot,
    },
    sink_debug, sink_warn,
};

/// Name of the track built from the camera.
pub const LOCAL_TRACK_NAME: &str = "webcam_track";

/// Camera source plus the track built on top of it.
///
/// Both are created together and released together, track first.
pub struct LocalVideo {
    source: Box<dyn LocalVideoSource>,
    track: LocalVideoTrack,
}

impl LocalVideo {
    /// Opens the default camera and builds `webcam_track` from it.
    ///
    /// Preview frames go to `preview`. If the track cannot be made the source is
    /// disposed before returning.
    ///
    /// # Errors
    /// The device could not start or the track could not be built.
    pub fn acquire(
        engine: &dyn MediaEngine,
        preview: Arc<FrameSlot>,
        logger: &Arc<dyn LogSink>,
    ) -> Result<Self, MediaError> {
        let mut source = engine.acquire_local_video(preview)?;
        match source.create_track(LOCAL_TRACK_NAME) {
            Ok(track) => {
                sink_debug!(logger, "[MEDIA] local track {} ready", track.name);
                Ok(Self { source, track })
            }
            Err(e) => {
                sink_warn!(logger, "[MEDIA] {e}; releasing camera");
                source.dispose();
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn track(&self) -> &LocalVideoTrack {
        &self.track
    }

    pub fn dispose(mut self) {
        self.source.dispose_track(&self.track);
        self.source.dispose();
    }
}
