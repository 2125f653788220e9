//! Boundary to the platform media engine.
//!
//! The engine owns capture, codecs, ICE and DTLS. This crate only drives it:
//! it decides when to offer, which descriptions to apply and which candidates
//! to add, and it receives engine callbacks as [`PeerEvent`]s through a
//! [`PeerEventSender`]. Methods that may block (device start, session init)
//! are only ever called from the orchestrator's start path or worker thread.
//!
//! [`PeerEvent`]: crate::media::peer_event::PeerEvent

use std::sync::Arc;

use crate::{
    media::{
        direction::NegotiationDirection,
        frame_slot::FrameSlot,
        media_error::MediaError,
        peer_event::{PeerEventSender, RemoteTrackId},
    },
    signaling_client::protocol::{IceCandidateDescriptor, IceServerDescriptor, SdpDescriptor},
};

/// Handle to a local track inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVideoTrack {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeerSessionConfig {
    /// At most one server; see `PeerSessionConfig::from_ice_servers`.
    pub ice_servers: Vec<IceServerDescriptor>,
}

impl PeerSessionConfig {
    /// Keeps only the first advertised server.
    #[must_use]
    pub fn from_ice_servers(servers: &[IceServerDescriptor]) -> Self {
        Self {
            ice_servers: servers.iter().take(1).cloned().collect(),
        }
    }
}

pub trait MediaEngine: Send + Sync {
    /// Starts the default camera. Preview frames are published into `preview`.
    ///
    /// # Errors
    /// No usable device.
    fn acquire_local_video(
        &self,
        preview: Arc<FrameSlot>,
    ) -> Result<Box<dyn LocalVideoSource>, MediaError>;

    /// # Errors
    /// The engine cannot create a session with this configuration.
    fn create_peer_session(
        &self,
        config: PeerSessionConfig,
        events: PeerEventSender,
    ) -> Result<Box<dyn PeerSession>, MediaError>;
}

pub trait LocalVideoSource: Send {
    /// # Errors
    /// The engine refused to build a track from this source.
    fn create_track(&mut self, name: &str) -> Result<LocalVideoTrack, MediaError>;
    fn dispose_track(&mut self, track: &LocalVideoTrack);
    fn dispose(&mut self);
}

/// One peer connection. Results of `create_offer`/`create_answer` arrive later
/// as `PeerEvent::LocalSdpReady`.
pub trait PeerSession: Send {
    /// # Errors
    /// Engine-specific.
    fn initialize(&mut self) -> Result<(), MediaError>;

    /// Adds the single video transceiver. `local_track` is `None` for receive-only.
    ///
    /// # Errors
    /// Engine-specific.
    fn add_video_transceiver(
        &mut self,
        direction: NegotiationDirection,
        local_track: Option<&LocalVideoTrack>,
    ) -> Result<(), MediaError>;

    /// # Errors
    /// Engine-specific.
    fn create_offer(&mut self) -> Result<(), MediaError>;

    /// # Errors
    /// Engine-specific.
    fn create_answer(&mut self) -> Result<(), MediaError>;

    /// # Errors
    /// The description was rejected.
    fn set_remote_description(&mut self, sdp: &SdpDescriptor) -> Result<(), MediaError>;

    /// # Errors
    /// The candidate was rejected.
    fn add_ice_candidate(&mut self, candidate: &IceCandidateDescriptor) -> Result<(), MediaError>;

    /// Routes decoded frames of a remote video track into `frames`.
    ///
    /// # Errors
    /// Unknown track.
    fn attach_remote_video(
        &mut self,
        track: &RemoteTrackId,
        frames: Arc<FrameSlot>,
    ) -> Result<(), MediaError>;

    /// # Errors
    /// Unknown track.
    fn set_remote_audio_output(
        &mut self,
        track: &RemoteTrackId,
        enabled: bool,
    ) -> Result<(), MediaError>;

    fn dispose(&mut self);
}
