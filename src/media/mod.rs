pub mod direction;
pub mod frame_slot;
pub mod local_video;
pub mod media_engine;
pub mod media_error;
pub mod peer_event;
pub mod video_frame;

pub use direction::NegotiationDirection;
pub use frame_slot::FrameSlot;
pub use local_video::{LOCAL_TRACK_NAME, LocalVideo};
pub use media_engine::{
    LocalVideoSource, LocalVideoTrack, MediaEngine, PeerSession, PeerSessionConfig,
};
pub use media_error::MediaError;
pub use peer_event::{
    IceConnectionState, IceGatheringState, PeerEvent, PeerEventSender, RemoteTrackId,
};
pub use video_frame::{PixelFormat, VideoFrame};
