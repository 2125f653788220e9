use std::fmt;

/// Failures reported by a media-engine implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// No camera, or the camera refused to start.
    DeviceUnavailable(String),
    /// The source exists but a track could not be made from it.
    TrackCreation(String),
    /// The peer session could not be created or initialized.
    SessionInit(String),
    /// An offer, answer or remote description was rejected.
    Sdp(String),
    Candidate(String),
    Track(String),
    /// The session was used after `dispose`.
    Disposed,
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceUnavailable(s) => write!(f, "video device unavailable: {s}"),
            Self::TrackCreation(s) => write!(f, "cannot create local track: {s}"),
            Self::SessionInit(s) => write!(f, "peer session init failed: {s}"),
            Self::Sdp(s) => write!(f, "session description rejected: {s}"),
            Self::Candidate(s) => write!(f, "ice candidate rejected: {s}"),
            Self::Track(s) => write!(f, "remote track error: {s}"),
            Self::Disposed => write!(f, "peer session already disposed"),
        }
    }
}

impl std::error::Error for MediaError {}
