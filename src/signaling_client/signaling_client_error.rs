use std::{fmt, io};

use crate::signaling_client::protocol::ProtoError;

/// Failures of the signaling transport: opening it or pushing a frame through it.
#[derive(Debug)]
pub enum SignalingClientError {
    Io(io::Error),
    /// URL could not be turned into a WebSocket request, or the handshake failed.
    Connect(String),
    Tls(String),
    WebSocket(String),
    Frame(ProtoError),
    /// The network thread has exited; nothing can be sent any more.
    Disconnected,
    /// The network thread did not acknowledge a send in time.
    Timeout,
}

impl fmt::Display for SignalingClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Connect(e) => write!(f, "connect failed: {e}"),
            Self::Tls(e) => write!(f, "TLS error: {e}"),
            Self::WebSocket(e) => write!(f, "WebSocket error: {e}"),
            Self::Frame(e) => write!(f, "{e}"),
            Self::Disconnected => write!(f, "signaling client disconnected"),
            Self::Timeout => write!(f, "signaling send timed out"),
        }
    }
}

impl std::error::Error for SignalingClientError {}

impl From<io::Error> for SignalingClientError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ProtoError> for SignalingClientError {
    fn from(e: ProtoError) -> Self {
        Self::Frame(e)
    }
}

impl From<tungstenite::Error> for SignalingClientError {
    fn from(e: tungstenite::Error) -> Self {
        match e {
            tungstenite::Error::Io(io_e) => Self::Io(io_e),
            tungstenite::Error::Tls(tls_e) => Self::Tls(tls_e.to_string()),
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                Self::Disconnected
            }
            other => Self::WebSocket(other.to_string()),
        }
    }
}
