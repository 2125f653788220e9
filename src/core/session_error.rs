use std::fmt;

use crate::{
    media::media_error::MediaError,
    signaling_client::{
        protocol::ProtoError, signaling_client_error::SignalingClientError,
        signaling_event::SignalingFault,
    },
};

/// Why a session did not start, or why it ended.
///
/// `Configuration`, `Device`, `SignalingConnect`, `AlreadyRunning` and
/// `Cancelled` are returned from `start`; the session never came up.
/// `Protocol`, `Transport` and `Negotiation` end a running session and reach the
/// observer through `on_error`.
#[derive(Debug)]
pub enum SessionError {
    /// A required setting is missing; names the key.
    Configuration(String),
    Device(MediaError),
    SignalingConnect(SignalingClientError),
    Protocol(String),
    Transport(String),
    Negotiation(MediaError),
    AlreadyRunning,
    /// `stop` was called while `start` was still in progress.
    Cancelled,
}

impl SessionError {
    /// True for kinds that end an established session.
    #[must_use]
    pub const fn is_in_session(&self) -> bool {
        matches!(
            self,
            Self::Protocol(_) | Self::Transport(_) | Self::Negotiation(_)
        )
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(key) => write!(f, "missing configuration value: {key}"),
            Self::Device(e) => write!(f, "{e}"),
            Self::SignalingConnect(e) => write!(f, "cannot reach signaling server: {e}"),
            Self::Protocol(s) => write!(f, "{s}"),
            Self::Transport(s) => write!(f, "{s}"),
            Self::Negotiation(e) => write!(f, "negotiation failed: {e}"),
            Self::AlreadyRunning => write!(f, "a session is already running"),
            Self::Cancelled => write!(f, "start cancelled"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Device(e) | Self::Negotiation(e) => Some(e),
            Self::SignalingConnect(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProtoError> for SessionError {
    fn from(e: ProtoError) -> Self {
        Self::Protocol(e.to_string())
    }
}

impl From<SignalingFault> for SessionError {
    fn from(fault: SignalingFault) -> Self {
        match fault {
            SignalingFault::Protocol(e) => e.into(),
            SignalingFault::Transport(_) => Self::Transport(fault.to_string()),
        }
    }
}
