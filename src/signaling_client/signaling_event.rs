use std::fmt;

use crate::signaling_client::protocol::{
    AcceptPayload, IceCandidateDescriptor, ProtoError, SdpDescriptor,
};

/// What the channel reports to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingEvent {
    RegisterAccepted(AcceptPayload),
    Sdp(SdpDescriptor),
    Candidate(IceCandidateDescriptor),
    Error(SignalingFault),
}

/// Why the channel can no longer be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingFault {
    /// A frame that does not follow the protocol.
    Protocol(ProtoError),
    /// The connection closed or failed underneath us.
    Transport(String),
}

impl fmt::Display for SignalingFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "{e}"),
            Self::Transport(reason) => write!(f, "signaling connection lost: {reason}"),
        }
    }
}
