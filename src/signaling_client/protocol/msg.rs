use serde::Serialize;

use super::types::{AcceptPayload, IceCandidateDescriptor, SdpDescriptor};

/// Decoded server → client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMsg {
    Accept(AcceptPayload),
    Sdp(SdpDescriptor),
    Candidate(IceCandidateDescriptor),
    Ping,
}

/// Client → server message, serialized with the `type` discriminant inline.
///
/// SDP text is carried with real CRLFs; JSON string escaping puts the
/// two-character `\r\n` sequences on the wire.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMsg<'a> {
    #[serde(rename_all = "camelCase")]
    Register {
        room_id: &'a str,
        client_id: String,
        key: &'a str,
        authn_metadata: AuthnMetadata,
    },
    Candidate {
        ice: IceWire<'a>,
    },
    Offer {
        sdp: &'a str,
    },
    Answer {
        sdp: &'a str,
    },
    Pong,
}

/// Always serialized as `{}`.
#[derive(Debug, Default, Serialize)]
pub struct AuthnMetadata {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IceWire<'a> {
    pub candidate: &'a str,
    pub sdp_mid: &'a str,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: u32,
}

impl<'a> OutboundMsg<'a> {
    #[must_use]
    pub fn candidate(c: &'a IceCandidateDescriptor) -> Self {
        Self::Candidate {
            ice: IceWire {
                candidate: &c.content,
                sdp_mid: &c.sdp_mid,
                sdp_mline_index: c.sdp_mline_index,
            },
        }
    }

    #[must_use]
    pub fn sdp(d: &'a SdpDescriptor) -> Self {
        match d.kind {
            super::types::SdpKind::Offer => Self::Offer { sdp: &d.content },
            super::types::SdpKind::Answer => Self::Answer { sdp: &d.content },
        }
    }

    /// Short name for logs; never includes SDP or candidate text.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Candidate { .. } => "candidate",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::Pong => "pong",
        }
    }
}
