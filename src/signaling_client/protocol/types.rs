use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{TYPE_ANSWER, TYPE_OFFER};

/// Connection parameters for one signaling server.
///
/// All three fields are non-empty; [`SignalingContext::new`] enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingContext {
    server_url: String,
    auth_key: String,
    room_id: String,
}

impl SignalingContext {
    /// Builds a context, rejecting empty values.
    ///
    /// # Errors
    /// Returns the name of the first empty field.
    pub fn new(
        server_url: impl Into<String>,
        auth_key: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Result<Self, &'static str> {
        let ctx = Self {
            server_url: server_url.into(),
            auth_key: auth_key.into(),
            room_id: room_id.into(),
        };
        if ctx.server_url.trim().is_empty() {
            return Err("Url");
        }
        if ctx.auth_key.trim().is_empty() {
            return Err("SigKey");
        }
        if ctx.room_id.trim().is_empty() {
            return Err("RoomId");
        }
        Ok(ctx)
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    #[must_use]
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }
}

/// A STUN/TURN server handed to the media engine as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerDescriptor {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub credential: String,
}

/// Server reply to `register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptPayload {
    pub connection_id: String,
    /// A remote participant is already in the room; we make the offer.
    pub is_exist_client: bool,
    pub is_exist_user: bool,
    pub is_initiator: bool,
    pub ice_servers: Vec<IceServerDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

impl SdpKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offer => TYPE_OFFER,
            Self::Answer => TYPE_ANSWER,
        }
    }

    #[must_use]
    pub fn from_type(value: &str) -> Option<Self> {
        match value {
            TYPE_OFFER => Some(Self::Offer),
            TYPE_ANSWER => Some(Self::Answer),
            _ => None,
        }
    }
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An offer or answer. `content` always holds real CRLF line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpDescriptor {
    pub kind: SdpKind,
    pub content: String,
}

impl SdpDescriptor {
    pub fn offer(content: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            content: content.into(),
        }
    }

    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceCandidateDescriptor {
    pub sdp_mid: String,
    pub sdp_mline_index: u32,
    /// The `candidate:` attribute line.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rejects_each_empty_field() {
        assert_eq!(SignalingContext::new("", "k", "r"), Err("Url"));
        assert_eq!(SignalingContext::new("ws://h", " ", "r"), Err("SigKey"));
        assert_eq!(SignalingContext::new("ws://h", "k", ""), Err("RoomId"));
        let ctx = SignalingContext::new("ws://h", "k", "r").unwrap_or_else(|f| panic!("{f}"));
        assert_eq!(ctx.room_id(), "r");
    }

    #[test]
    fn sdp_kind_maps_wire_names() {
        assert_eq!(SdpKind::from_type("offer"), Some(SdpKind::Offer));
        assert_eq!(SdpKind::from_type("answer"), Some(SdpKind::Answer));
        assert_eq!(SdpKind::from_type("pranswer"), None);
        assert_eq!(SdpKind::Answer.to_string(), "answer");
    }
}
