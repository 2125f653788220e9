//! JSON wire protocol spoken with the signaling server.

pub mod codec;
pub mod constants;
pub mod errors;
pub mod msg;
pub mod sdp_text;
pub mod types;

pub use codec::{decode_inbound, encode_outbound};
pub use errors::ProtoError;
pub use msg::{InboundMsg, OutboundMsg};
pub use sdp_text::{escape_line_endings, unescape_line_endings};
pub use types::{
    AcceptPayload, IceCandidateDescriptor, IceServerDescriptor, SdpDescriptor, SdpKind,
    SignalingContext,
};
