//! Discriminant values of the `type` field and wire defaults.

pub const TYPE_REGISTER: &str = "register";
pub const TYPE_ACCEPT: &str = "accept";
pub const TYPE_OFFER: &str = "offer";
pub const TYPE_ANSWER: &str = "answer";
pub const TYPE_CANDIDATE: &str = "candidate";
pub const TYPE_PING: &str = "ping";
pub const TYPE_PONG: &str = "pong";

/// Used when an inbound candidate carries no `sdpMid`.
pub const DEFAULT_SDP_MID: &str = "0";
/// Used when an inbound candidate carries no `sdpMLineIndex`.
pub const DEFAULT_SDP_MLINE_INDEX: u32 = 0;
