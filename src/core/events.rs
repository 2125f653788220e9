use crate::{media::peer_event::PeerEvent, signaling_client::signaling_event::SignalingEvent};

/// Everything the negotiation worker reacts to, funnelled through one queue so
/// state changes are applied one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Signaling(SignalingEvent),
    Peer(PeerEvent),
    /// Manual stop; tears down without reporting an error.
    Stop,
}
