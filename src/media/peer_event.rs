use std::{fmt, sync::mpsc::Sender};

use crate::{
    core::events::EngineEvent,
    signaling_client::protocol::{IceCandidateDescriptor, SdpDescriptor},
};

/// Opaque id the engine gives a remote track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteTrackId(pub String);

impl fmt::Display for RemoteTrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Failed,
    Disconnected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceGatheringState {
    New,
    Gathering,
    Complete,
}

/// Callbacks from the media engine, in the order the engine raised them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// A local candidate to forward to the remote peer.
    IceCandidateReady(IceCandidateDescriptor),
    /// Result of `create_offer` / `create_answer`.
    LocalSdpReady(SdpDescriptor),
    Connected,
    VideoTrackAdded(RemoteTrackId),
    AudioTrackAdded(RemoteTrackId),
    IceStateChanged(IceConnectionState),
    IceGatheringStateChanged(IceGatheringState),
    RenegotiationNeeded,
}

/// Handed to the engine when a peer session is created. Events go to the
/// orchestrator inbox; after teardown they are silently dropped.
#[derive(Debug, Clone)]
pub struct PeerEventSender {
    tx: Sender<EngineEvent>,
}

impl PeerEventSender {
    #[must_use]
    pub fn new(tx: Sender<EngineEvent>) -> Self {
        Self { tx }
    }

    /// Returns `false` once the session that owned this sender is gone.
    pub fn send(&self, ev: PeerEvent) -> bool {
        self.tx.send(EngineEvent::Peer(ev)).is_ok()
    }
}
