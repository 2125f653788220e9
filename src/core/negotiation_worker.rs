use std::sync::{
    Arc,
    mpsc::{Receiver, Sender},
};

use crate::{
    core::{
        events::EngineEvent, negotiation_state::NegotiationState,
        orchestrator::SessionDeps, session_error::SessionError, session_shared::SessionShared,
    },
    media::{
        LocalVideo, NegotiationDirection, PeerEvent, PeerEventSender, PeerSession,
        PeerSessionConfig,
    },
    signaling_client::{
        SignalingChannel, SignalingEvent,
        protocol::{AcceptPayload, IceCandidateDescriptor, ProtoError, SdpDescriptor, SdpKind},
    },
    sink_debug, sink_error, sink_info, sink_trace, sink_warn,
};

/// Owns every resource of one live session and applies events to it one at a
/// time on the `negotiation-worker` thread.
pub(super) struct NegotiationWorker {
    direction: NegotiationDirection,
    deps: SessionDeps,
    shared: Arc<SessionShared>,
    inbox: Receiver<EngineEvent>,
    /// Cloned into the `PeerEventSender` handed to the engine.
    events: Sender<EngineEvent>,
    signaling: Option<SignalingChannel>,
    local: Option<LocalVideo>,
    peer: Option<Box<dyn PeerSession>>,
}

impl NegotiationWorker {
    pub(super) fn new(
        direction: NegotiationDirection,
        deps: SessionDeps,
        shared: Arc<SessionShared>,
        inbox: (Sender<EngineEvent>, Receiver<EngineEvent>),
        signaling: SignalingChannel,
        local: Option<LocalVideo>,
    ) -> Self {
        Self {
            direction,
            deps,
            shared,
            events: inbox.0,
            inbox: inbox.1,
            signaling: Some(signaling),
            local,
            peer: None,
        }
    }

    pub(super) fn run(mut self) {
        if self.shared.is_cancelled() {
            self.finish(None);
            return;
        }

        while let Ok(ev) = self.inbox.recv() {
            let outcome = match ev {
                EngineEvent::Stop => break,
                EngineEvent::Signaling(ev) => self.on_signaling(ev),
                EngineEvent::Peer(ev) => self.on_peer(ev),
            };
            if let Err(e) = outcome {
                self.finish(Some(e));
                return;
            }
        }
        self.finish(None);
    }

    fn on_signaling(&mut self, ev: SignalingEvent) -> Result<(), SessionError> {
        match ev {
            SignalingEvent::RegisterAccepted(accept) => self.on_accept(&accept),
            SignalingEvent::Sdp(sdp) => self.on_remote_sdp(&sdp),
            SignalingEvent::Candidate(c) => {
                self.on_remote_candidate(&c);
                Ok(())
            }
            SignalingEvent::Error(fault) => Err(fault.into()),
        }
    }

    fn on_accept(&mut self, accept: &AcceptPayload) -> Result<(), SessionError> {
        let logger = &self.deps.logger;
        if self.shared.state() != NegotiationState::AwaitingAccept {
            sink_warn!(logger, "[NEG] duplicate accept ignored");
            return Ok(());
        }
        sink_info!(
            logger,
            "[NEG] accepted: connection={} existClient={} servers={}",
            accept.connection_id,
            accept.is_exist_client,
            accept.ice_servers.len()
        );
        if accept.ice_servers.is_empty() {
            return Err(ProtoError::InvalidAccept("empty iceServers".into()).into());
        }

        let config = PeerSessionConfig::from_ice_servers(&accept.ice_servers);
        let session = self
            .deps
            .engine
            .create_peer_session(config, PeerEventSender::new(self.events.clone()))
            .map_err(SessionError::Negotiation)?;
        // owned from here on, so teardown disposes it even if setup fails below
        let peer = self.peer.insert(session);
        peer.initialize().map_err(SessionError::Negotiation)?;

        let local_track = if self.direction.sends() {
            self.local.as_ref().map(LocalVideo::track)
        } else {
            None
        };
        peer.add_video_transceiver(self.direction, local_track)
            .map_err(SessionError::Negotiation)?;
        self.shared.set_state(NegotiationState::Negotiating);
        sink_debug!(logger, "[NEG] video transceiver added ({})", self.direction);

        if accept.is_exist_client {
            sink_info!(logger, "[NEG] remote peer present, creating offer");
            peer.create_offer().map_err(SessionError::Negotiation)?;
        } else {
            sink_info!(logger, "[NEG] waiting for remote offer");
        }
        Ok(())
    }

    fn on_remote_sdp(&mut self, sdp: &SdpDescriptor) -> Result<(), SessionError> {
        let Some(peer) = self.peer.as_mut() else {
            return Err(SessionError::Protocol(format!(
                "Protocol Error ({} before accept)",
                sdp.kind
            )));
        };
        sink_info!(self.deps.logger, "[NEG] remote {} received", sdp.kind);
        peer.set_remote_description(sdp)
            .map_err(SessionError::Negotiation)?;
        if sdp.kind == SdpKind::Offer {
            peer.create_answer().map_err(SessionError::Negotiation)?;
        }
        Ok(())
    }

    // The engine tolerates candidates that arrive before the remote description,
    // so nothing is buffered here.
    fn on_remote_candidate(&mut self, candidate: &IceCandidateDescriptor) {
        let logger = &self.deps.logger;
        let Some(peer) = self.peer.as_mut() else {
            sink_warn!(logger, "[NEG] candidate before accept dropped");
            return;
        };
        sink_trace!(logger, "[NEG] remote candidate {}", candidate.content);
        if let Err(e) = peer.add_ice_candidate(candidate) {
            sink_warn!(logger, "[NEG] {e}");
        }
    }

    fn on_peer(&mut self, ev: PeerEvent) -> Result<(), SessionError> {
        let logger = &self.deps.logger;
        let (Some(peer), Some(signaling)) = (self.peer.as_mut(), self.signaling.as_ref()) else {
            sink_trace!(logger, "[NEG] late engine event dropped: {ev:?}");
            return Ok(());
        };

        match ev {
            PeerEvent::IceCandidateReady(c) => {
                // failure already logged by the channel; a dead socket ends the
                // session through its own transport error
                let _ = signaling.send_ice_candidate(&c);
            }
            PeerEvent::LocalSdpReady(sdp) => {
                sink_info!(logger, "[NEG] sending local {}", sdp.kind);
                signaling.send_sdp(&sdp).map_err(|e| {
                    SessionError::Transport(format!("cannot send {}: {e}", sdp.kind))
                })?;
            }
            PeerEvent::Connected => {
                if self.shared.state() != NegotiationState::Connected {
                    self.shared.set_state(NegotiationState::Connected);
                    sink_info!(logger, "[NEG] connected");
                    self.deps.observer.on_connected();
                }
            }
            PeerEvent::VideoTrackAdded(id) => {
                sink_info!(logger, "[NEG] remote video track {id}");
                if let Err(e) = peer.attach_remote_video(&id, Arc::clone(&self.deps.remote_frames))
                {
                    sink_warn!(logger, "[NEG] {e}");
                }
            }
            PeerEvent::AudioTrackAdded(id) => {
                sink_info!(logger, "[NEG] remote audio track {id} muted");
                if let Err(e) = peer.set_remote_audio_output(&id, false) {
                    sink_warn!(logger, "[NEG] {e}");
                }
            }
            PeerEvent::IceStateChanged(state) => {
                sink_info!(logger, "[NEG] ice connection state {state:?}");
            }
            PeerEvent::IceGatheringStateChanged(state) => {
                sink_debug!(logger, "[NEG] ice gathering state {state:?}");
            }
            PeerEvent::RenegotiationNeeded => {
                sink_info!(logger, "[NEG] renegotiation needed (not acted on)");
            }
        }
        Ok(())
    }

    fn finish(&mut self, error: Option<SessionError>) {
        self.teardown();
        self.shared.end();

        match error {
            None => {
                self.shared.set_state(NegotiationState::Idle);
                sink_info!(self.deps.logger, "[NEG] session stopped");
            }
            Some(e) => {
                self.shared.set_state(NegotiationState::Closed);
                sink_error!(self.deps.logger, "[NEG] session closed: {e}");
                self.deps.observer.on_error(&e);
            }
        }
    }

    fn teardown(&mut self) {
        self.release();
        self.deps.local_frames.clear();
        self.deps.remote_frames.clear();
    }

    /// Media session, then local track and device, then signaling. Safe to repeat.
    fn release(&mut self) {
        if let Some(mut peer) = self.peer.take() {
            peer.dispose();
        }
        if let Some(local) = self.local.take() {
            local.dispose();
        }
        if let Some(mut signaling) = self.signaling.take() {
            signaling.close();
        }
    }
}

// Only reached with resources still held when the thread never started.
impl Drop for NegotiationWorker {
    fn drop(&mut self) {
        self.release();
    }
}
