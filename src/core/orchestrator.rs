use std::{
    sync::{Arc, mpsc},
    thread::{self, JoinHandle},
};

use crate::{
    core::{
        negotiation_state::NegotiationState,
        negotiation_worker::NegotiationWorker,
        session_error::SessionError,
        session_observer::SessionObserver,
        session_shared::{SessionShared, StopHandle},
    },
    log::LogSink,
    media::{FrameSlot, LocalVideo, MediaEngine, NegotiationDirection},
    signaling_client::{
        SignalingChannel, SignalingClientError, SignalingConnector, protocol::SignalingContext,
    },
    sink_info, sink_warn,
};

/// Collaborators injected into every session.
#[derive(Clone)]
pub struct SessionDeps {
    pub engine: Arc<dyn MediaEngine>,
    pub connector: Arc<dyn SignalingConnector>,
    pub observer: Arc<dyn SessionObserver>,
    /// Camera preview, written by the engine.
    pub local_frames: Arc<FrameSlot>,
    /// Decoded remote video, written by the engine.
    pub remote_frames: Arc<FrameSlot>,
    pub logger: Arc<dyn LogSink>,
}

/// Drives one session from registration to a connected peer session and back.
///
/// `start` runs the blocking part (camera, connect, register) on the caller's
/// thread. Everything after that happens on a `negotiation-worker` thread that
/// owns the signaling channel and the peer session and consumes signaling and
/// engine events from one queue, so no two state changes overlap.
pub struct NegotiationOrchestrator {
    deps: SessionDeps,
    shared: Arc<SessionShared>,
    worker: Option<JoinHandle<()>>,
}

impl NegotiationOrchestrator {
    #[must_use]
    pub fn new(deps: SessionDeps) -> Self {
        Self {
            deps,
            shared: SessionShared::new(),
            worker: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> NegotiationState {
        self.shared.state()
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.shared.state().is_live()
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Acquires the camera if `direction` sends, connects, registers and hands
    /// the session to the worker in `AwaitingAccept`.
    ///
    /// On any error nothing is left running and the state is unchanged.
    ///
    /// # Errors
    /// `AlreadyRunning` if a session is live, `Device` or `SignalingConnect` if a
    /// setup step failed, `Cancelled` if a stop was requested meanwhile.
    pub fn start(
        &mut self,
        direction: NegotiationDirection,
        ctx: &SignalingContext,
    ) -> Result<(), SessionError> {
        let logger = Arc::clone(&self.deps.logger);
        if self.is_live() {
            sink_warn!(logger, "[NEG] start ignored, session is {}", self.state());
            return Err(SessionError::AlreadyRunning);
        }
        self.reap_worker();
        sink_info!(logger, "[NEG] starting {direction} session in room {}", ctx.room_id());

        let (tx, rx) = mpsc::channel();
        self.shared.begin(tx.clone());

        let local = if direction.sends() {
            match LocalVideo::acquire(
                self.deps.engine.as_ref(),
                Arc::clone(&self.deps.local_frames),
                &logger,
            ) {
                Ok(local) => Some(local),
                Err(e) => {
                    self.abandon(None, None);
                    return Err(SessionError::Device(e));
                }
            }
        } else {
            None
        };
        if self.shared.is_cancelled() {
            self.abandon(local, None);
            return Err(SessionError::Cancelled);
        }

        let signaling = match SignalingChannel::connect(
            self.deps.connector.as_ref(),
            ctx.server_url(),
            tx.clone(),
            Arc::clone(&logger),
        ) {
            Ok(signaling) => signaling,
            Err(e) => {
                self.abandon(local, None);
                return Err(SessionError::SignalingConnect(e));
            }
        };
        if let Err(e) = signaling.send_register(ctx) {
            self.abandon(local, Some(signaling));
            return Err(SessionError::SignalingConnect(e));
        }
        if self.shared.is_cancelled() {
            self.abandon(local, Some(signaling));
            return Err(SessionError::Cancelled);
        }

        self.shared.set_state(NegotiationState::AwaitingAccept);
        let worker = NegotiationWorker::new(
            direction,
            self.deps.clone(),
            Arc::clone(&self.shared),
            (tx, rx),
            signaling,
            local,
        );
        match thread::Builder::new()
            .name("negotiation-worker".into())
            .spawn(move || worker.run())
        {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                // the worker was dropped with the closure and released everything
                self.shared.end();
                self.shared.set_state(NegotiationState::Idle);
                Err(SessionError::SignalingConnect(SignalingClientError::Io(e)))
            }
        }
    }

    /// Tears the session down without reporting an error. Safe in any state and
    /// safe to repeat; from the worker thread itself it only queues the request.
    pub fn stop(&mut self) {
        self.shared.request_stop();
        if let Some(handle) = self.worker.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            let _ = handle.join();
        }
        if self.shared.state() == NegotiationState::Closed {
            self.shared.set_state(NegotiationState::Idle);
        }
    }

    /// Releases what a failed `start` had acquired, in teardown order.
    fn abandon(&self, local: Option<LocalVideo>, signaling: Option<SignalingChannel>) {
        if let Some(local) = local {
            local.dispose();
        }
        if let Some(mut signaling) = signaling {
            signaling.close();
        }
        self.deps.local_frames.clear();
        self.shared.end();
    }

    /// Joins a worker that already ended on its own.
    fn reap_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for NegotiationOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}
