use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    config::Config,
    core::{
        NegotiationOrchestrator, NegotiationState, SessionDeps, SessionError, SessionObserver,
        StopHandle,
    },
    log::LogSink,
    media::{FrameSlot, MediaEngine, NegotiationDirection, VideoFrame},
    signaling_client::{SignalingConnector, WsConnector, protocol::SignalingContext},
    sink_info, sink_warn,
};

/// Control surface for the presentation layer.
///
/// All methods take `&self` and may be called from any thread. Each `start`
/// builds a fresh [`NegotiationOrchestrator`]; `on_connected`/`on_error` reach the
/// observer given at construction. Frame accessors never block on the session.
pub struct SessionFacade {
    deps: SessionDeps,
    context: SignalingContext,
    session: Mutex<Option<NegotiationOrchestrator>>,
    /// Present while a `start` call is in progress.
    starting: Mutex<Option<StopHandle>>,
}

impl SessionFacade {
    pub fn new(
        engine: Arc<dyn MediaEngine>,
        connector: Arc<dyn SignalingConnector>,
        context: SignalingContext,
        observer: Arc<dyn SessionObserver>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            deps: SessionDeps {
                engine,
                connector,
                observer,
                local_frames: Arc::new(FrameSlot::new()),
                remote_frames: Arc::new(FrameSlot::new()),
                logger,
            },
            context,
            session: Mutex::new(None),
            starting: Mutex::new(None),
        }
    }

    /// Builds a facade that talks WebSocket to the server named in `config`.
    ///
    /// # Errors
    /// `Configuration` when a signaling key is missing or the `[TLS]` CA is unusable.
    pub fn from_config(
        config: &Config,
        engine: Arc<dyn MediaEngine>,
        observer: Arc<dyn SessionObserver>,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, SessionError> {
        let context = SignalingContext::from_config(config)?;
        let connector = WsConnector::from_config(config)
            .map_err(|e| SessionError::Configuration(format!("signaling transport ({e})")))?;
        Ok(Self::new(
            engine,
            Arc::new(connector),
            context,
            observer,
            logger,
        ))
    }

    /// Starts a session. Blocks through camera start, connect and register.
    ///
    /// # Errors
    /// See [`NegotiationOrchestrator::start`]. On error nothing is left running.
    pub fn try_start(&self, direction: NegotiationDirection) -> Result<(), SessionError> {
        let (mut orchestrator, previous) = {
            let mut starting = lock(&self.starting);
            if starting.is_some() {
                return Err(SessionError::AlreadyRunning);
            }
            let mut session = lock(&self.session);
            if session
                .as_ref()
                .is_some_and(NegotiationOrchestrator::is_live)
            {
                return Err(SessionError::AlreadyRunning);
            }
            let orchestrator = NegotiationOrchestrator::new(self.deps.clone());
            *starting = Some(orchestrator.stop_handle());
            (orchestrator, session.take())
        };
        // a session that ended on an error; dropping it reaps its worker
        drop(previous);

        let result = orchestrator.start(direction, &self.context);

        let mut starting = lock(&self.starting);
        let cancelled = starting.take().is_none();
        match result {
            Ok(()) if !cancelled => {
                *lock(&self.session) = Some(orchestrator);
                Ok(())
            }
            Ok(()) => {
                drop(starting);
                orchestrator.stop();
                Err(SessionError::Cancelled)
            }
            Err(e) => Err(e),
        }
    }

    /// `try_start` reduced to success or failure; the cause is logged.
    pub fn start(&self, direction: NegotiationDirection) -> bool {
        match self.try_start(direction) {
            Ok(()) => true,
            Err(e) => {
                sink_warn!(self.deps.logger, "[APP] start failed: {e}");
                false
            }
        }
    }

    /// Stops whatever is running or starting. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = lock(&self.starting).take() {
            sink_info!(self.deps.logger, "[APP] stop requested during start");
            handle.request_stop();
        }
        // released before joining; the worker may call back into the facade
        let session = lock(&self.session).take();
        if let Some(mut orchestrator) = session {
            orchestrator.stop();
        }
    }

    #[must_use]
    pub fn poll_local_frame(&self) -> Option<VideoFrame> {
        self.deps.local_frames.take_and_clear()
    }

    #[must_use]
    pub fn poll_remote_frame(&self) -> Option<VideoFrame> {
        self.deps.remote_frames.take_and_clear()
    }

    #[must_use]
    pub fn state(&self) -> NegotiationState {
        lock(&self.session)
            .as_ref()
            .map_or(NegotiationState::Idle, NegotiationOrchestrator::state)
    }

    /// True from a successful start until stop or a terminal error.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state().is_live()
    }

    #[must_use]
    pub fn context(&self) -> &SignalingContext {
        &self.context
    }
}

impl Drop for SessionFacade {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
