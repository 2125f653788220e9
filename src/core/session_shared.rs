use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc::Sender};

use crate::core::{events::EngineEvent, negotiation_state::NegotiationState};

/// State visible to both the orchestrator (caller side) and its worker.
#[derive(Debug)]
pub(crate) struct SessionShared {
    state: Mutex<NegotiationState>,
    control: Mutex<Control>,
}

/// Lifecycle of the current attempt. A stop request only lands while an
/// attempt is active, so a handle used between sessions cannot cancel the
/// next one.
#[derive(Debug, Default)]
struct Control {
    active: bool,
    /// Checked by `start` between blocking steps and by the worker on entry.
    cancelled: bool,
    /// Sender side of the live worker's inbox.
    inbox: Option<Sender<EngineEvent>>,
}

impl SessionShared {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(NegotiationState::Idle),
            control: Mutex::new(Control::default()),
        })
    }

    pub(crate) fn state(&self) -> NegotiationState {
        *lock(&self.state)
    }

    pub(crate) fn set_state(&self, state: NegotiationState) {
        *lock(&self.state) = state;
    }

    /// Opens a new attempt with a clean cancel flag and the worker's inbox.
    pub(crate) fn begin(&self, inbox: Sender<EngineEvent>) {
        *lock(&self.control) = Control {
            active: true,
            cancelled: false,
            inbox: Some(inbox),
        };
    }

    /// Closes the attempt; later stop requests are no-ops until `begin`.
    pub(crate) fn end(&self) {
        *lock(&self.control) = Control::default();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        lock(&self.control).cancelled
    }

    /// Flags the stop and wakes the worker if one is listening. Flag and inbox
    /// are read under one lock, so a worker spawned after this call still
    /// sees the flag.
    pub(crate) fn request_stop(&self) {
        let mut control = lock(&self.control);
        if !control.active {
            return;
        }
        control.cancelled = true;
        if let Some(tx) = control.inbox.as_ref() {
            let _ = tx.send(EngineEvent::Stop);
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable way to stop a session from another thread, including while
/// `NegotiationOrchestrator::start` is still blocked.
///
/// A request made while no attempt is in progress is dropped.
#[derive(Debug, Clone)]
pub struct StopHandle {
    pub(crate) shared: Arc<SessionShared>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.shared.request_stop();
    }
}
