use crate::core::session_error::SessionError;

/// Notifications from a running session. Called on the negotiation worker
/// thread; implementations must not block for long.
pub trait SessionObserver: Send + Sync {
    fn on_connected(&self);
    /// The session has already been torn down when this is called.
    fn on_error(&self, error: &SessionError);
}

#[derive(Debug, Clone, Default)]
pub struct NoopSessionObserver;

impl SessionObserver for NoopSessionObserver {
    fn on_connected(&self) {}
    fn on_error(&self, _error: &SessionError) {}
}
