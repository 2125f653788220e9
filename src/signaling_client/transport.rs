use crate::signaling_client::signaling_client_error::SignalingClientError;

/// Outcome of one bounded read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportRead {
    Text(String),
    /// Nothing arrived within the poll interval (or a non-text frame was skipped).
    Idle,
    /// The peer closed the connection, with its reason if one was given.
    Closed(Option<String>),
}

/// A persistent, message-oriented connection to the signaling server.
///
/// `read` must return within a short poll interval so the owning network
/// thread can interleave writes.
pub trait SignalingTransport: Send {
    /// # Errors
    /// Any transport failure other than "nothing yet".
    fn read(&mut self) -> Result<TransportRead, SignalingClientError>;

    /// # Errors
    /// The frame could not be written.
    fn write_text(&mut self, text: &str) -> Result<(), SignalingClientError>;

    /// Best-effort close; must be safe to call more than once.
    fn close(&mut self);
}

/// Opens transports. Blocks until the connection is open or has failed.
pub trait SignalingConnector: Send + Sync {
    /// # Errors
    /// The server is unreachable or the handshake failed.
    fn connect(&self, url: &str) -> Result<Box<dyn SignalingTransport>, SignalingClientError>;
}
