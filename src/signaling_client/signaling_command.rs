use std::sync::mpsc::Sender;

use crate::signaling_client::signaling_client_error::SignalingClientError;

/// Requests from the channel handle into its network thread.
#[derive(Debug)]
pub enum SignalingCommand {
    /// Write one text frame and report the outcome on `ack`.
    Send {
        text: String,
        ack: Sender<Result<(), SignalingClientError>>,
    },
    Disconnect,
}
