//! Client side of the signaling protocol: one persistent WebSocket connection
//! carrying JSON frames between this endpoint and the signaling server.

pub mod protocol;
pub mod signaling_channel;
pub mod signaling_client_error;
pub mod signaling_command;
pub mod signaling_event;
pub mod transport;
pub mod ws_transport;
pub use signaling_channel::SignalingChannel;
pub use signaling_client_error::SignalingClientError;
pub use signaling_event::{SignalingEvent, SignalingFault};
pub use transport::{SignalingConnector, SignalingTransport, TransportRead};
pub use ws_transport::{WsConnector, WsTransport};
