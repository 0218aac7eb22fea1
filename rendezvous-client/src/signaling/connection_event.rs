use crate::error::ConnectionError;
use rendezvous_core::{CodecError, SignalMessage};

/// Notifications pushed by the signaling transport, in arrival order.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// The handshake completed and the connection is open.
    Opened,

    /// One inbound frame, already run through the codec.
    Received(Result<SignalMessage, CodecError>),

    /// The connection closed, locally or by the server.
    Closed,

    /// The connection failed while open.
    Error(ConnectionError),
}
