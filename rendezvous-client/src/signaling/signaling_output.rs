use crate::error::ConnectionError;
use async_trait::async_trait;
use rendezvous_core::SignalMessage;

/// Outbound half of the signaling connection as seen by the negotiation engine
/// and the session coordinator.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Encode and deliver one message to the server.
    async fn send_signal(&self, msg: SignalMessage) -> Result<(), ConnectionError>;
}
