//! Signaling client: joins a relay session, negotiates peer connections over
//! it and exposes the resulting data channels.

pub mod channel;
pub mod config;
pub mod error;
pub mod negotiation;
pub mod session;
pub mod signaling;
pub mod transport;

#[cfg(test)]
mod mock;

pub use channel::{Channel, ChannelRegistry, ChannelState, Permissions};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ChannelError, ConnectionError, NegotiationError, RtcError, SessionError};
pub use negotiation::{CandidateDisposition, Negotiation, NegotiationPhase, Role, Transition};
pub use session::{
    ModerationAction, ModerationNotice, ModerationRequest, Session, SessionClient,
    SessionCoordinator, SessionEvent, SessionEvents, SessionHandle,
};
pub use signaling::{ConnectionState, Dialer, RetryPolicy, SignalingTransport, WsDialer};
pub use transport::{ChannelHandle, RtcConnector, RtcPeer, WebRtcConnector};
