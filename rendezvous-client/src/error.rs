use crate::signaling::ConnectionState;
use rendezvous_core::{CodecError, PeerId};
use thiserror::Error;

/// Failures of the signaling connection itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("could not connect to {endpoint} after {attempts} attempt(s): {cause}")]
    Connection {
        endpoint: String,
        attempts: u32,
        cause: String,
    },

    #[error("signaling connection is not open (state: {0:?})")]
    NotOpen(ConnectionState),

    #[error("connect is only valid on a fresh transport (state: {0:?})")]
    AlreadyUsed(ConnectionState),

    #[error("signaling connection closed")]
    Closed,

    #[error("signaling i/o error: {0}")]
    Io(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Failures reported by the real-time transport collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RtcError {
    #[error("rtc engine error: {0}")]
    Engine(String),

    #[error("peer connection is closed")]
    Closed,
}

impl From<webrtc::Error> for RtcError {
    fn from(e: webrtc::Error) -> Self {
        Self::Engine(e.to_string())
    }
}

impl From<anyhow::Error> for RtcError {
    fn from(e: anyhow::Error) -> Self {
        Self::Engine(format!("{:#}", e))
    }
}

/// Why one peer's negotiation ended in `Failed`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("malformed SDP from {0}")]
    InvalidSdp(PeerId),

    #[error("remote description rejected: {0}")]
    RemoteDescription(String),

    #[error("local description failed: {0}")]
    LocalDescription(String),

    #[error("expected {expected}, negotiation is in {phase}")]
    OutOfOrder {
        expected: &'static str,
        phase: &'static str,
    },

    #[error("no peer connection attached")]
    NoPeerConnection,

    #[error("could not deliver signaling message: {0}")]
    Signaling(String),

    #[error("peer left while negotiating")]
    PeerLeft,

    #[error("signaling connection closed while negotiating")]
    ConnectionClosed,
}

/// Local misuse of the data channel registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("channel '{label}' is not open")]
    NotOpen { label: String },

    #[error("write permission denied on channel '{label}'")]
    PermissionDenied { label: String },

    #[error("channel '{label}' is muted")]
    Muted { label: String },

    #[error("channel '{label}' already exists")]
    AlreadyExists { label: String },

    #[error("no peer connection available for channel '{label}'")]
    NoPeerConnection { label: String },

    #[error(transparent)]
    Transport(#[from] RtcError),
}

/// Errors surfaced to the consumer of a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session does not exist on the server")]
    NoSession,

    #[error("timed out waiting for join acknowledgment")]
    JoinTimeout,

    #[error("already joined or joining")]
    AlreadyJoined,

    #[error("not joined to a session")]
    NotJoined,

    #[error("removed from the session by {0}")]
    Kicked(PeerId),

    #[error("session closed")]
    Closed,

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
