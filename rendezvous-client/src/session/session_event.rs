use crate::error::{NegotiationError, SessionError};
use crate::session::ModerationNotice;
use bytes::Bytes;
use rendezvous_core::PeerId;

/// Everything the session reports to its consumer, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The signaling connection is open.
    Connected,

    Joined { peer_amount: u32 },

    PeerJoined(PeerId),

    PeerLeft(PeerId),

    NegotiationReady(PeerId),

    NegotiationFailed {
        peer_id: PeerId,
        reason: NegotiationError,
    },

    ChannelOpened { peer_id: PeerId, label: String },

    ChannelClosed { peer_id: PeerId, label: String },

    /// Application bytes received on a data channel.
    Data {
        peer_id: PeerId,
        label: String,
        data: Bytes,
    },

    Moderation(ModerationNotice),

    /// The session ended on the server's word (no such session, kicked).
    SessionFailed(SessionError),

    /// The signaling connection is gone.
    Disconnected,
}
