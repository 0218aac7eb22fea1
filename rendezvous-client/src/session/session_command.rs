use crate::error::SessionError;
use crate::negotiation::NegotiationPhase;
use crate::session::ModerationRequest;
use bytes::Bytes;
use rendezvous_core::{PeerId, SessionId};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

/// Requests from a [`SessionHandle`](crate::SessionHandle) to the dispatch loop.
#[derive(Debug)]
pub enum SessionCommand {
    /// Send `join_session`; answered with the peer count once acknowledged.
    /// Dropping the receiver abandons the join.
    Join {
        session_id: SessionId,
        peer_id: PeerId,
        reply: Reply<u32>,
    },

    Leave { reply: Reply<()> },

    OpenChannel { label: String, reply: Reply<()> },

    CloseChannel { label: String, reply: Reply<bool> },

    Send {
        label: String,
        data: Bytes,
        reply: Reply<()>,
    },

    ChannelOpen {
        label: String,
        reply: oneshot::Sender<bool>,
    },

    Phase {
        peer_id: PeerId,
        reply: oneshot::Sender<Option<NegotiationPhase>>,
    },

    Moderate {
        request: ModerationRequest,
        reply: Reply<()>,
    },

    /// Leave if joined, close everything and stop the loop.
    Shutdown { reply: oneshot::Sender<()> },
}
