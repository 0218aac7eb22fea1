use crate::transport::ChannelHandle;
use bytes::Bytes;
use rendezvous_core::{IceCandidate, PeerId};
use std::fmt;
use std::sync::Arc;

/// Events the real-time transport raises for the session loop.
pub enum TransportEvent {
    /// The remote side created a data channel on this peer connection.
    ChannelAnnounced(PeerId, Arc<dyn ChannelHandle>),

    /// A data channel finished its handshake and can carry data.
    ChannelOpened(PeerId, String),

    /// A data channel closed, locally or remotely.
    ChannelClosed(PeerId, String),

    /// Application data arrived on a data channel.
    Message(PeerId, String, Bytes),

    /// A local ICE candidate was gathered and should be sent to the remote side.
    CandidateGathered(PeerId, IceCandidate),

    /// The peer connection failed or was closed.
    Disconnected(PeerId),
}

impl fmt::Debug for TransportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelAnnounced(peer, handle) => f
                .debug_tuple("ChannelAnnounced")
                .field(peer)
                .field(&handle.label())
                .finish(),
            Self::ChannelOpened(peer, label) => {
                f.debug_tuple("ChannelOpened").field(peer).field(label).finish()
            }
            Self::ChannelClosed(peer, label) => {
                f.debug_tuple("ChannelClosed").field(peer).field(label).finish()
            }
            Self::Message(peer, label, data) => f
                .debug_tuple("Message")
                .field(peer)
                .field(label)
                .field(&data.len())
                .finish(),
            Self::CandidateGathered(peer, candidate) => f
                .debug_tuple("CandidateGathered")
                .field(peer)
                .field(candidate)
                .finish(),
            Self::Disconnected(peer) => f.debug_tuple("Disconnected").field(peer).finish(),
        }
    }
}
