use rendezvous_core::{PeerId, SessionId};
use std::collections::HashSet;

/// A joined session as seen from the local peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    local_peer: PeerId,
    remote_peers: HashSet<PeerId>,
}

impl Session {
    pub fn new(id: SessionId, local_peer: PeerId) -> Self {
        Self {
            id,
            local_peer,
            remote_peers: HashSet::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn local_peer(&self) -> &PeerId {
        &self.local_peer
    }

    /// Returns `false` for the local peer or an already known one.
    pub(crate) fn add_peer(&mut self, peer_id: PeerId) -> bool {
        if peer_id == self.local_peer {
            return false;
        }
        self.remote_peers.insert(peer_id)
    }

    pub(crate) fn remove_peer(&mut self, peer_id: &PeerId) -> bool {
        self.remote_peers.remove(peer_id)
    }
}
