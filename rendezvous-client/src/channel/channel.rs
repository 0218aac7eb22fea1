use crate::transport::ChannelHandle;
use rendezvous_core::PeerId;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

/// Read/write capability granted by the coordinating server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            read: true,
            write: true,
        }
    }
}

/// One labelled data channel on a peer connection.
pub struct Channel {
    label: String,
    peer_id: PeerId,
    state: ChannelState,
    permissions: Permissions,
    muted: bool,
    handle: Arc<dyn ChannelHandle>,
}

impl Channel {
    pub(crate) fn new(peer_id: PeerId, handle: Arc<dyn ChannelHandle>) -> Self {
        Self {
            label: handle.label().to_string(),
            peer_id,
            state: ChannelState::Connecting,
            permissions: Permissions::default(),
            muted: false,
            handle,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    pub(crate) fn handle(&self) -> &Arc<dyn ChannelHandle> {
        &self.handle
    }

    pub(crate) fn set_state(&mut self, state: ChannelState) {
        self.state = state;
    }

    pub(crate) fn permissions_mut(&mut self) -> &mut Permissions {
        &mut self.permissions
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("label", &self.label)
            .field("peer_id", &self.peer_id)
            .field("state", &self.state)
            .field("permissions", &self.permissions)
            .field("muted", &self.muted)
            .finish()
    }
}
