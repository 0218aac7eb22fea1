use crate::channel::{Channel, ChannelState};
use crate::error::ChannelError;
use crate::transport::{ChannelHandle, RtcPeer};
use bytes::Bytes;
use rendezvous_core::PeerId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

type ChannelKey = (PeerId, String);

fn key(peer_id: &PeerId, label: &str) -> ChannelKey {
    (peer_id.clone(), label.to_string())
}

/// Data channels of a session. A label is unique within one peer connection,
/// so channels are keyed by peer and label.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<ChannelKey, Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask `peer` for a new channel and track it as connecting.
    pub async fn open(
        &mut self,
        peer_id: PeerId,
        label: &str,
        peer: &dyn RtcPeer,
    ) -> Result<(), ChannelError> {
        let key = key(&peer_id, label);
        if self.channels.contains_key(&key) {
            return Err(ChannelError::AlreadyExists {
                label: label.to_string(),
            });
        }

        let handle = peer.create_data_channel(label).await?;
        debug!("Data channel '{}' requested on {}", label, peer_id);
        self.channels.insert(key, Channel::new(peer_id, handle));
        Ok(())
    }

    /// Track a channel the remote side created. Returns `false` when that peer
    /// already has a channel with the same label.
    pub fn register_remote(&mut self, peer_id: PeerId, handle: Arc<dyn ChannelHandle>) -> bool {
        let key = key(&peer_id, handle.label());
        if self.channels.contains_key(&key) {
            debug!("Channel '{}' from {} already tracked", key.1, peer_id);
            return false;
        }
        self.channels.insert(key, Channel::new(peer_id, handle));
        true
    }

    /// The collaborator reported the channel open.
    pub fn mark_open(&mut self, peer_id: &PeerId, label: &str) -> bool {
        match self.channels.get_mut(&key(peer_id, label)) {
            Some(channel) if channel.state() == ChannelState::Connecting => {
                channel.set_state(ChannelState::Open);
                info!("Data channel '{}' open with {}", label, peer_id);
                true
            }
            Some(_) => false,
            None => {
                debug!(
                    "Open notification for unknown channel '{}' of {}",
                    label, peer_id
                );
                false
            }
        }
    }

    /// The collaborator reported the channel closed. Drops it from the registry.
    pub fn mark_closed(&mut self, peer_id: &PeerId, label: &str) -> bool {
        match self.channels.remove(&key(peer_id, label)) {
            Some(_) => {
                info!("Data channel '{}' with {} closed", label, peer_id);
                true
            }
            None => false,
        }
    }

    /// Close one channel locally. Closing an unknown or already closed channel
    /// is a no-op and yields `false`.
    pub async fn close(&mut self, peer_id: &PeerId, label: &str) -> bool {
        let Some(mut channel) = self.channels.remove(&key(peer_id, label)) else {
            return false;
        };
        channel.set_state(ChannelState::Closed);
        if let Err(e) = channel.handle().close().await {
            warn!("Transport failed closing channel '{}': {}", label, e);
        }
        info!("Data channel '{}' with {} closed locally", label, peer_id);
        true
    }

    /// Close `label` on every peer connection carrying it. Returns the peers
    /// whose channel was closed.
    pub async fn close_label(&mut self, label: &str) -> Vec<PeerId> {
        let peers: Vec<PeerId> = self.peers_with(label).cloned().collect();
        for peer_id in &peers {
            self.close(peer_id, label).await;
        }
        peers
    }

    /// Close every channel riding on `peer_id`'s connection.
    pub async fn close_peer(&mut self, peer_id: &PeerId) -> Vec<String> {
        let labels: Vec<String> = self
            .channels
            .keys()
            .filter(|(owner, _)| owner == peer_id)
            .map(|(_, label)| label.clone())
            .collect();
        for label in &labels {
            self.close(peer_id, label).await;
        }
        labels
    }

    pub async fn close_all(&mut self) -> Vec<(PeerId, String)> {
        let keys: Vec<ChannelKey> = self.channels.keys().cloned().collect();
        for (peer_id, label) in &keys {
            self.close(peer_id, label).await;
        }
        keys
    }

    /// Send on an open channel. The underlying transport is never touched when
    /// the channel is not open.
    pub async fn send(
        &self,
        peer_id: &PeerId,
        label: &str,
        data: Bytes,
    ) -> Result<(), ChannelError> {
        let channel = match self.channels.get(&key(peer_id, label)) {
            Some(channel) if channel.is_open() => channel,
            _ => {
                return Err(ChannelError::NotOpen {
                    label: label.to_string(),
                });
            }
        };
        if !channel.permissions().write {
            return Err(ChannelError::PermissionDenied {
                label: label.to_string(),
            });
        }
        if channel.is_muted() {
            return Err(ChannelError::Muted {
                label: label.to_string(),
            });
        }

        channel.handle().send(data).await?;
        Ok(())
    }

    /// Whether inbound bytes on `peer_id`'s `label` should reach the consumer.
    pub fn accepts(&self, peer_id: &PeerId, label: &str) -> bool {
        match self.channels.get(&key(peer_id, label)) {
            Some(channel) if channel.permissions().read => true,
            Some(_) => {
                debug!("Dropping inbound data on '{}', read permission revoked", label);
                false
            }
            None => {
                debug!(
                    "Dropping inbound data on unknown channel '{}' of {}",
                    label, peer_id
                );
                false
            }
        }
    }

    pub fn is_open(&self, peer_id: &PeerId, label: &str) -> bool {
        self.get(peer_id, label).is_some_and(Channel::is_open)
    }

    pub fn get(&self, peer_id: &PeerId, label: &str) -> Option<&Channel> {
        self.channels.get(&key(peer_id, label))
    }

    /// Peers that have a channel called `label`, in id order.
    pub fn peers_with<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a PeerId> {
        self.channels
            .keys()
            .filter(move |(_, l)| l == label)
            .map(|(peer_id, _)| peer_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Flip read permission on `label`; the server message carries no value.
    /// Every connection's channel of that label ends up with the same flag,
    /// which is returned.
    pub(crate) fn toggle_read(&mut self, label: &str) -> Option<bool> {
        let read = !self.labelled(label).next()?.permissions().read;
        for channel in self.labelled_mut(label) {
            channel.permissions_mut().read = read;
        }
        Some(read)
    }

    pub(crate) fn toggle_write(&mut self, label: &str) -> Option<bool> {
        let write = !self.labelled(label).next()?.permissions().write;
        for channel in self.labelled_mut(label) {
            channel.permissions_mut().write = write;
        }
        Some(write)
    }

    pub(crate) fn set_muted(&mut self, label: &str, muted: bool) -> bool {
        let mut found = false;
        for channel in self.labelled_mut(label) {
            channel.set_muted(muted);
            found = true;
        }
        found
    }

    fn labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Channel> {
        self.channels.values().filter(move |c| c.label() == label)
    }

    fn labelled_mut<'a>(&'a mut self, label: &'a str) -> impl Iterator<Item = &'a mut Channel> {
        self.channels.values_mut().filter(move |c| c.label() == label)
    }
}
