use crate::error::RtcError;
use crate::transport::TransportEvent;
use async_trait::async_trait;
use bytes::Bytes;
use rendezvous_core::{IceCandidate, PeerId, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One data channel on a peer connection.
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    fn label(&self) -> &str;

    async fn send(&self, data: Bytes) -> Result<(), RtcError>;

    async fn close(&self) -> Result<(), RtcError>;
}

/// One peer connection inside the real-time transport engine.
///
/// SDP generation, ICE and DTLS all happen behind this trait; the negotiation
/// engine only sequences the calls.
#[async_trait]
pub trait RtcPeer: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, RtcError>;

    async fn create_answer(&self) -> Result<SessionDescription, RtcError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), RtcError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), RtcError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), RtcError>;

    async fn create_data_channel(&self, label: &str) -> Result<Arc<dyn ChannelHandle>, RtcError>;

    async fn close(&self) -> Result<(), RtcError>;
}

/// Factory for peer connections. Every connection reports its notifications
/// on `events`, tagged with `peer_id`.
#[async_trait]
pub trait RtcConnector: Send + Sync {
    async fn connect(
        &self,
        peer_id: PeerId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn RtcPeer>, RtcError>;
}
