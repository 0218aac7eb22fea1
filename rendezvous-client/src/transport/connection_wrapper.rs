use crate::error::RtcError;
use crate::transport::{ChannelHandle, RtcConnector, RtcPeer, TransportConfig, TransportEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use rendezvous_core::{IceCandidate, PeerId, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// [`RtcConnector`] backed by the `webrtc` crate.
#[derive(Debug, Clone, Default)]
pub struct WebRtcConnector {
    config: TransportConfig,
}

impl WebRtcConnector {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RtcConnector for WebRtcConnector {
    async fn connect(
        &self,
        peer_id: PeerId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn RtcPeer>, RtcError> {
        let wrapper = ConnectionWrapper::new(peer_id, &self.config, events).await?;
        Ok(Arc::new(wrapper))
    }
}

/// One `RTCPeerConnection` plus the callbacks that forward its notifications
/// to the session loop.
pub struct ConnectionWrapper {
    peer_id: PeerId,
    peer_connection: Arc<RTCPeerConnection>,
    events: mpsc::Sender<TransportEvent>,
}

impl ConnectionWrapper {
    pub async fn new(
        peer_id: PeerId,
        config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                ..Default::default()
            }]
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(RTCConfiguration {
                ice_servers,
                ..Default::default()
            })
            .await
            .context("Failed to create peer connection")?,
        );

        let state_tx = events.clone();
        let uid_state = peer_id.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let uid = uid_state.clone();

                Box::pin(async move {
                    info!("Peer connection state for {}: {:?}", uid, s);
                    if matches!(
                        s,
                        RTCPeerConnectionState::Failed
                            | RTCPeerConnectionState::Disconnected
                            | RTCPeerConnectionState::Closed
                    ) {
                        let _ = tx.send(TransportEvent::Disconnected(uid)).await;
                    }
                })
            },
        ));

        let ice_tx = events.clone();
        let uid_ice = peer_id.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let uid = uid_ice.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx.send(TransportEvent::CandidateGathered(uid, candidate)).await;
            })
        }));

        let dc_tx = events.clone();
        let uid_dc = peer_id.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let uid = uid_dc.clone();

            Box::pin(async move {
                debug!("Remote data channel '{}' announced by {}", dc.label(), uid);
                // announce first so the open notification never precedes it
                let handle: Arc<dyn ChannelHandle> = Arc::new(DataChannelWrapper::new(dc.clone()));
                let _ = tx.send(TransportEvent::ChannelAnnounced(uid.clone(), handle)).await;
                wire_channel(&uid, &dc, &tx);
            })
        }));

        Ok(Self {
            peer_id,
            peer_connection,
            events,
        })
    }
}

#[async_trait]
impl RtcPeer for ConnectionWrapper {
    async fn create_offer(&self) -> Result<SessionDescription, RtcError> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, RtcError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), RtcError> {
        self.peer_connection
            .set_local_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), RtcError> {
        self.peer_connection
            .set_remote_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), RtcError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            ..Default::default()
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn create_data_channel(&self, label: &str) -> Result<Arc<dyn ChannelHandle>, RtcError> {
        let dc = self.peer_connection.create_data_channel(label, None).await?;
        wire_channel(&self.peer_id, &dc, &self.events);
        Ok(Arc::new(DataChannelWrapper::new(dc)))
    }

    async fn close(&self) -> Result<(), RtcError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn to_rtc_description(desc: SessionDescription) -> Result<RTCSessionDescription, RtcError> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(rtc)
}

/// Forward open/message/close notifications of `dc` as [`TransportEvent`]s.
fn wire_channel(peer_id: &PeerId, dc: &Arc<RTCDataChannel>, events: &mpsc::Sender<TransportEvent>) {
    let label = dc.label().to_owned();

    let tx_open = events.clone();
    let uid_open = peer_id.clone();
    let label_open = label.clone();
    dc.on_open(Box::new(move || {
        let tx = tx_open.clone();
        let uid = uid_open.clone();
        let label = label_open.clone();
        Box::pin(async move {
            info!("Data channel '{}' open for {}", label, uid);
            let _ = tx.send(TransportEvent::ChannelOpened(uid, label)).await;
        })
    }));

    let tx_msg = events.clone();
    let uid_msg = peer_id.clone();
    let label_msg = label.clone();
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = tx_msg.clone();
        let uid = uid_msg.clone();
        let label = label_msg.clone();
        Box::pin(async move {
            let _ = tx.send(TransportEvent::Message(uid, label, msg.data)).await;
        })
    }));

    let tx_close = events.clone();
    let uid_close = peer_id.clone();
    dc.on_close(Box::new(move || {
        let tx = tx_close.clone();
        let uid = uid_close.clone();
        let label = label.clone();
        Box::pin(async move {
            debug!("Data channel '{}' closed for {}", label, uid);
            let _ = tx.send(TransportEvent::ChannelClosed(uid, label)).await;
        })
    }));
}

pub struct DataChannelWrapper {
    label: String,
    channel: Arc<RTCDataChannel>,
}

impl DataChannelWrapper {
    fn new(channel: Arc<RTCDataChannel>) -> Self {
        Self {
            label: channel.label().to_owned(),
            channel,
        }
    }
}

#[async_trait]
impl ChannelHandle for DataChannelWrapper {
    fn label(&self) -> &str {
        &self.label
    }

    async fn send(&self, data: Bytes) -> Result<(), RtcError> {
        let written = self.channel.send(&data).await?;
        if written < data.len() {
            warn!(
                "Short write on data channel '{}': {} of {} bytes",
                self.label,
                written,
                data.len()
            );
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), RtcError> {
        self.channel.close().await?;
        Ok(())
    }
}
