use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::negotiation::NegotiationPhase;
use crate::session::{ModerationRequest, SessionCommand, SessionCoordinator, SessionEvent};
use crate::signaling::{Dialer, SignalingTransport, WsDialer};
use crate::transport::{RtcConnector, WebRtcConnector};
use bytes::Bytes;
use rendezvous_core::{PeerId, SessionId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

const COMMAND_BUFFER: usize = 64;

/// Entry point: connects to the relay and spawns the session loop.
pub struct SessionClient;

impl SessionClient {
    /// Dial the relay with the configured retry policy, then hand the
    /// connection to a freshly spawned [`SessionCoordinator`].
    pub async fn connect(
        config: ClientConfig,
        dialer: &dyn Dialer,
        rtc: Arc<dyn RtcConnector>,
    ) -> Result<(SessionHandle, SessionEvents), SessionError> {
        let endpoint = config.endpoint();
        let mut transport = SignalingTransport::new();
        let connection_rx = transport.connect(dialer, &endpoint, &config.retry).await?;
        info!("Connected to relay at {}", endpoint);

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));

        let handle = SessionHandle {
            commands: command_tx,
            session_id: config.session_id.clone(),
            peer_id: config.peer_id.clone(),
            join_timeout: config.join_timeout(),
        };

        let coordinator = SessionCoordinator::new(config, transport, rtc, event_tx);
        tokio::spawn(coordinator.run(command_rx, connection_rx));

        Ok((handle, SessionEvents { rx: event_rx }))
    }

    /// [`connect`](Self::connect) over WebSocket with `webrtc` peer connections.
    pub async fn connect_ws(
        config: ClientConfig,
    ) -> Result<(SessionHandle, SessionEvents), SessionError> {
        let rtc = Arc::new(WebRtcConnector::new(config.transport_config()));
        Self::connect(config, &WsDialer::new(), rtc).await
    }
}

/// Cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    session_id: SessionId,
    peer_id: PeerId,
    join_timeout: Duration,
}

impl SessionHandle {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    /// Join the configured session as the configured peer.
    pub async fn join(&self) -> Result<u32, SessionError> {
        self.join_as(self.session_id.clone(), self.peer_id.clone())
            .await
    }

    /// Send `join_session` and wait for the acknowledgment. Resolves with the
    /// peer count, or fails on `no_session`, timeout or connection loss.
    ///
    /// An acknowledgment that arrives after the caller stopped waiting is
    /// answered with `leave_session`. Retrying the same join while the first
    /// is in flight waits on that one instead of sending another.
    pub async fn join_as(
        &self,
        session_id: SessionId,
        peer_id: PeerId,
    ) -> Result<u32, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::Join {
                session_id,
                peer_id,
                reply,
            })
            .await
            .map_err(|_| SessionError::Closed)?;

        match tokio::time::timeout(self.join_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(SessionError::Closed),
            Err(_) => Err(SessionError::JoinTimeout),
        }
    }

    /// Best-effort: does not wait for the server.
    pub async fn leave(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Leave { reply }).await?
    }

    pub async fn open_channel(&self, label: impl Into<String>) -> Result<(), SessionError> {
        let label = label.into();
        self.request(|reply| SessionCommand::OpenChannel { label, reply })
            .await?
    }

    /// Returns `false` when there was nothing to close.
    pub async fn close_channel(&self, label: impl Into<String>) -> Result<bool, SessionError> {
        let label = label.into();
        self.request(|reply| SessionCommand::CloseChannel { label, reply })
            .await?
    }

    pub async fn send(
        &self,
        label: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Result<(), SessionError> {
        let label = label.into();
        let data = data.into();
        self.request(|reply| SessionCommand::Send { label, data, reply })
            .await?
    }

    pub async fn is_channel_open(&self, label: impl Into<String>) -> bool {
        let label = label.into();
        self.request(|reply| SessionCommand::ChannelOpen { label, reply })
            .await
            .unwrap_or(false)
    }

    pub async fn negotiation_phase(
        &self,
        peer_id: impl Into<PeerId>,
    ) -> Result<Option<NegotiationPhase>, SessionError> {
        let peer_id = peer_id.into();
        self.request(|reply| SessionCommand::Phase { peer_id, reply })
            .await
    }

    pub async fn moderate(&self, request: ModerationRequest) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Moderate { request, reply })
            .await?
    }

    pub async fn kick(&self, target: impl Into<PeerId>) -> Result<(), SessionError> {
        self.moderate(ModerationRequest::Kick {
            target: target.into(),
        })
        .await
    }

    pub async fn mute(
        &self,
        target: impl Into<PeerId>,
        channel: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.moderate(ModerationRequest::Mute {
            target: target.into(),
            channel: channel.into(),
        })
        .await
    }

    pub async fn unmute(
        &self,
        target: impl Into<PeerId>,
        channel: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.moderate(ModerationRequest::Unmute {
            target: target.into(),
            channel: channel.into(),
        })
        .await
    }

    pub async fn change_read_permission(
        &self,
        target: impl Into<PeerId>,
        channel: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.moderate(ModerationRequest::ChangeReadPermission {
            target: target.into(),
            channel: channel.into(),
        })
        .await
    }

    pub async fn change_write_permission(
        &self,
        target: impl Into<PeerId>,
        channel: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.moderate(ModerationRequest::ChangeWritePermission {
            target: target.into(),
            channel: channel.into(),
        })
        .await
    }

    /// Leave, close the connection and stop the session loop.
    pub async fn shutdown(&self) {
        let _ = self.request(|reply| SessionCommand::Shutdown { reply }).await;
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

/// Ordered stream of [`SessionEvent`]s.
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::Receiver<SessionEvent>,
}

impl SessionEvents {
    /// `None` once the session loop has stopped.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }
}
