use crate::channel::ChannelRegistry;
use crate::config::ClientConfig;
use crate::error::{ChannelError, ConnectionError, NegotiationError, SessionError};
use crate::negotiation::{Negotiation, NegotiationPhase, Role, Transition};
use crate::session::{
    ModerationAction, ModerationNotice, ModerationRequest, Reply, Session, SessionCommand,
    SessionEvent,
};
use crate::signaling::{ConnectionEvent, SignalingOutput, SignalingTransport};
use crate::transport::{RtcConnector, RtcPeer, TransportEvent};
use bytes::Bytes;
use rendezvous_core::{IceCandidate, PeerId, SessionId, SignalMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const TRANSPORT_BUFFER: usize = 256;

/// Label used when the server asks for a channel without naming one.
pub const SERVER_CHANNEL: &str = "serverChannel";

struct PendingJoin {
    session_id: SessionId,
    peer_id: PeerId,
    reply: Reply<u32>,
}

/// The single dispatch loop of one session.
///
/// Owns the [`Session`], every [`Negotiation`] and the [`ChannelRegistry`];
/// inbound signaling messages, RTC notifications and handle commands are all
/// processed here one at a time.
pub struct SessionCoordinator {
    config: ClientConfig,
    session: Option<Session>,
    pending_join: Option<PendingJoin>,
    negotiations: HashMap<PeerId, Negotiation>,
    ready_order: Vec<PeerId>,
    channels: ChannelRegistry,
    rtc: Arc<dyn RtcConnector>,
    rtc_tx: mpsc::Sender<TransportEvent>,
    rtc_rx: mpsc::Receiver<TransportEvent>,
    transport: SignalingTransport,
    signaling: Arc<dyn SignalingOutput>,
    events: mpsc::Sender<SessionEvent>,
}

impl SessionCoordinator {
    pub fn new(
        config: ClientConfig,
        transport: SignalingTransport,
        rtc: Arc<dyn RtcConnector>,
        events: mpsc::Sender<SessionEvent>,
    ) -> Self {
        let (rtc_tx, rtc_rx) = mpsc::channel(TRANSPORT_BUFFER);
        let signaling: Arc<dyn SignalingOutput> = Arc::new(transport.sender());

        Self {
            config,
            session: None,
            pending_join: None,
            negotiations: HashMap::new(),
            ready_order: Vec::new(),
            channels: ChannelRegistry::new(),
            rtc,
            rtc_tx,
            rtc_rx,
            transport,
            signaling,
            events,
        }
    }

    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut connection: mpsc::Receiver<ConnectionEvent>,
    ) {
        info!("Session loop started");
        let mut connection_live = true;

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(c) => {
                        if !self.handle_command(c).await {
                            break;
                        }
                    }
                    None => {
                        info!("All session handles dropped. Shutting down session.");
                        self.shutdown().await;
                        break;
                    }
                },

                evt = connection.recv(), if connection_live => match evt {
                    Some(e) => connection_live = self.handle_connection_event(e).await,
                    None => {
                        connection_live = false;
                        self.on_disconnected().await;
                    }
                },

                Some(evt) = self.rtc_rx.recv() => self.handle_transport_event(evt).await,
            }
        }

        info!("Session loop finished");
    }

    /// Returns `false` once the loop should stop.
    async fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Join {
                session_id,
                peer_id,
                reply,
            } => self.join(session_id, peer_id, reply).await,

            SessionCommand::Leave { reply } => {
                let _ = reply.send(self.leave().await);
            }

            SessionCommand::OpenChannel { label, reply } => {
                let _ = reply.send(self.open_channel(&label).await);
            }

            SessionCommand::CloseChannel { label, reply } => {
                let _ = reply.send(Ok(self.close_channel(&label).await));
            }

            SessionCommand::Send { label, data, reply } => {
                let _ = reply.send(self.send(&label, data).await);
            }

            SessionCommand::ChannelOpen { label, reply } => {
                let open = self
                    .channel_peer(&label)
                    .is_some_and(|peer_id| self.channels.is_open(&peer_id, &label));
                let _ = reply.send(open);
            }

            SessionCommand::Phase { peer_id, reply } => {
                let phase = self.negotiations.get(&peer_id).map(|n| n.phase().clone());
                let _ = reply.send(phase);
            }

            SessionCommand::Moderate { request, reply } => {
                let _ = reply.send(self.moderate(request).await);
            }

            SessionCommand::Shutdown { reply } => {
                self.shutdown().await;
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    /// Returns `false` once the connection has ended.
    async fn handle_connection_event(&mut self, event: ConnectionEvent) -> bool {
        match event {
            ConnectionEvent::Opened => {
                self.emit(SessionEvent::Connected).await;
                true
            }
            ConnectionEvent::Received(Ok(msg)) => {
                match msg.peer_id() {
                    Some(peer_id) => debug!("<- {} ({})", msg.tag(), peer_id),
                    None => debug!("<- {}", msg.tag()),
                }
                self.dispatch(msg).await;
                true
            }
            ConnectionEvent::Received(Err(e)) => {
                warn!("Dropping undecodable signaling message: {}", e);
                true
            }
            ConnectionEvent::Closed => {
                self.on_disconnected().await;
                false
            }
            ConnectionEvent::Error(e) => {
                error!("Signaling connection failed: {}", e);
                self.on_disconnected().await;
                false
            }
        }
    }

    /// Route one decoded server message.
    pub async fn dispatch(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::JoinedSuccessfully { peer_amount } => self.on_joined(peer_amount).await,
            SignalMessage::NoSession => self.on_no_session().await,
            SignalMessage::PeerJoined { peer_id } => self.on_peer_joined(peer_id).await,
            SignalMessage::PeerLeft { peer_id } | SignalMessage::LeaveSession { peer_id, .. } => {
                self.on_peer_left(peer_id).await
            }
            SignalMessage::SdpOffer { peer_id, sdp, .. } => self.on_offer(peer_id, sdp).await,
            SignalMessage::SdpAnswer { peer_id, sdp, .. } => self.on_answer(peer_id, sdp).await,
            SignalMessage::Candidate { peer_id, candidate } => {
                self.on_remote_candidate(peer_id, candidate).await
            }
            SignalMessage::OpenDataChannel { channel_id, .. } => {
                let label = channel_id.unwrap_or_else(|| SERVER_CHANNEL.to_string());
                match self.open_channel(&label).await {
                    Ok(()) => info!("Opened server-requested channel '{}'", label),
                    Err(e) => warn!("Server-requested channel '{}' not opened: {}", label, e),
                }
            }
            SignalMessage::CloseDataChannel { channel_id, .. } => match channel_id {
                Some(label) => {
                    if !self.close_channel(&label).await {
                        debug!("Server closed unknown channel '{}'", label);
                    }
                }
                None => self.close_all_channels().await,
            },
            SignalMessage::JoinSession { peer_id, .. } => {
                debug!("Ignoring join_session for {} from server", peer_id)
            }
            moderation @ (SignalMessage::MuteDataChannel { .. }
            | SignalMessage::UnmuteDataChannel { .. }
            | SignalMessage::KickTarget { .. }
            | SignalMessage::ChangeReadPermission { .. }
            | SignalMessage::ChangeWritePermission { .. }) => {
                if let Some(notice) = ModerationNotice::from_message(&moderation) {
                    self.on_moderation(notice).await;
                }
            }
        }
    }

    async fn join(&mut self, session_id: SessionId, peer_id: PeerId, reply: Reply<u32>) {
        if self.session.is_some() {
            let _ = reply.send(Err(SessionError::AlreadyJoined));
            return;
        }
        if let Some(pending) = self.pending_join.as_mut() {
            if !pending.reply.is_closed() {
                let _ = reply.send(Err(SessionError::AlreadyJoined));
                return;
            }
            // The earlier caller gave up but its join_session is still in flight.
            if pending.session_id == session_id && pending.peer_id == peer_id {
                debug!("Waiting on the join already in flight for {}", session_id);
                pending.reply = reply;
                return;
            }
        }
        if let Some(stale) = self.pending_join.take() {
            self.send_leave(stale.session_id, stale.peer_id).await;
        }

        let msg = SignalMessage::JoinSession {
            session_id: session_id.clone(),
            peer_id: peer_id.clone(),
        };
        if let Err(e) = self.signaling.send_signal(msg).await {
            let _ = reply.send(Err(e.into()));
            return;
        }

        info!("Joining session {} as {}", session_id, peer_id);
        self.pending_join = Some(PendingJoin {
            session_id,
            peer_id,
            reply,
        });
    }

    async fn leave(&mut self) -> Result<(), SessionError> {
        let Some(session) = self.session.clone() else {
            return Err(SessionError::NotJoined);
        };

        self.close_all_channels().await;

        self.send_leave(session.id().clone(), session.local_peer().clone())
            .await;

        self.teardown().await;
        info!("Left session {}", session.id());
        Ok(())
    }

    async fn moderate(&mut self, request: ModerationRequest) -> Result<(), SessionError> {
        let Some(session) = &self.session else {
            return Err(SessionError::NotJoined);
        };
        debug!("Requesting {:?}", request.action());
        let msg = request.into_message(session.id().clone(), session.local_peer().clone());
        self.signaling.send_signal(msg).await?;
        Ok(())
    }

    async fn shutdown(&mut self) {
        if self.session.is_some() {
            let _ = self.leave().await;
        } else {
            self.teardown().await;
        }
        if let Some(pending) = self.pending_join.take() {
            let _ = pending.reply.send(Err(SessionError::Closed));
        }
        self.transport.close().await;
    }

    async fn on_joined(&mut self, peer_amount: u32) {
        let Some(pending) = self.pending_join.take() else {
            warn!("Unsolicited join acknowledgment ignored");
            return;
        };

        let PendingJoin {
            session_id,
            peer_id,
            reply,
        } = pending;
        if reply.send(Ok(peer_amount)).is_err() {
            info!(
                "Join of {} acknowledged after the caller stopped waiting, leaving",
                session_id
            );
            self.send_leave(session_id, peer_id).await;
            return;
        }

        info!(
            "Joined session {} as {} ({} peer(s))",
            session_id, peer_id, peer_amount
        );
        self.session = Some(Session::new(session_id, peer_id));
        self.emit(SessionEvent::Joined { peer_amount }).await;

        if self.config.role == Role::Initiator {
            self.start_upstream().await;
        }
    }

    /// Initiator path: open the default channel on a fresh peer connection and
    /// offer it. The negotiation is keyed by the local peer id, which is also
    /// the id carried by the offer.
    async fn start_upstream(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let local = session.local_peer().clone();
        let session_id = session.id().clone();

        let mut negotiation =
            Negotiation::new(local.clone(), Role::Initiator, self.config.ice_enabled);
        self.attach_peer(&mut negotiation).await;

        if let Some(peer) = negotiation.peer_connection() {
            let label = self.config.channel_label.clone();
            if let Err(e) = self.channels.open(local.clone(), &label, peer.as_ref()).await {
                warn!("Default channel '{}' not opened: {}", label, e);
            }
        }

        let result = negotiation
            .start_offer(&session_id, self.signaling.as_ref())
            .await;
        self.negotiations.insert(local.clone(), negotiation);
        self.settle(&local, result).await;
    }

    async fn on_no_session(&mut self) {
        match self.pending_join.take() {
            Some(pending) => {
                error!("Session {} does not exist on the server", pending.session_id);
                let _ = pending.reply.send(Err(SessionError::NoSession));
            }
            None => error!("Server reports the session no longer exists"),
        }
        self.teardown().await;
        self.emit(SessionEvent::SessionFailed(SessionError::NoSession))
            .await;
    }

    async fn on_peer_joined(&mut self, peer_id: PeerId) {
        let Some(session) = self.session.as_mut() else {
            debug!("peer_joined for {} before joining ignored", peer_id);
            return;
        };
        if !session.add_peer(peer_id.clone()) {
            debug!("Peer {} already known", peer_id);
            return;
        }

        info!("Peer {} joined", peer_id);
        if self.config.role == Role::Responder && !self.negotiations.contains_key(&peer_id) {
            let negotiation =
                Negotiation::new(peer_id.clone(), Role::Responder, self.config.ice_enabled);
            self.negotiations.insert(peer_id.clone(), negotiation);
        }
        self.emit(SessionEvent::PeerJoined(peer_id)).await;
    }

    async fn on_peer_left(&mut self, peer_id: PeerId) {
        if self.is_local(&peer_id) {
            debug!("Ignoring departure notice for the local peer");
            return;
        }

        let known = self
            .session
            .as_mut()
            .is_some_and(|s| s.remove_peer(&peer_id));
        let negotiation = self.negotiations.remove(&peer_id);
        if !known && negotiation.is_none() {
            debug!("peer_left for unknown peer {} ignored", peer_id);
            return;
        }

        info!("Peer {} left", peer_id);
        self.ready_order.retain(|p| p != &peer_id);
        if let Some(mut negotiation) = negotiation {
            if let Some(reason) = negotiation.on_peer_left() {
                self.emit(SessionEvent::NegotiationFailed {
                    peer_id: peer_id.clone(),
                    reason,
                })
                .await;
            }
            negotiation.close().await;
        }
        self.close_peer_channels(&peer_id).await;
        self.emit(SessionEvent::PeerLeft(peer_id)).await;
    }

    async fn on_offer(&mut self, peer_id: PeerId, sdp: String) {
        let Some(session) = self.session.as_mut() else {
            warn!("Offer from {} before joining ignored", peer_id);
            return;
        };
        if session.local_peer() == &peer_id {
            debug!("Ignoring offer carrying the local peer id");
            return;
        }
        session.add_peer(peer_id.clone());
        let answer_session = self
            .config
            .include_session_in_answer
            .then(|| session.id().clone());

        let mut negotiation = self.negotiations.remove(&peer_id).unwrap_or_else(|| {
            Negotiation::new(peer_id.clone(), Role::Responder, self.config.ice_enabled)
        });
        if negotiation.phase() == &NegotiationPhase::Idle {
            self.attach_peer(&mut negotiation).await;
        }

        let result = negotiation
            .on_offer(sdp, answer_session, self.signaling.as_ref())
            .await;
        self.negotiations.insert(peer_id.clone(), negotiation);
        self.settle(&peer_id, result).await;
    }

    async fn on_answer(&mut self, peer_id: PeerId, sdp: String) {
        let Some(key) = self.route(&peer_id) else {
            warn!("Answer from unknown peer {} discarded", peer_id);
            return;
        };
        let Some(negotiation) = self.negotiations.get_mut(&key) else {
            return;
        };
        let result = negotiation.on_answer(sdp).await;
        self.settle(&key, result).await;
    }

    async fn on_remote_candidate(&mut self, peer_id: PeerId, candidate: IceCandidate) {
        if !self.config.ice_enabled {
            debug!("ICE exchange disabled, candidate from {} dropped", peer_id);
            return;
        }
        if self.session.is_none() {
            debug!("Candidate from {} before joining dropped", peer_id);
            return;
        }

        let Some(key) = self.route(&peer_id) else {
            debug!("Candidate from {} without a negotiation dropped", peer_id);
            return;
        };

        if let Some(negotiation) = self.negotiations.get_mut(&key) {
            let disposition = negotiation.on_candidate(candidate).await;
            debug!("Candidate from {}: {:?}", peer_id, disposition);
        }
    }

    async fn on_moderation(&mut self, notice: ModerationNotice) {
        let Some(session) = &self.session else {
            debug!("{:?} before joining ignored", notice.action);
            return;
        };
        let local = session.local_peer().clone();
        info!(
            "{:?} by {} targeting {}",
            notice.action, notice.by, notice.target
        );
        self.emit(SessionEvent::Moderation(notice.clone())).await;

        if notice.target != local {
            if notice.action == ModerationAction::Kick {
                self.on_peer_left(notice.target).await;
            }
            return;
        }

        let channel = notice.channel.as_deref().unwrap_or_default();
        match notice.action {
            ModerationAction::Kick => {
                warn!("Removed from session by {}", notice.by);
                self.teardown().await;
                self.emit(SessionEvent::SessionFailed(SessionError::Kicked(notice.by)))
                    .await;
            }
            ModerationAction::Mute | ModerationAction::Unmute => {
                let muted = notice.action == ModerationAction::Mute;
                if !self.channels.set_muted(channel, muted) {
                    debug!("Mute change for unknown channel '{}'", channel);
                }
            }
            ModerationAction::ChangeReadPermission => match self.channels.toggle_read(channel) {
                Some(read) => info!("Read permission on '{}' is now {}", channel, read),
                None => debug!("Read permission change for unknown channel '{}'", channel),
            },
            ModerationAction::ChangeWritePermission => match self.channels.toggle_write(channel) {
                Some(write) => info!("Write permission on '{}' is now {}", channel, write),
                None => debug!("Write permission change for unknown channel '{}'", channel),
            },
        }
    }

    async fn on_disconnected(&mut self) {
        info!("Signaling connection lost");

        let mut failed = Vec::new();
        for (peer_id, negotiation) in self.negotiations.iter_mut() {
            if let Some(reason) = negotiation.on_connection_closed() {
                failed.push((peer_id.clone(), reason));
            }
        }
        for (peer_id, reason) in failed {
            self.emit(SessionEvent::NegotiationFailed { peer_id, reason })
                .await;
        }

        if let Some(pending) = self.pending_join.take() {
            let _ = pending.reply.send(Err(ConnectionError::Closed.into()));
        }
        self.teardown().await;
        self.emit(SessionEvent::Disconnected).await;
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::ChannelAnnounced(peer_id, handle) => {
                self.channels.register_remote(peer_id, handle);
            }
            TransportEvent::ChannelOpened(peer_id, label) => {
                if self.channels.mark_open(&peer_id, &label) {
                    self.emit(SessionEvent::ChannelOpened { peer_id, label })
                        .await;
                }
            }
            TransportEvent::ChannelClosed(peer_id, label) => {
                if self.channels.mark_closed(&peer_id, &label) {
                    self.emit(SessionEvent::ChannelClosed { peer_id, label })
                        .await;
                }
            }
            TransportEvent::Message(peer_id, label, data) => {
                if self.channels.accepts(&peer_id, &label) {
                    self.emit(SessionEvent::Data {
                        peer_id,
                        label,
                        data,
                    })
                    .await;
                }
            }
            TransportEvent::CandidateGathered(peer_id, candidate) => {
                self.send_local_candidate(peer_id, candidate).await
            }
            TransportEvent::Disconnected(peer_id) => {
                info!("Peer connection for {} went down", peer_id);
                self.close_peer_channels(&peer_id).await;
            }
        }
    }

    async fn send_local_candidate(&self, peer_id: PeerId, candidate: IceCandidate) {
        if !self.config.ice_enabled {
            return;
        }
        let live = self
            .negotiations
            .get(&peer_id)
            .is_some_and(|n| !n.phase().is_failed());
        if !live {
            debug!("Local candidate for inactive negotiation {} dropped", peer_id);
            return;
        }

        let msg = SignalMessage::Candidate { peer_id, candidate };
        if let Err(e) = self.signaling.send_signal(msg).await {
            debug!("Local candidate not sent: {}", e);
        }
    }

    async fn open_channel(&mut self, label: &str) -> Result<(), SessionError> {
        let Some((peer_id, peer)) = self.default_peer() else {
            return Err(ChannelError::NoPeerConnection {
                label: label.to_string(),
            }
            .into());
        };
        self.channels.open(peer_id, label, peer.as_ref()).await?;
        Ok(())
    }

    async fn send(&self, label: &str, data: Bytes) -> Result<(), SessionError> {
        let Some(peer_id) = self.channel_peer(label) else {
            return Err(ChannelError::NotOpen {
                label: label.to_string(),
            }
            .into());
        };
        self.channels.send(&peer_id, label, data).await?;
        Ok(())
    }

    /// Closes `label` on every peer connection carrying it.
    async fn close_channel(&mut self, label: &str) -> bool {
        let peers = self.channels.close_label(label).await;
        let closed = !peers.is_empty();
        for peer_id in peers {
            self.emit(SessionEvent::ChannelClosed {
                peer_id,
                label: label.to_string(),
            })
            .await;
        }
        closed
    }

    async fn close_all_channels(&mut self) {
        for (peer_id, label) in self.channels.close_all().await {
            self.emit(SessionEvent::ChannelClosed { peer_id, label })
                .await;
        }
    }

    async fn close_peer_channels(&mut self, peer_id: &PeerId) {
        for label in self.channels.close_peer(peer_id).await {
            self.emit(SessionEvent::ChannelClosed {
                peer_id: peer_id.clone(),
                label,
            })
            .await;
        }
    }

    async fn send_leave(&self, session_id: SessionId, peer_id: PeerId) {
        let msg = SignalMessage::LeaveSession {
            session_id,
            peer_id,
        };
        if let Err(e) = self.signaling.send_signal(msg).await {
            warn!("leave_session not delivered: {}", e);
        }
    }

    /// Drop the session and everything hanging off it.
    async fn teardown(&mut self) {
        self.close_all_channels().await;
        for (_, mut negotiation) in self.negotiations.drain() {
            negotiation.close().await;
        }
        self.ready_order.clear();
        self.session = None;
    }

    /// Fold the outcome of a negotiation step into session events.
    async fn settle(&mut self, key: &PeerId, result: Result<Transition, NegotiationError>) {
        match result {
            Ok(Transition::Advanced) => {
                let ready = self
                    .negotiations
                    .get(key)
                    .is_some_and(|n| n.phase().is_ready());
                if ready {
                    if !self.ready_order.contains(key) {
                        self.ready_order.push(key.clone());
                    }
                    self.emit(SessionEvent::NegotiationReady(key.clone())).await;
                }
            }
            Ok(Transition::Ignored) => {}
            Err(reason) => {
                if let Some(mut negotiation) = self.negotiations.remove(key) {
                    negotiation.close().await;
                }
                self.ready_order.retain(|p| p != key);
                self.close_peer_channels(key).await;
                self.emit(SessionEvent::NegotiationFailed {
                    peer_id: key.clone(),
                    reason,
                })
                .await;
            }
        }
    }

    async fn attach_peer(&self, negotiation: &mut Negotiation) {
        if negotiation.peer_connection().is_some() {
            return;
        }
        let peer_id = negotiation.peer_id().clone();
        match self.rtc.connect(peer_id.clone(), self.rtc_tx.clone()).await {
            Ok(peer) => negotiation.attach(peer),
            Err(e) => error!("Failed to create peer connection for {}: {}", peer_id, e),
        }
    }

    /// Negotiation an inbound answer or candidate belongs to. The initiator's
    /// single upstream negotiation takes everything not addressed to a known
    /// peer.
    fn route(&self, peer_id: &PeerId) -> Option<PeerId> {
        if self.negotiations.contains_key(peer_id) {
            return Some(peer_id.clone());
        }
        if self.config.role != Role::Initiator {
            return None;
        }
        let local = self.session.as_ref()?.local_peer();
        self.negotiations
            .contains_key(local)
            .then(|| local.clone())
    }

    /// Peer connection new channels go on: the upstream connection for the
    /// initiator, the first ready one for the responder.
    fn default_peer(&self) -> Option<(PeerId, Arc<dyn RtcPeer>)> {
        let key = match self.config.role {
            Role::Initiator => self.session.as_ref().map(|s| s.local_peer().clone()),
            Role::Responder => self.ready_order.first().cloned(),
        }?;
        let negotiation = self.negotiations.get(&key)?;
        if negotiation.phase().is_failed() {
            return None;
        }
        Some((key, negotiation.peer_connection()?))
    }

    /// Peer whose `label` channel a handle operation addresses: the default
    /// peer when it carries the label, otherwise the first ready peer with an
    /// open channel of that name, otherwise any peer carrying it.
    fn channel_peer(&self, label: &str) -> Option<PeerId> {
        let default = self.default_peer().map(|(peer_id, _)| peer_id);
        if let Some(peer_id) = default.filter(|p| self.channels.get(p, label).is_some()) {
            return Some(peer_id);
        }
        self.ready_order
            .iter()
            .find(|p| self.channels.is_open(p, label))
            .or_else(|| self.channels.peers_with(label).next())
            .cloned()
    }

    fn is_local(&self, peer_id: &PeerId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.local_peer() == peer_id)
    }

    async fn emit(&self, event: SessionEvent) {
        if self.events.send(event).await.is_err() {
            debug!("Session event consumer dropped");
        }
    }
}
