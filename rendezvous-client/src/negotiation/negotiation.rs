use crate::error::NegotiationError;
use crate::negotiation::{NegotiationPhase, Role};
use crate::signaling::SignalingOutput;
use crate::transport::RtcPeer;
use rendezvous_core::{IceCandidate, PeerId, SessionDescription, SessionId, SignalMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Candidates held per negotiation while no remote description exists.
pub const MAX_PENDING_CANDIDATES: usize = 64;

/// Outcome of feeding one message to a [`Negotiation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The phase moved forward.
    Advanced,
    /// The message was stale or duplicate and left no trace.
    Ignored,
}

/// What happened to an inbound ICE candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateDisposition {
    Applied,
    /// Held until a remote description exists.
    Buffered,
    /// Malformed, ICE exchange is disabled, or the buffer is full.
    Discarded,
    /// The collaborator refused it.
    Rejected,
}

/// Offer/answer state for one remote peer.
///
/// Every method runs on the session's dispatch loop, so a negotiation is never
/// touched by two messages at once.
pub struct Negotiation {
    peer_id: PeerId,
    role: Role,
    phase: NegotiationPhase,
    has_local: bool,
    has_remote: bool,
    pending_candidates: VecDeque<IceCandidate>,
    peer: Option<Arc<dyn RtcPeer>>,
    ice_enabled: bool,
}

impl Negotiation {
    pub fn new(peer_id: PeerId, role: Role, ice_enabled: bool) -> Self {
        Self {
            peer_id,
            role,
            phase: NegotiationPhase::Idle,
            has_local: false,
            has_remote: false,
            pending_candidates: VecDeque::new(),
            peer: None,
            ice_enabled,
        }
    }

    pub fn attach(&mut self, peer: Arc<dyn RtcPeer>) {
        self.peer = Some(peer);
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> &NegotiationPhase {
        &self.phase
    }

    pub fn has_local_description(&self) -> bool {
        self.has_local
    }

    pub fn has_remote_description(&self) -> bool {
        self.has_remote
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    pub fn peer_connection(&self) -> Option<Arc<dyn RtcPeer>> {
        self.peer.clone()
    }

    /// Initiator path: create and publish the local offer.
    pub async fn start_offer(
        &mut self,
        session_id: &SessionId,
        signaling: &dyn SignalingOutput,
    ) -> Result<Transition, NegotiationError> {
        if self.phase != NegotiationPhase::Idle {
            warn!(
                "Offer for {} requested in phase {}, ignoring",
                self.peer_id,
                self.phase.name()
            );
            return Ok(Transition::Ignored);
        }
        let peer = self.require_peer()?;

        self.phase = NegotiationPhase::OfferPending;
        let offer = match peer.create_offer().await {
            Ok(offer) => offer,
            Err(e) => return Err(self.fail(NegotiationError::LocalDescription(e.to_string()))),
        };
        if let Err(e) = peer.set_local_description(offer.clone()).await {
            return Err(self.fail(NegotiationError::LocalDescription(e.to_string())));
        }
        self.has_local = true;

        let msg = SignalMessage::SdpOffer {
            session_id: session_id.clone(),
            peer_id: self.peer_id.clone(),
            sdp: offer.sdp,
        };
        if let Err(e) = signaling.send_signal(msg).await {
            return Err(self.fail(NegotiationError::Signaling(e.to_string())));
        }

        self.phase = NegotiationPhase::OfferSent;
        info!("Offer sent for {}", self.peer_id);
        Ok(Transition::Advanced)
    }

    /// Initiator path: apply the remote answer.
    pub async fn on_answer(&mut self, sdp: String) -> Result<Transition, NegotiationError> {
        match &self.phase {
            NegotiationPhase::OfferSent => {}
            NegotiationPhase::Ready => {
                debug!("Duplicate answer from {} ignored", self.peer_id);
                return Ok(Transition::Ignored);
            }
            NegotiationPhase::Failed { .. } => {
                debug!("Answer from {} after failure ignored", self.peer_id);
                return Ok(Transition::Ignored);
            }
            other => {
                warn!(
                    "Stale answer from {} in phase {}, discarding",
                    self.peer_id,
                    other.name()
                );
                return Ok(Transition::Ignored);
            }
        }

        let answer = SessionDescription::answer(sdp);
        if !answer.is_well_formed() {
            return Err(self.fail(NegotiationError::InvalidSdp(self.peer_id.clone())));
        }
        let peer = self.require_peer()?;

        self.phase = NegotiationPhase::AnswerReceived;
        if let Err(e) = peer.set_remote_description(answer).await {
            return Err(self.fail(NegotiationError::RemoteDescription(e.to_string())));
        }
        self.has_remote = true;
        self.flush_candidates(peer.as_ref()).await;

        self.phase = NegotiationPhase::Ready;
        info!("Negotiation with {} ready", self.peer_id);
        Ok(Transition::Advanced)
    }

    /// Responder path: apply the remote offer, then publish the answer.
    ///
    /// `session_id` is only put on the wire when the deployment expects it.
    pub async fn on_offer(
        &mut self,
        sdp: String,
        session_id: Option<SessionId>,
        signaling: &dyn SignalingOutput,
    ) -> Result<Transition, NegotiationError> {
        match &self.phase {
            NegotiationPhase::Idle => {}
            NegotiationPhase::Ready => {
                debug!("Duplicate offer from {} ignored", self.peer_id);
                return Ok(Transition::Ignored);
            }
            NegotiationPhase::Failed { .. } => {
                debug!("Offer from {} after failure ignored", self.peer_id);
                return Ok(Transition::Ignored);
            }
            other => {
                warn!(
                    "Unexpected offer from {} in phase {}, discarding",
                    self.peer_id,
                    other.name()
                );
                return Ok(Transition::Ignored);
            }
        }

        let offer = SessionDescription::offer(sdp);
        if !offer.is_well_formed() {
            return Err(self.fail(NegotiationError::InvalidSdp(self.peer_id.clone())));
        }
        let peer = self.require_peer()?;

        self.phase = NegotiationPhase::OfferReceived;
        if let Err(e) = peer.set_remote_description(offer).await {
            return Err(self.fail(NegotiationError::RemoteDescription(e.to_string())));
        }
        self.has_remote = true;
        self.flush_candidates(peer.as_ref()).await;

        let answer = match peer.create_answer().await {
            Ok(answer) => answer,
            Err(e) => return Err(self.fail(NegotiationError::LocalDescription(e.to_string()))),
        };
        if let Err(e) = peer.set_local_description(answer.clone()).await {
            return Err(self.fail(NegotiationError::LocalDescription(e.to_string())));
        }
        self.has_local = true;

        let msg = SignalMessage::SdpAnswer {
            session_id,
            peer_id: self.peer_id.clone(),
            sdp: answer.sdp,
        };
        if let Err(e) = signaling.send_signal(msg).await {
            return Err(self.fail(NegotiationError::Signaling(e.to_string())));
        }
        self.phase = NegotiationPhase::AnswerSent;
        debug!("Answer sent to {}", self.peer_id);

        self.phase = NegotiationPhase::Ready;
        info!("Answered {}, negotiation ready", self.peer_id);
        Ok(Transition::Advanced)
    }

    pub async fn on_candidate(&mut self, candidate: IceCandidate) -> CandidateDisposition {
        if !self.ice_enabled {
            debug!("ICE exchange disabled, dropping candidate from {}", self.peer_id);
            return CandidateDisposition::Discarded;
        }
        if !candidate.is_complete() {
            warn!("Malformed candidate from {} discarded: {:?}", self.peer_id, candidate);
            return CandidateDisposition::Discarded;
        }
        if self.phase.is_failed() {
            debug!("Candidate for failed negotiation with {} dropped", self.peer_id);
            return CandidateDisposition::Discarded;
        }

        match (&self.peer, self.has_remote) {
            (Some(peer), true) => {
                let peer = peer.clone();
                apply_candidate(&self.peer_id, peer.as_ref(), candidate).await
            }
            _ if self.pending_candidates.len() >= MAX_PENDING_CANDIDATES => {
                warn!(
                    "Candidate buffer for {} full, dropping candidate",
                    self.peer_id
                );
                CandidateDisposition::Discarded
            }
            _ => {
                debug!(
                    "Buffering candidate from {} until a remote description is set",
                    self.peer_id
                );
                self.pending_candidates.push_back(candidate);
                CandidateDisposition::Buffered
            }
        }
    }

    /// The remote peer went away. Fails the exchange unless it already settled.
    pub fn on_peer_left(&mut self) -> Option<NegotiationError> {
        self.interrupt(NegotiationError::PeerLeft)
    }

    /// The signaling connection dropped. Fails the exchange unless it already
    /// settled.
    pub fn on_connection_closed(&mut self) -> Option<NegotiationError> {
        self.interrupt(NegotiationError::ConnectionClosed)
    }

    /// Close the underlying peer connection, if any.
    pub async fn close(&mut self) {
        self.pending_candidates.clear();
        if let Some(peer) = self.peer.take() {
            if let Err(e) = peer.close().await {
                debug!("Closing peer connection for {} failed: {}", self.peer_id, e);
            }
        }
    }

    pub(crate) fn fail(&mut self, reason: NegotiationError) -> NegotiationError {
        warn!("Negotiation with {} failed: {}", self.peer_id, reason);
        self.pending_candidates.clear();
        self.phase = NegotiationPhase::Failed {
            reason: reason.clone(),
        };
        reason
    }

    fn interrupt(&mut self, reason: NegotiationError) -> Option<NegotiationError> {
        if self.phase.is_settled() {
            return None;
        }
        Some(self.fail(reason))
    }

    fn require_peer(&mut self) -> Result<Arc<dyn RtcPeer>, NegotiationError> {
        if let Some(peer) = &self.peer {
            return Ok(peer.clone());
        }
        Err(self.fail(NegotiationError::NoPeerConnection))
    }

    async fn flush_candidates(&mut self, peer: &dyn RtcPeer) {
        if !self.pending_candidates.is_empty() {
            debug!(
                "Flushing {} buffered candidate(s) for {}",
                self.pending_candidates.len(),
                self.peer_id
            );
        }
        while let Some(candidate) = self.pending_candidates.pop_front() {
            apply_candidate(&self.peer_id, peer, candidate).await;
        }
    }
}

async fn apply_candidate(
    peer_id: &PeerId,
    peer: &dyn RtcPeer,
    candidate: IceCandidate,
) -> CandidateDisposition {
    match peer.add_ice_candidate(candidate).await {
        Ok(()) => CandidateDisposition::Applied,
        Err(e) => {
            warn!("Candidate from {} rejected: {}", peer_id, e);
            CandidateDisposition::Rejected
        }
    }
}
