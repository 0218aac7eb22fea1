use crate::error::NegotiationError;

/// Where one peer's offer/answer exchange currently stands.
///
/// Initiator: `Idle -> OfferPending -> OfferSent -> AnswerReceived -> Ready`.
/// Responder: `Idle -> OfferReceived -> AnswerSent -> Ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationPhase {
    Idle,
    OfferPending,
    OfferSent,
    AnswerReceived,
    OfferReceived,
    AnswerSent,
    Ready,
    Failed { reason: NegotiationError },
}

impl NegotiationPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::OfferPending => "offer_pending",
            Self::OfferSent => "offer_sent",
            Self::AnswerReceived => "answer_received",
            Self::OfferReceived => "offer_received",
            Self::AnswerSent => "answer_sent",
            Self::Ready => "ready",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// `Ready` and `Failed` end the exchange.
    pub fn is_settled(&self) -> bool {
        self.is_ready() || self.is_failed()
    }
}
