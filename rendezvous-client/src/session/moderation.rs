use rendezvous_core::{PeerId, SessionId, SignalMessage};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Kick,
    Mute,
    Unmute,
    ChangeReadPermission,
    ChangeWritePermission,
}

/// A moderation request the local peer sends about `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationRequest {
    Kick { target: PeerId },
    Mute { target: PeerId, channel: String },
    Unmute { target: PeerId, channel: String },
    ChangeReadPermission { target: PeerId, channel: String },
    ChangeWritePermission { target: PeerId, channel: String },
}

impl ModerationRequest {
    pub fn action(&self) -> ModerationAction {
        match self {
            Self::Kick { .. } => ModerationAction::Kick,
            Self::Mute { .. } => ModerationAction::Mute,
            Self::Unmute { .. } => ModerationAction::Unmute,
            Self::ChangeReadPermission { .. } => ModerationAction::ChangeReadPermission,
            Self::ChangeWritePermission { .. } => ModerationAction::ChangeWritePermission,
        }
    }

    pub(crate) fn into_message(self, session_id: SessionId, peer_id: PeerId) -> SignalMessage {
        match self {
            Self::Kick { target } => SignalMessage::KickTarget {
                session_id,
                peer_id,
                target_id: target,
            },
            Self::Mute { target, channel } => SignalMessage::MuteDataChannel {
                session_id,
                peer_id,
                target_id: target,
                channel_id: channel,
            },
            Self::Unmute { target, channel } => SignalMessage::UnmuteDataChannel {
                session_id,
                peer_id,
                target_id: target,
                channel_id: channel,
            },
            Self::ChangeReadPermission { target, channel } => SignalMessage::ChangeReadPermission {
                session_id,
                peer_id,
                target_id: target,
                channel_id: channel,
            },
            Self::ChangeWritePermission { target, channel } => {
                SignalMessage::ChangeWritePermission {
                    session_id,
                    peer_id,
                    target_id: target,
                    channel_id: channel,
                }
            }
        }
    }
}

/// A moderation message relayed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationNotice {
    pub action: ModerationAction,
    /// Who issued it.
    pub by: PeerId,
    pub target: PeerId,
    pub channel: Option<String>,
}

impl ModerationNotice {
    /// Extract the notice from a moderation message; `None` for every other kind.
    pub fn from_message(msg: &SignalMessage) -> Option<Self> {
        let (action, by, target, channel) = match msg {
            SignalMessage::KickTarget {
                peer_id, target_id, ..
            } => (ModerationAction::Kick, peer_id, target_id, None),
            SignalMessage::MuteDataChannel {
                peer_id,
                target_id,
                channel_id,
                ..
            } => (ModerationAction::Mute, peer_id, target_id, Some(channel_id)),
            SignalMessage::UnmuteDataChannel {
                peer_id,
                target_id,
                channel_id,
                ..
            } => (ModerationAction::Unmute, peer_id, target_id, Some(channel_id)),
            SignalMessage::ChangeReadPermission {
                peer_id,
                target_id,
                channel_id,
                ..
            } => (
                ModerationAction::ChangeReadPermission,
                peer_id,
                target_id,
                Some(channel_id),
            ),
            SignalMessage::ChangeWritePermission {
                peer_id,
                target_id,
                channel_id,
                ..
            } => (
                ModerationAction::ChangeWritePermission,
                peer_id,
                target_id,
                Some(channel_id),
            ),
            _ => return None,
        };

        Some(Self {
            action,
            by: by.clone(),
            target: target.clone(),
            channel: channel.cloned(),
        })
    }
}
