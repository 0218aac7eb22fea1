use crate::model::ice::IceCandidate;
use crate::model::peer::PeerId;
use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};

/// Every message exchanged with the relay server.
///
/// The wire form is a flat JSON object whose `type` field selects the variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalMessage {
    JoinSession {
        session_id: SessionId,
        peer_id: PeerId,
    },
    JoinedSuccessfully {
        peer_amount: u32,
    },
    PeerJoined {
        peer_id: PeerId,
    },
    LeaveSession {
        session_id: SessionId,
        peer_id: PeerId,
    },
    PeerLeft {
        peer_id: PeerId,
    },
    SdpOffer {
        session_id: SessionId,
        peer_id: PeerId,
        sdp: String,
    },
    SdpAnswer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<SessionId>,
        peer_id: PeerId,
        sdp: String,
    },
    Candidate {
        peer_id: PeerId,
        candidate: IceCandidate,
    },
    NoSession,
    OpenDataChannel {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        channel_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp: Option<String>,
    },
    CloseDataChannel {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        channel_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp: Option<String>,
    },
    MuteDataChannel {
        session_id: SessionId,
        peer_id: PeerId,
        target_id: PeerId,
        channel_id: String,
    },
    UnmuteDataChannel {
        session_id: SessionId,
        peer_id: PeerId,
        target_id: PeerId,
        channel_id: String,
    },
    KickTarget {
        session_id: SessionId,
        peer_id: PeerId,
        target_id: PeerId,
    },
    ChangeReadPermission {
        session_id: SessionId,
        peer_id: PeerId,
        target_id: PeerId,
        channel_id: String,
    },
    ChangeWritePermission {
        session_id: SessionId,
        peer_id: PeerId,
        target_id: PeerId,
        channel_id: String,
    },
}

impl SignalMessage {
    /// All tags understood by this protocol version.
    pub const TAGS: [&'static str; 16] = [
        "join_session",
        "joined_successfully",
        "peer_joined",
        "leave_session",
        "peer_left",
        "sdp_offer",
        "sdp_answer",
        "candidate",
        "no_session",
        "open_data_channel",
        "close_data_channel",
        "mute_data_channel",
        "unmute_data_channel",
        "kick_target",
        "change_read_permission",
        "change_write_permission",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::JoinSession { .. } => "join_session",
            Self::JoinedSuccessfully { .. } => "joined_successfully",
            Self::PeerJoined { .. } => "peer_joined",
            Self::LeaveSession { .. } => "leave_session",
            Self::PeerLeft { .. } => "peer_left",
            Self::SdpOffer { .. } => "sdp_offer",
            Self::SdpAnswer { .. } => "sdp_answer",
            Self::Candidate { .. } => "candidate",
            Self::NoSession => "no_session",
            Self::OpenDataChannel { .. } => "open_data_channel",
            Self::CloseDataChannel { .. } => "close_data_channel",
            Self::MuteDataChannel { .. } => "mute_data_channel",
            Self::UnmuteDataChannel { .. } => "unmute_data_channel",
            Self::KickTarget { .. } => "kick_target",
            Self::ChangeReadPermission { .. } => "change_read_permission",
            Self::ChangeWritePermission { .. } => "change_write_permission",
        }
    }

    pub fn is_known_tag(tag: &str) -> bool {
        Self::TAGS.contains(&tag)
    }

    /// The peer a message is about, for the kinds that name one.
    pub fn peer_id(&self) -> Option<&PeerId> {
        match self {
            Self::JoinSession { peer_id, .. }
            | Self::PeerJoined { peer_id }
            | Self::LeaveSession { peer_id, .. }
            | Self::PeerLeft { peer_id }
            | Self::SdpOffer { peer_id, .. }
            | Self::SdpAnswer { peer_id, .. }
            | Self::Candidate { peer_id, .. }
            | Self::MuteDataChannel { peer_id, .. }
            | Self::UnmuteDataChannel { peer_id, .. }
            | Self::KickTarget { peer_id, .. }
            | Self::ChangeReadPermission { peer_id, .. }
            | Self::ChangeWritePermission { peer_id, .. } => Some(peer_id),
            Self::JoinedSuccessfully { .. }
            | Self::NoSession
            | Self::OpenDataChannel { .. }
            | Self::CloseDataChannel { .. } => None,
        }
    }
}
