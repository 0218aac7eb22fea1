use rendezvous_client::{NegotiationError, Role, SessionEvent};
use rendezvous_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{RtcCall, connect_and_join, next_event};

#[tokio::test]
async fn test_peers_join_and_leave() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();

    session
        .relay
        .send(SignalMessage::PeerJoined {
            peer_id: "P2".into(),
        })
        .unwrap();
    // departure of a peer nobody knows about is ignored
    session
        .relay
        .send(SignalMessage::PeerLeft {
            peer_id: "P3".into(),
        })
        .unwrap();
    session
        .relay
        .send(SignalMessage::PeerLeft {
            peer_id: "P2".into(),
        })
        .unwrap();

    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::PeerJoined("P2".into())
    );
    // P2 was still idle, so its negotiation is failed on the way out
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationFailed {
            peer_id: "P2".into(),
            reason: NegotiationError::PeerLeft,
        }
    );
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::PeerLeft("P2".into())
    );
    assert_eq!(session.handle.negotiation_phase("P2").await.unwrap(), None);
}

#[tokio::test]
async fn test_ready_peer_leaving_closes_its_connection() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();
    session
        .relay
        .send(SignalMessage::SdpOffer {
            session_id: "S1".into(),
            peer_id: "P2".into(),
            sdp: "v=0\r\ns=-\r\n".to_string(),
        })
        .unwrap();
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationReady("P2".into())
    );

    session
        .relay
        .send(SignalMessage::PeerLeft {
            peer_id: "P2".into(),
        })
        .unwrap();

    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::PeerLeft("P2".into())
    );
    let peer = session.rtc.peer("P2").unwrap();
    assert_eq!(peer.calls().last(), Some(&RtcCall::Close));
}
