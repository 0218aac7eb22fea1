use rendezvous_client::{NegotiationPhase, Role, SessionEvent};
use rendezvous_core::{SdpKind, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{
    MOCK_ANSWER, QUIET_MS, RtcCall, assert_no_event, connect, connect_and_join, join_session,
    next_event, test_config,
};

const REMOTE_OFFER: &str = "v=0\r\no=- 42 2 IN IP4 10.0.0.2\r\ns=-\r\n";

fn offer_from_p2() -> SignalMessage {
    SignalMessage::SdpOffer {
        session_id: "S1".into(),
        peer_id: "P2".into(),
        sdp: REMOTE_OFFER.to_string(),
    }
}

#[tokio::test]
async fn test_offer_is_answered_exactly_once() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();

    session.relay.send(offer_from_p2()).unwrap();

    assert_eq!(
        session.relay.recv().await.unwrap(),
        SignalMessage::SdpAnswer {
            session_id: None,
            peer_id: "P2".into(),
            sdp: MOCK_ANSWER.to_string(),
        }
    );
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationReady("P2".into())
    );
    assert_eq!(
        session.handle.negotiation_phase("P2").await.unwrap(),
        Some(NegotiationPhase::Ready)
    );

    let peer = session.rtc.peer("P2").expect("peer connection for P2");
    assert_eq!(
        peer.calls(),
        vec![
            RtcCall::SetRemote(SdpKind::Offer),
            RtcCall::CreateAnswer,
            RtcCall::SetLocal(SdpKind::Answer),
        ]
    );

    // a duplicate offer for a ready peer changes nothing
    session.relay.send(offer_from_p2()).unwrap();
    assert_eq!(session.relay.recv_within(QUIET_MS).await.unwrap(), None);
    assert_no_event(&mut session.events).await.unwrap();
    assert_eq!(session.rtc.peer_count(), 1);
}

#[tokio::test]
async fn test_answer_carries_session_id_when_configured() {
    init_tracing();

    let mut config = test_config(Role::Responder);
    config.include_session_in_answer = true;
    let mut session = connect(config).await.unwrap();
    join_session(&mut session, 2).await.unwrap();

    session.relay.send(offer_from_p2()).unwrap();

    match session.relay.recv().await.unwrap() {
        SignalMessage::SdpAnswer { session_id, .. } => {
            assert_eq!(session_id, Some("S1".into()))
        }
        other => panic!("expected sdp_answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_offer_fails_only_that_peer() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();

    session
        .relay
        .send(SignalMessage::SdpOffer {
            session_id: "S1".into(),
            peer_id: "P3".into(),
            sdp: "definitely not sdp".to_string(),
        })
        .unwrap();

    match next_event(&mut session.events).await.unwrap() {
        SessionEvent::NegotiationFailed { peer_id, .. } => assert_eq!(peer_id.as_str(), "P3"),
        other => panic!("expected NegotiationFailed, got {:?}", other),
    }

    session.relay.send(offer_from_p2()).unwrap();
    assert!(matches!(
        session.relay.recv().await.unwrap(),
        SignalMessage::SdpAnswer { .. }
    ));
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationReady("P2".into())
    );
}

#[tokio::test]
async fn test_peer_can_renegotiate_after_malformed_offer() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();

    session
        .relay
        .send(SignalMessage::SdpOffer {
            session_id: "S1".into(),
            peer_id: "P3".into(),
            sdp: "garbage".to_string(),
        })
        .unwrap();
    assert!(matches!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationFailed { .. }
    ));

    // the failed exchange is destroyed along with its peer connection
    assert_eq!(session.handle.negotiation_phase("P3").await.unwrap(), None);
    let failed = session.rtc.peer("P3").unwrap();
    assert_eq!(failed.calls().last(), Some(&RtcCall::Close));

    session
        .relay
        .send(SignalMessage::SdpOffer {
            session_id: "S1".into(),
            peer_id: "P3".into(),
            sdp: REMOTE_OFFER.to_string(),
        })
        .unwrap();
    assert_eq!(
        session.relay.recv().await.unwrap(),
        SignalMessage::SdpAnswer {
            session_id: None,
            peer_id: "P3".into(),
            sdp: MOCK_ANSWER.to_string(),
        }
    );
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationReady("P3".into())
    );
    assert_eq!(
        session.handle.negotiation_phase("P3").await.unwrap(),
        Some(NegotiationPhase::Ready)
    );
    assert_eq!(session.rtc.peer_count(), 2);
}
