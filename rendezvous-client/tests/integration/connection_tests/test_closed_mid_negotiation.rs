use rendezvous_client::{NegotiationError, Role, SessionError, SessionEvent};
use rendezvous_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{QUIET_MS, RtcCall, connect_and_join, next_event};

#[tokio::test]
async fn test_connection_drop_fails_offer_in_flight() {
    init_tracing();

    let mut session = connect_and_join(Role::Initiator).await.unwrap();
    let offer = session.relay.recv().await.unwrap();
    assert!(matches!(offer, SignalMessage::SdpOffer { .. }));

    session.relay.close();

    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationFailed {
            peer_id: "P1".into(),
            reason: NegotiationError::ConnectionClosed,
        }
    );
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::ChannelClosed {
            peer_id: "P1".into(),
            label: "chat".to_string()
        }
    );
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::Disconnected
    );

    // the failed negotiation and its peer connection are gone too
    assert_eq!(session.handle.negotiation_phase("P1").await.unwrap(), None);
    let peer = session.rtc.peer("P1").unwrap();
    assert_eq!(peer.calls().last(), Some(&RtcCall::Close));
    assert!(peer.channel("chat").unwrap().is_closed());

    // the client hung up without sending anything more
    assert!(session.relay.recv_within(QUIET_MS).await.is_err());

    // the session is gone with the connection
    assert_eq!(session.handle.leave().await, Err(SessionError::NotJoined));
}

#[tokio::test]
async fn test_connection_drop_closes_ready_peers() {
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
    session.relay.recv().await.unwrap();
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::NegotiationReady("P2".into())
    );

    session.relay.close();

    // a settled negotiation is not reported as failed
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::Disconnected
    );
    let peer = session.rtc.peer("P2").unwrap();
    assert!(peer.calls().contains(&RtcCall::Close));
    assert_eq!(session.handle.negotiation_phase("P2").await.unwrap(), None);
}
