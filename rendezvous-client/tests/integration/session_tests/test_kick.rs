use rendezvous_client::{ModerationAction, ModerationNotice, Role, SessionError, SessionEvent};
use rendezvous_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{connect_and_join, next_event, wait_for_event};

#[tokio::test]
async fn test_kick_of_local_peer_ends_session() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();

    session
        .relay
        .send(SignalMessage::KickTarget {
            session_id: "S1".into(),
            peer_id: "ADMIN".into(),
            target_id: "P1".into(),
        })
        .unwrap();

    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::Moderation(ModerationNotice {
            action: ModerationAction::Kick,
            by: "ADMIN".into(),
            target: "P1".into(),
            channel: None,
        })
    );
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::SessionFailed(SessionError::Kicked("ADMIN".into()))
    );
    assert_eq!(session.handle.leave().await, Err(SessionError::NotJoined));
}

#[tokio::test]
async fn test_kick_of_other_peer_drops_it() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();
    session
        .relay
        .send(SignalMessage::PeerJoined {
            peer_id: "P2".into(),
        })
        .unwrap();
    session
        .relay
        .send(SignalMessage::KickTarget {
            session_id: "S1".into(),
            peer_id: "ADMIN".into(),
            target_id: "P2".into(),
        })
        .unwrap();

    wait_for_event(&mut session.events, |e| {
        *e == SessionEvent::PeerLeft("P2".into())
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_moderation_requests_go_to_relay() {
    init_tracing();

    let mut session = connect_and_join(Role::Responder).await.unwrap();

    session.handle.kick("P2").await.unwrap();
    session.handle.mute("P2", "chat").await.unwrap();

    assert_eq!(
        session.relay.recv().await.unwrap(),
        SignalMessage::KickTarget {
            session_id: "S1".into(),
            peer_id: "P1".into(),
            target_id: "P2".into(),
        }
    );
    assert_eq!(
        session.relay.recv().await.unwrap(),
        SignalMessage::MuteDataChannel {
            session_id: "S1".into(),
            peer_id: "P1".into(),
            target_id: "P2".into(),
            channel_id: "chat".to_string(),
        }
    );
}
