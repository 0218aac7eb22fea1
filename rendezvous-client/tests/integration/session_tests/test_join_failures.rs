use rendezvous_client::{Role, SessionError, SessionEvent};
use rendezvous_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{QUIET_MS, assert_no_event, connect, join_session, next_event, test_config};

#[tokio::test]
async fn test_no_session_fails_join() {
    init_tracing();

    let mut session = connect(test_config(Role::Initiator)).await.unwrap();
    let handle = session.handle.clone();
    let join = tokio::spawn(async move { handle.join().await });

    assert!(matches!(
        session.relay.recv().await.unwrap(),
        SignalMessage::JoinSession { .. }
    ));
    session.relay.send(SignalMessage::NoSession).unwrap();

    assert_eq!(join.await.unwrap(), Err(SessionError::NoSession));
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::SessionFailed(SessionError::NoSession)
    );
    assert_eq!(session.rtc.peer_count(), 0);
}

#[tokio::test]
async fn test_join_times_out_and_can_be_retried() {
    init_tracing();

    let mut config = test_config(Role::Responder);
    config.join_timeout_ms = 100;
    let mut session = connect(config).await.unwrap();

    let err = session.handle.join().await.unwrap_err();
    assert_eq!(err, SessionError::JoinTimeout);
    assert!(matches!(
        session.relay.recv().await.unwrap(),
        SignalMessage::JoinSession { .. }
    ));

    // the retry waits on the request already in flight instead of sending another
    let handle = session.handle.clone();
    let retry = tokio::spawn(async move { handle.join().await });
    assert_eq!(session.relay.recv_within(QUIET_MS).await.unwrap(), None);

    session
        .relay
        .send(SignalMessage::JoinedSuccessfully { peer_amount: 3 })
        .unwrap();
    assert_eq!(retry.await.unwrap(), Ok(3));
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::Joined { peer_amount: 3 }
    );
}

#[tokio::test]
async fn test_acknowledgment_after_timeout_leaves_again() {
    init_tracing();

    let mut config = test_config(Role::Initiator);
    config.join_timeout_ms = 100;
    let mut session = connect(config).await.unwrap();

    assert_eq!(session.handle.join().await, Err(SessionError::JoinTimeout));
    assert!(matches!(
        session.relay.recv().await.unwrap(),
        SignalMessage::JoinSession { .. }
    ));

    session
        .relay
        .send(SignalMessage::JoinedSuccessfully { peer_amount: 2 })
        .unwrap();

    assert_eq!(
        session.relay.recv().await.unwrap(),
        SignalMessage::LeaveSession {
            session_id: "S1".into(),
            peer_id: "P1".into(),
        }
    );
    // no session, so no offer and no Joined event
    assert_eq!(session.relay.recv_within(QUIET_MS).await.unwrap(), None);
    assert_no_event(&mut session.events).await.unwrap();
    assert_eq!(session.rtc.peer_count(), 0);
    assert_eq!(session.handle.leave().await, Err(SessionError::NotJoined));
}

#[tokio::test]
async fn test_dropped_join_does_not_create_session() {
    init_tracing();

    let mut session = connect(test_config(Role::Responder)).await.unwrap();

    let handle = session.handle.clone();
    let join = tokio::spawn(async move { handle.join().await });
    assert!(matches!(
        session.relay.recv().await.unwrap(),
        SignalMessage::JoinSession { .. }
    ));
    join.abort();
    let _ = join.await;

    session
        .relay
        .send(SignalMessage::JoinedSuccessfully { peer_amount: 1 })
        .unwrap();

    assert!(matches!(
        session.relay.recv().await.unwrap(),
        SignalMessage::LeaveSession { .. }
    ));
    assert_no_event(&mut session.events).await.unwrap();
    assert_eq!(session.handle.leave().await, Err(SessionError::NotJoined));
}

#[tokio::test]
async fn test_join_with_other_ids_replaces_abandoned_join() {
    init_tracing();

    let mut config = test_config(Role::Responder);
    config.join_timeout_ms = 100;
    let mut session = connect(config).await.unwrap();

    assert_eq!(session.handle.join().await, Err(SessionError::JoinTimeout));
    session.relay.recv().await.unwrap();

    let handle = session.handle.clone();
    let join = tokio::spawn(async move { handle.join_as("S2".into(), "P1".into()).await });

    assert_eq!(
        session.relay.recv().await.unwrap(),
        SignalMessage::LeaveSession {
            session_id: "S1".into(),
            peer_id: "P1".into(),
        }
    );
    assert_eq!(
        session.relay.recv().await.unwrap(),
        SignalMessage::JoinSession {
            session_id: "S2".into(),
            peer_id: "P1".into(),
        }
    );
    session
        .relay
        .send(SignalMessage::JoinedSuccessfully { peer_amount: 1 })
        .unwrap();
    assert_eq!(join.await.unwrap(), Ok(1));
}

#[tokio::test]
async fn test_double_join_is_rejected() {
    init_tracing();

    let mut session = connect(test_config(Role::Responder)).await.unwrap();
    join_session(&mut session, 1).await.unwrap();

    assert_eq!(session.handle.join().await, Err(SessionError::AlreadyJoined));
}
