use bytes::Bytes;
use rendezvous_client::{ChannelError, Role, SessionError, SessionEvent};

use crate::integration::init_tracing;
use crate::utils::{assert_no_event, connect_and_join, next_event};

#[tokio::test]
async fn test_send_waits_for_open_channel() {
    init_tracing();

    let mut session = connect_and_join(Role::Initiator).await.unwrap();
    session.relay.recv().await.unwrap();
    let peer = session.rtc.peer("P1").unwrap();

    let err = session.handle.send("chat", "too early").await.unwrap_err();
    assert_eq!(
        err,
        SessionError::Channel(ChannelError::NotOpen {
            label: "chat".to_string()
        })
    );
    assert!(!session.handle.is_channel_open("chat").await);
    assert!(peer.channel("chat").unwrap().sent().is_empty());

    peer.report_open("chat").await;
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::ChannelOpened {
            peer_id: "P1".into(),
            label: "chat".to_string()
        }
    );
    assert!(session.handle.is_channel_open("chat").await);

    session.handle.send("chat", "hello").await.unwrap();
    assert_eq!(
        peer.channel("chat").unwrap().sent(),
        vec![Bytes::from_static(b"hello")]
    );
}

#[tokio::test]
async fn test_inbound_data_is_surfaced_by_label() {
    init_tracing();

    let mut session = connect_and_join(Role::Initiator).await.unwrap();
    session.relay.recv().await.unwrap();
    let peer = session.rtc.peer("P1").unwrap();
    peer.report_open("chat").await;
    next_event(&mut session.events).await.unwrap();

    peer.deliver("chat", b"first").await;
    peer.deliver("unknown", b"dropped").await;
    peer.deliver("chat", b"second").await;

    for expected in [&b"first"[..], &b"second"[..]] {
        assert_eq!(
            next_event(&mut session.events).await.unwrap(),
            SessionEvent::Data {
                peer_id: "P1".into(),
                label: "chat".to_string(),
                data: Bytes::copy_from_slice(expected),
            }
        );
    }
}

#[tokio::test]
async fn test_close_is_idempotent() {
    init_tracing();

    let mut session = connect_and_join(Role::Initiator).await.unwrap();
    session.relay.recv().await.unwrap();
    let peer = session.rtc.peer("P1").unwrap();
    peer.report_open("chat").await;
    next_event(&mut session.events).await.unwrap();

    assert!(session.handle.close_channel("chat").await.unwrap());
    assert_eq!(
        next_event(&mut session.events).await.unwrap(),
        SessionEvent::ChannelClosed {
            peer_id: "P1".into(),
            label: "chat".to_string()
        }
    );
    assert!(peer.channel("chat").unwrap().is_closed());

    assert!(!session.handle.close_channel("chat").await.unwrap());
    // the engine's own close notification arrives late and is absorbed
    peer.report_closed("chat").await;
    assert!(!session.handle.is_channel_open("chat").await);
    assert_no_event(&mut session.events).await.unwrap();
}

#[tokio::test]
async fn test_open_channel_on_upstream_connection() {
    init_tracing();

    let mut session = connect_and_join(Role::Initiator).await.unwrap();
    session.relay.recv().await.unwrap();

    session.handle.open_channel("files").await.unwrap();
    let err = session.handle.open_channel("files").await.unwrap_err();

    assert_eq!(
        err,
        SessionError::Channel(ChannelError::AlreadyExists {
            label: "files".to_string()
        })
    );
    assert!(session.rtc.peer("P1").unwrap().channel("files").is_some());
}

#[tokio::test]
async fn test_open_channel_without_connection_fails() {
    init_tracing();

    let session = connect_and_join(Role::Responder).await.unwrap();

    let err = session.handle.open_channel("files").await.unwrap_err();

    assert_eq!(
        err,
        SessionError::Channel(ChannelError::NoPeerConnection {
            label: "files".to_string()
        })
    );
}
