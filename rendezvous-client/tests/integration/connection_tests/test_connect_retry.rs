use rendezvous_client::{
    ConnectionError, RetryPolicy, Role, SessionClient, SessionError, SessionEvent,
};
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{MockRelay, MockRtc, next_event, test_config};

fn quick_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts).with_backoff(Duration::from_millis(1), Duration::from_millis(5))
}

#[tokio::test]
async fn test_connect_succeeds_after_refusals() {
    init_tracing();

    let (relay, mut listener) = MockRelay::new(2);
    let mut config = test_config(Role::Initiator);
    config.retry = quick_retry(5);

    let (_handle, mut events) = SessionClient::connect(config, &relay, MockRtc::new())
        .await
        .expect("third attempt should connect");

    assert_eq!(relay.attempts(), 3);
    assert!(listener.recv().await.is_some());
    assert_eq!(next_event(&mut events).await.unwrap(), SessionEvent::Connected);
}

#[tokio::test]
async fn test_connect_gives_up_after_attempt_cap() {
    init_tracing();

    let (relay, _listener) = MockRelay::new(10);
    let mut config = test_config(Role::Initiator);
    config.retry = quick_retry(3);

    let err = SessionClient::connect(config, &relay, MockRtc::new())
        .await
        .unwrap_err();

    match err {
        SessionError::Connection(ConnectionError::Connection {
            endpoint, attempts, ..
        }) => {
            assert_eq!(endpoint, "ws://relay.test");
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(relay.attempts(), 3);
}
