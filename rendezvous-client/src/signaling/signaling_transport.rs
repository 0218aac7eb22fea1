use crate::error::ConnectionError;
use crate::signaling::{
    ConnectionEvent, ConnectionState, Dialer, Frame, FrameSink, FrameStream, RetryPolicy,
    SignalingOutput,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use rendezvous_core::{SignalMessage, codec};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const EVENT_BUFFER: usize = 256;
const CLOSE_GRACE: Duration = Duration::from_secs(1);

struct OutboundFrame {
    frame: Frame,
    ack: oneshot::Sender<Result<(), ConnectionError>>,
}

/// Owns one duplex connection to the signaling server.
///
/// The connection state lives here and is only ever written by this type and
/// the reader/writer tasks it spawns; everyone else observes it through
/// [`subscribe`](Self::subscribe) or the [`ConnectionEvent`] stream.
pub struct SignalingTransport {
    state: Arc<watch::Sender<ConnectionState>>,
    outbound: Option<mpsc::UnboundedSender<OutboundFrame>>,
    writer: Option<JoinHandle<()>>,
}

impl SignalingTransport {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ConnectionState::None);
        Self {
            state: Arc::new(state),
            outbound: None,
            writer: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Dial `endpoint`, retrying per `policy`.
    ///
    /// On success the returned receiver yields `Opened` first, then every
    /// inbound message in arrival order, and finally `Closed` or `Error`.
    pub async fn connect(
        &mut self,
        dialer: &dyn Dialer,
        endpoint: &str,
        policy: &RetryPolicy,
    ) -> Result<mpsc::Receiver<ConnectionEvent>, ConnectionError> {
        let current = self.state();
        if current != ConnectionState::None {
            return Err(ConnectionError::AlreadyUsed(current));
        }
        transition(&self.state, ConnectionState::Connecting);

        let attempts = policy.attempts();
        let mut cause = String::new();

        for attempt in 1..=attempts {
            info!("Connecting to {} (attempt {}/{})", endpoint, attempt, attempts);

            match dialer.dial(endpoint).await {
                Ok((sink, stream)) => return Ok(self.start(sink, stream)),
                Err(e) => {
                    warn!("Connection attempt {} to {} failed: {}", attempt, endpoint, e);
                    cause = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(policy.backoff(attempt)).await;
                    }
                }
            }
        }

        transition(&self.state, ConnectionState::Error);
        Err(ConnectionError::Connection {
            endpoint: endpoint.to_string(),
            attempts,
            cause,
        })
    }

    fn start(&mut self, sink: FrameSink, stream: FrameStream) -> mpsc::Receiver<ConnectionEvent> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        transition(&self.state, ConnectionState::Open);
        let _ = event_tx.try_send(ConnectionEvent::Opened);

        self.writer = Some(tokio::spawn(write_loop(sink, outbound_rx, self.state.clone())));
        tokio::spawn(read_loop(stream, event_tx, self.state.clone()));
        self.outbound = Some(outbound_tx);

        event_rx
    }

    /// A cloneable handle for sending frames over this connection.
    pub fn sender(&self) -> SignalingSender {
        SignalingSender {
            state: self.state.subscribe(),
            outbound: self.outbound.clone(),
        }
    }

    /// Close the connection. Frames already queued are flushed first, and the
    /// event stream ends with `Closed`.
    pub async fn close(&mut self) {
        if transition(&self.state, ConnectionState::Closed) {
            info!("Signaling connection closed locally");
        }
        self.outbound = None;

        if let Some(writer) = self.writer.take() {
            if tokio::time::timeout(CLOSE_GRACE, writer).await.is_err() {
                warn!("Signaling writer did not finish within {:?}", CLOSE_GRACE);
            }
        }
    }
}

impl Default for SignalingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SignalingTransport {
    fn drop(&mut self) {
        transition(&self.state, ConnectionState::Closed);
    }
}

/// Outbound half of a [`SignalingTransport`].
#[derive(Clone)]
pub struct SignalingSender {
    state: watch::Receiver<ConnectionState>,
    outbound: Option<mpsc::UnboundedSender<OutboundFrame>>,
}

impl SignalingSender {
    /// Send raw bytes. Resolves once the frame has been written, and fails
    /// with [`ConnectionError::NotOpen`] when the connection is not open.
    pub async fn send(&self, bytes: Bytes) -> Result<(), ConnectionError> {
        let state = *self.state.borrow();
        let (Some(outbound), ConnectionState::Open) = (&self.outbound, state) else {
            warn!("Dropping outbound frame, signaling connection is {:?}", state);
            return Err(ConnectionError::NotOpen(state));
        };

        let (ack, done) = oneshot::channel();
        outbound
            .send(OutboundFrame {
                frame: Frame::Data(bytes),
                ack,
            })
            .map_err(|_| ConnectionError::Closed)?;

        done.await.map_err(|_| ConnectionError::Closed)?
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }
}

#[async_trait]
impl SignalingOutput for SignalingSender {
    async fn send_signal(&self, msg: SignalMessage) -> Result<(), ConnectionError> {
        let bytes = codec::encode(&msg)?;
        debug!("-> {}", msg.tag());
        self.send(bytes).await
    }
}

/// Move to `next` unless the connection already reached a terminal state.
fn transition(state: &watch::Sender<ConnectionState>, next: ConnectionState) -> bool {
    state.send_if_modified(|current| {
        if current.is_terminal() || *current == next {
            return false;
        }
        debug!("Signaling connection {:?} -> {:?}", current, next);
        *current = next;
        true
    })
}

async fn wait_terminal(state: &mut watch::Receiver<ConnectionState>) {
    let _ = state.wait_for(|s| s.is_terminal()).await;
}

async fn read_loop(
    mut stream: FrameStream,
    events: mpsc::Sender<ConnectionEvent>,
    state: Arc<watch::Sender<ConnectionState>>,
) {
    let mut state_rx = state.subscribe();

    loop {
        tokio::select! {
            biased;

            _ = wait_terminal(&mut state_rx) => {
                let last = *state_rx.borrow();
                let event = match last {
                    ConnectionState::Error => ConnectionEvent::Error(ConnectionError::Closed),
                    _ => ConnectionEvent::Closed,
                };
                let _ = events.send(event).await;
                break;
            }

            frame = stream.next() => match frame {
                Some(Ok(Frame::Data(bytes))) => {
                    let decoded = codec::decode(&bytes);
                    if events.send(ConnectionEvent::Received(decoded)).await.is_err() {
                        debug!("Connection event consumer dropped, stopping reader");
                        transition(&state, ConnectionState::Closed);
                        break;
                    }
                }
                Some(Ok(Frame::Close)) | None => {
                    info!("Signaling server closed the connection");
                    transition(&state, ConnectionState::Closed);
                }
                Some(Err(e)) => {
                    error!("Signaling connection failed: {}", e);
                    if transition(&state, ConnectionState::Error) {
                        let _ = events.send(ConnectionEvent::Error(e)).await;
                        break;
                    }
                }
            }
        }
    }
}

async fn write_loop(
    mut sink: FrameSink,
    mut outbound: mpsc::UnboundedReceiver<OutboundFrame>,
    state: Arc<watch::Sender<ConnectionState>>,
) {
    let mut state_rx = state.subscribe();

    loop {
        tokio::select! {
            biased;

            out = outbound.recv() => {
                let Some(OutboundFrame { frame, ack }) = out else {
                    break;
                };
                let res = sink.send(frame).await;
                if let Err(e) = &res {
                    error!("Failed to write signaling frame: {}", e);
                    transition(&state, ConnectionState::Error);
                }
                let _ = ack.send(res);
            }

            _ = wait_terminal(&mut state_rx) => break,
        }
    }

    if tokio::time::timeout(CLOSE_GRACE, sink.close()).await.is_err() {
        debug!("Timed out closing signaling sink");
    }
}
