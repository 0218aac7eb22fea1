use crate::error::ConnectionError;
use crate::signaling::{Dialer, Frame, FrameSink, FrameStream};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt, future};
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

/// WebSocket dialer. Outbound frames go out as text, matching the relay's
/// JSON protocol; binary frames from the server are accepted as well.
#[derive(Debug, Default, Clone)]
pub struct WsDialer;

impl WsDialer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Dialer for WsDialer {
    async fn dial(&self, endpoint: &str) -> Result<(FrameSink, FrameStream), ConnectionError> {
        let (socket, _) = tokio_tungstenite::connect_async(endpoint)
            .await
            .map_err(|e| ConnectionError::Io(e.to_string()))?;
        debug!("WebSocket handshake with {} complete", endpoint);

        let (sender, receiver) = socket.split();

        let sink = sender
            .sink_map_err(|e| ConnectionError::Io(e.to_string()))
            .with(|frame: Frame| {
                future::ready(Ok::<_, ConnectionError>(match frame {
                    Frame::Data(bytes) => {
                        Message::Text(String::from_utf8_lossy(&bytes).into_owned())
                    }
                    Frame::Close => Message::Close(None),
                }))
            });

        let stream = receiver.filter_map(|msg| {
            future::ready(match msg {
                Ok(Message::Text(text)) => Some(Ok(Frame::Data(Bytes::from(text)))),
                Ok(Message::Binary(data)) => Some(Ok(Frame::Data(Bytes::from(data)))),
                Ok(Message::Close(_)) => Some(Ok(Frame::Close)),
                Ok(_) => None,
                Err(e) => Some(Err(ConnectionError::Io(e.to_string()))),
            })
        });

        Ok((Box::pin(sink), Box::pin(stream)))
    }
}
