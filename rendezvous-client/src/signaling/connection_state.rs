use serde::Serialize;

/// Lifecycle of one signaling connection.
///
/// `Closed` and `Error` are terminal for a connection instance; a new
/// [`SignalingTransport`](super::SignalingTransport) is needed to reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    None,
    Connecting,
    Open,
    Closed,
    Error,
}

impl ConnectionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Error)
    }
}
