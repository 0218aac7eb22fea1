use crate::negotiation::Role;
use crate::signaling::RetryPolicy;
use crate::transport::{DEFAULT_STUN_ADDR, TransportConfig};
use rendezvous_core::{PeerId, SessionId};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_SESSION: &str = "S1";
pub const DEFAULT_CHANNEL: &str = "chat";

/// Everything a [`SessionClient`](crate::SessionClient) needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: String,
    /// `0` leaves the port out of the endpoint.
    pub port: u16,
    pub session_id: SessionId,
    pub peer_id: PeerId,
    /// Label of the channel the initiator opens before offering.
    pub channel_label: String,
    pub role: Role,
    pub ice_enabled: bool,
    pub ice_servers: Vec<String>,
    /// Some relays expect `session_id` on `sdp_answer`, others reject it.
    pub include_session_in_answer: bool,
    pub retry: RetryPolicy,
    pub join_timeout_ms: u64,
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            session_id: DEFAULT_SESSION.into(),
            peer_id: PeerId::new(),
            channel_label: DEFAULT_CHANNEL.to_string(),
            role: Role::Initiator,
            ice_enabled: true,
            ice_servers: vec![DEFAULT_STUN_ADDR.to_string()],
            include_session_in_answer: false,
            retry: RetryPolicy::default(),
            join_timeout_ms: 10_000,
            event_capacity: 256,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Start a builder from these values rather than the defaults.
    pub fn into_builder(self) -> ClientConfigBuilder {
        ClientConfigBuilder { config: self }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// WebSocket URL of the relay.
    pub fn endpoint(&self) -> String {
        if self.port > 0 {
            format!("ws://{}:{}", self.server, self.port)
        } else {
            format!("ws://{}", self.server)
        }
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            ice_servers: self.ice_servers.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.config.server = server.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.config.session_id = session_id.into();
        self
    }

    pub fn peer_id(mut self, peer_id: impl Into<PeerId>) -> Self {
        self.config.peer_id = peer_id.into();
        self
    }

    pub fn channel_label(mut self, label: impl Into<String>) -> Self {
        self.config.channel_label = label.into();
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.config.role = role;
        self
    }

    pub fn ice_enabled(mut self, enabled: bool) -> Self {
        self.config.ice_enabled = enabled;
        self
    }

    pub fn ice_servers(mut self, servers: Vec<String>) -> Self {
        self.config.ice_servers = servers;
        self
    }

    pub fn include_session_in_answer(mut self, include: bool) -> Self {
        self.config.include_session_in_answer = include;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn join_timeout(mut self, timeout: Duration) -> Self {
        self.config.join_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
