use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rendezvous_client::{ClientConfig, Role, SessionClient, SessionEvent, SessionHandle};
use std::fs;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rendezvous")]
#[command(about = "Join a relay session and chat over a peer data channel")]
struct Cli {
    /// JSON config document; flags below override its values.
    #[arg(long, env = "RENDEZVOUS_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "RENDEZVOUS_SERVER")]
    server: Option<String>,

    /// 0 leaves the port out of the endpoint.
    #[arg(long, env = "RENDEZVOUS_PORT")]
    port: Option<u16>,

    #[arg(short, long, env = "RENDEZVOUS_SESSION")]
    session: Option<String>,

    #[arg(short, long, env = "RENDEZVOUS_PEER")]
    peer: Option<String>,

    #[arg(short, long, env = "RENDEZVOUS_CHANNEL")]
    channel: Option<String>,

    #[arg(long, value_enum, env = "RENDEZVOUS_ROLE")]
    role: Option<RoleArg>,

    #[arg(long)]
    no_ice: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Initiator,
    Responder,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Initiator => Role::Initiator,
            RoleArg::Responder => Role::Responder,
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<ClientConfig> {
        let base = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                ClientConfig::from_json(&raw).context("Invalid config document")?
            }
            None => ClientConfig::default(),
        };

        let mut builder = base.into_builder();
        if let Some(server) = self.server {
            builder = builder.server(server);
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(session) = self.session {
            builder = builder.session_id(session);
        }
        if let Some(peer) = self.peer {
            builder = builder.peer_id(peer);
        }
        if let Some(channel) = self.channel {
            builder = builder.channel_label(channel);
        }
        if let Some(role) = self.role {
            builder = builder.role(role.into());
        }
        if self.no_ice {
            builder = builder.ice_enabled(false);
        }
        Ok(builder.build())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = Cli::parse().into_config()?;
    let label = config.channel_label.clone();

    let (handle, mut events) = SessionClient::connect_ws(config)
        .await
        .context("Failed to reach the relay")?;

    let peers = handle.join().await.context("Failed to join session")?;
    info!("Joined {} as {} ({} peers)", handle.session_id(), handle.peer_id(), peers);

    let input = tokio::spawn(forward_stdin(handle.clone(), label));

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Data { peer_id, data, .. } => {
                println!("{}: {}", peer_id, String::from_utf8_lossy(&data));
            }
            SessionEvent::SessionFailed(e) => {
                warn!("Session ended: {}", e);
                break;
            }
            SessionEvent::Disconnected => break,
            other => info!("{:?}", other),
        }
    }

    input.abort();
    handle.shutdown().await;
    Ok(())
}

async fn forward_stdin(handle: SessionHandle, label: String) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }
        if let Err(e) = handle.send(label.as_str(), line.into_bytes()).await {
            warn!("Not sent: {}", e);
        }
    }
    handle.leave().await?;
    Ok(())
}
