use clap::{Parser, Subcommand};
use panda_core::utils::{DEFAULT_ROOM, DEFAULT_STUN_ADDR};
use panda_core::IceServerConfig;
use panda_relay::{DEFAULT_MAX_MESSAGE_BYTES, RelayConfig};
use panda_session::{MediaConstraints, SessionConfig};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "panda", version, about = "PANDA TV video chat peer and signaling relay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the room pub/sub relay.
    Relay(RelayArgs),
    /// Join a room and negotiate with whoever else is in it.
    Peer(PeerArgs),
}

#[derive(clap::Args, Debug)]
pub struct RelayArgs {
    #[arg(short, long, env = "PANDA_RELAY_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_BYTES)]
    pub max_message_bytes: usize,
}

impl RelayArgs {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig::default().with_max_message_bytes(self.max_message_bytes)
    }
}

#[derive(clap::Args, Debug)]
pub struct PeerArgs {
    /// Relay base address, without the `/ws/<room>` suffix.
    #[arg(short, long, env = "PANDA_RELAY_URL", default_value = "ws://127.0.0.1:3000")]
    pub url: String,

    #[arg(short, long, env = "PANDA_ROOM", default_value = DEFAULT_ROOM)]
    pub room: String,

    /// Random when omitted.
    #[arg(long, env = "PANDA_PEER_ID")]
    pub peer_id: Option<String>,

    /// Comma-separated STUN urls.
    #[arg(
        long,
        env = "PANDA_STUN",
        default_value = DEFAULT_STUN_ADDR,
        value_delimiter = ','
    )]
    pub stun: Vec<String>,

    #[arg(long, env = "PANDA_NO_AUDIO")]
    pub no_audio: bool,

    #[arg(long, default_value_t = 600)]
    pub next_delay_ms: u64,
}

impl PeerArgs {
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default()
            .with_room(self.room.as_str())
            .with_ice_servers(
                self.stun
                    .iter()
                    .filter(|url| !url.is_empty())
                    .map(|url| IceServerConfig::stun(url.as_str()))
                    .collect(),
            )
            .with_next_partner_delay(Duration::from_millis(self.next_delay_ms));

        if let Some(peer_id) = &self.peer_id {
            config = config.with_peer_id(peer_id.as_str());
        }
        if self.no_audio {
            config = config.with_media(MediaConstraints::video_only());
        }
        config
    }
}
