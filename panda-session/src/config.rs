use panda_core::{IceServerConfig, PeerId, RoomId};
use std::time::Duration;

const DEFAULT_NEXT_PARTNER_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl MediaConstraints {
    pub fn video_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.video && !self.audio
    }
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub room: RoomId,
    pub peer_id: PeerId,
    pub ice_servers: Vec<IceServerConfig>,
    pub media: MediaConstraints,
    /// How long "next partner" waits before sending a fresh offer.
    pub next_partner_delay: Duration,
}

impl SessionConfig {
    pub fn with_room(mut self, room: impl Into<RoomId>) -> Self {
        self.room = room.into();
        self
    }

    pub fn with_peer_id(mut self, peer_id: impl Into<PeerId>) -> Self {
        self.peer_id = peer_id.into();
        self
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn with_media(mut self, media: MediaConstraints) -> Self {
        self.media = media;
        self
    }

    pub fn with_next_partner_delay(mut self, delay: Duration) -> Self {
        self.next_partner_delay = delay;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            room: RoomId::default(),
            peer_id: PeerId::new(),
            ice_servers: IceServerConfig::default_servers(),
            media: MediaConstraints::default(),
            next_partner_delay: DEFAULT_NEXT_PARTNER_DELAY,
        }
    }
}
