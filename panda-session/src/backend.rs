use crate::config::MediaConstraints;
use crate::error::Result;
use async_trait::async_trait;
use panda_core::{ConnectionState, IceCandidate, IceServerConfig, SessionDescription};
use tokio::sync::mpsc;

/// Callbacks a native peer connection fires, forwarded into the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// A local ICE candidate was gathered and has to be published.
    IceCandidate(IceCandidate),

    /// The native connection-state callback fired.
    StateChanged(ConnectionState),

    /// The remote side started sending a media track.
    RemoteTrack { kind: String, id: String },
}

/// Sender half handed to a connection at construction time.
///
/// Every connection gets its own generation number so the session can drop
/// late callbacks from a connection it already replaced.
#[derive(Debug, Clone)]
pub struct PeerEventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<(u64, PeerEvent)>,
}

impl PeerEventSink {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<(u64, PeerEvent)>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false once the owning session is gone.
    pub fn emit(&self, event: PeerEvent) -> bool {
        self.tx.send((self.generation, event)).is_ok()
    }
}

/// Local capture (camera, optionally microphone).
pub trait LocalMedia: Send + Sync {
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Factory for the native pieces a session needs.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    type Media: LocalMedia + 'static;
    type Connection: PeerConnection + 'static;

    /// Ask for capture devices. Denial surfaces as `SessionError::MediaDenied`.
    async fn open_media(&self, constraints: MediaConstraints) -> Result<Self::Media>;

    /// Build a connection with `media`'s tracks attached and its callbacks
    /// wired to `events`.
    async fn create_connection(
        &self,
        ice_servers: &[IceServerConfig],
        media: Option<&Self::Media>,
        events: PeerEventSink,
    ) -> Result<Self::Connection>;
}
