use crate::backend::{Backend, PeerEventSink};
use crate::config::MediaConstraints;
use crate::error::Result;
use crate::native::{RtcConnection, SyntheticMedia};
use async_trait::async_trait;
use panda_core::IceServerConfig;
use webrtc::api::setting_engine::SettingEngine;
use webrtc::ice::network_type::NetworkType;

/// Native backend on top of the `webrtc` crate.
#[derive(Debug, Clone)]
pub struct RtcBackend {
    stream_id: String,
    include_loopback: bool,
    udp4_only: bool,
}

impl RtcBackend {
    pub fn new() -> Self {
        Self {
            stream_id: "panda".to_owned(),
            include_loopback: false,
            udp4_only: false,
        }
    }

    pub fn with_stream_id(mut self, stream_id: impl Into<String>) -> Self {
        self.stream_id = stream_id.into();
        self
    }

    /// Gather 127.0.0.1 candidates too, so two peers on one host can meet
    /// without a usable LAN interface.
    pub fn with_loopback_candidates(mut self, include: bool) -> Self {
        self.include_loopback = include;
        self
    }

    pub fn with_udp4_only(mut self, udp4_only: bool) -> Self {
        self.udp4_only = udp4_only;
        self
    }

    pub(crate) fn setting_engine(&self) -> SettingEngine {
        let mut s = SettingEngine::default();
        s.set_include_loopback_candidate(self.include_loopback);
        if self.udp4_only {
            s.set_network_types(vec![NetworkType::Udp4]);
        }
        s
    }
}

impl Default for RtcBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for RtcBackend {
    type Media = SyntheticMedia;
    type Connection = RtcConnection;

    async fn open_media(&self, constraints: MediaConstraints) -> Result<SyntheticMedia> {
        SyntheticMedia::open(constraints, &self.stream_id)
    }

    async fn create_connection(
        &self,
        ice_servers: &[IceServerConfig],
        media: Option<&SyntheticMedia>,
        events: PeerEventSink,
    ) -> Result<RtcConnection> {
        let connection = RtcConnection::new(self.setting_engine(), ice_servers, events).await?;

        if let Some(media) = media {
            for track in media.tracks() {
                connection.add_track(track).await?;
            }
        }

        Ok(connection)
    }
}
