use crate::backend::LocalMedia;
use crate::config::MediaConstraints;
use crate::error::{Result, SessionError};
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Locally sourced tracks for a process with no camera.
///
/// The tracks are negotiated like real capture; callers that have frames can
/// push them through `TrackLocalStaticSample::write_sample`.
pub struct SyntheticMedia {
    tracks: Vec<Arc<TrackLocalStaticSample>>,
    live: bool,
}

impl SyntheticMedia {
    pub fn open(constraints: MediaConstraints, stream_id: &str) -> Result<Self> {
        if constraints.is_empty() {
            return Err(SessionError::MediaDenied(
                "neither audio nor video requested".to_owned(),
            ));
        }

        let mut tracks = Vec::new();
        if constraints.video {
            tracks.push(Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_VP8.to_owned(),
                    ..Default::default()
                },
                "video".to_owned(),
                stream_id.to_owned(),
            )));
        }
        if constraints.audio {
            tracks.push(Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    ..Default::default()
                },
                "audio".to_owned(),
                stream_id.to_owned(),
            )));
        }

        Ok(Self { tracks, live: true })
    }

    pub fn tracks(&self) -> Vec<Arc<dyn TrackLocal + Send + Sync>> {
        self.tracks
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn TrackLocal + Send + Sync>)
            .collect()
    }

    pub fn sample_tracks(&self) -> &[Arc<TrackLocalStaticSample>] {
        &self.tracks
    }
}

impl LocalMedia for SyntheticMedia {
    fn stop(&mut self) {
        self.live = false;
        self.tracks.clear();
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
