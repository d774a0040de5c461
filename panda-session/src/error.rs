use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Camera/microphone could not be opened. The connect attempt is aborted.
    #[error("media access denied: {0}")]
    MediaDenied(String),

    #[error("peer connection error: {0}")]
    PeerConnection(String),

    #[error("signaling error: {0}")]
    Signaling(String),

    #[error("failed to encode signal: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("session channel closed")]
    ChannelClosed,
}

impl From<webrtc::Error> for SessionError {
    fn from(e: webrtc::Error) -> Self {
        SessionError::PeerConnection(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for SessionError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        SessionError::Signaling(e.to_string())
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
