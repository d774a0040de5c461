use panda_core::ConnectionState;
use std::fmt;

/// Short status line describing the last signaling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingInfo {
    Subscribed,
    SentOffer,
    AnsweredOffer,
    ReceivedAnswer,
    Peer(ConnectionState),
}

impl fmt::Display for SignalingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalingInfo::Subscribed => f.write_str("subscribed"),
            SignalingInfo::SentOffer => f.write_str("sent-offer"),
            SignalingInfo::AnsweredOffer => f.write_str("answered-offer"),
            SignalingInfo::ReceivedAnswer => f.write_str("received-answer"),
            SignalingInfo::Peer(state) => write!(f, "pc:{}", state),
        }
    }
}

/// Everything a UI needs to render the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// UI-visible connection state changed. Never repeats the previous value.
    StateChanged(ConnectionState),

    Signaling(SignalingInfo),

    RemoteTrack { kind: String, id: String },

    /// Capture devices could not be opened; the connect attempt was dropped.
    MediaError(String),

    /// A negotiation step failed; the session is back to disconnected.
    Error(String),
}
