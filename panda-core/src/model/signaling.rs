use crate::model::ice::IceCandidate;
use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use crate::model::session_description::SessionDescription;
use serde::{Deserialize, Serialize};

/// Payload published on the room's pub/sub channel.
///
/// Every variant carries the room it was meant for; subscribers drop anything
/// addressed to another room before looking further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    Offer {
        sdp: SessionDescription,
        room: RoomId,
        from: PeerId,
    },
    Answer {
        sdp: SessionDescription,
        room: RoomId,
        from: PeerId,
    },
    Ice {
        candidate: IceCandidate,
        room: RoomId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<PeerId>,
    },
    Hello {
        room: RoomId,
        from: PeerId,
    },
}

impl SignalMessage {
    /// Parse a raw channel payload. Unknown `type` values are errors too.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn room(&self) -> &RoomId {
        match self {
            SignalMessage::Offer { room, .. }
            | SignalMessage::Answer { room, .. }
            | SignalMessage::Ice { room, .. }
            | SignalMessage::Hello { room, .. } => room,
        }
    }

    pub fn sender(&self) -> Option<&PeerId> {
        match self {
            SignalMessage::Offer { from, .. }
            | SignalMessage::Answer { from, .. }
            | SignalMessage::Hello { from, .. } => Some(from),
            SignalMessage::Ice { from, .. } => from.as_ref(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::Ice { .. } => "ice",
            SignalMessage::Hello { .. } => "hello",
        }
    }
}
