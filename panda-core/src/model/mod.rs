mod connection_state;
mod ice;
mod peer;
mod room;
mod session_description;
mod signaling;

pub use connection_state::ConnectionState;
pub use ice::{IceCandidate, IceServerConfig};
pub use peer::PeerId;
pub use room::RoomId;
pub use session_description::{SdpType, SessionDescription};
pub use signaling::SignalMessage;
