pub use panda_core::model::{PeerId, RoomId, SignalMessage};

pub mod model {
    pub use panda_core::model::*;
    pub use panda_core::utils::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use panda_session::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use panda_relay::*;
}
