use crate::error::Result;
use async_trait::async_trait;
use panda_core::SignalMessage;

/// Outbound half of the room's pub/sub channel.
///
/// Inbound messages reach the session through the receiver passed to
/// `Session::new`; a channel implementation owns the sending side of it.
#[async_trait]
pub trait SignalingChannel: Send + Sync {
    async fn publish(&self, msg: SignalMessage) -> Result<()>;
}
