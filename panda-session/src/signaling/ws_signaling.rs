use crate::error::{Result, SessionError};
use crate::signaling::SignalingChannel;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use panda_core::{RoomId, SignalMessage};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Pub/sub client for `panda-relay`.
///
/// Frames published by anyone in the room, ourselves included, are decoded and
/// pushed into `inbound`. Undecodable frames are logged and skipped.
pub struct WsSignaling {
    outbound: mpsc::UnboundedSender<Message>,
}

impl WsSignaling {
    pub fn room_url(base: &str, room: &RoomId) -> String {
        format!("{}/ws/{}", base.trim_end_matches('/'), room)
    }

    pub async fn connect(
        base_url: &str,
        room: &RoomId,
        inbound: mpsc::UnboundedSender<SignalMessage>,
    ) -> Result<Self> {
        let url = Self::room_url(base_url, room);
        let (stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        info!("Subscribed to {}", url);

        let (mut sink, mut source) = stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => match SignalMessage::decode(text.as_str()) {
                        Ok(msg) => {
                            if inbound.send(msg).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Ignoring malformed signal: {}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Signaling socket error: {}", e);
                        break;
                    }
                }
            }
            debug!("Signaling reader finished");
        });

        Ok(Self { outbound: tx })
    }
}

#[async_trait]
impl SignalingChannel for WsSignaling {
    async fn publish(&self, msg: SignalMessage) -> Result<()> {
        let json = msg.encode()?;
        self.outbound
            .send(Message::Text(json.into()))
            .map_err(|_| SessionError::Signaling("relay connection closed".to_owned()))
    }
}
