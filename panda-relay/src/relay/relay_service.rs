use crate::relay::RelayConfig;
use axum::extract::ws::{Message, Utf8Bytes};
use dashmap::DashMap;
use panda_core::RoomId;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub type SubscriberId = Uuid;

type Subscribers = DashMap<SubscriberId, mpsc::UnboundedSender<Message>>;

struct RelayInner {
    rooms: DashMap<RoomId, Subscribers>,
    config: RelayConfig,
}

/// Room-scoped fan-out of text frames.
///
/// A room exists while it has at least one subscriber. Everything published to
/// a room reaches every subscriber of that room, the publisher included.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomPresence {
    pub room: RoomId,
    pub subscribers: usize,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                rooms: DashMap::new(),
                config,
            }),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    pub fn subscribe(&self, room: RoomId, tx: mpsc::UnboundedSender<Message>) -> SubscriberId {
        let id = Uuid::new_v4();
        let subscribers = self.inner.rooms.entry(room.clone()).or_default();
        subscribers.insert(id, tx);
        info!(
            "Subscriber {} joined room '{}' ({} present)",
            id,
            room,
            subscribers.len()
        );
        id
    }

    pub fn unsubscribe(&self, room: &RoomId, id: &SubscriberId) {
        if let Some(subscribers) = self.inner.rooms.get(room) {
            subscribers.remove(id);
        }
        if self
            .inner
            .rooms
            .remove_if(room, |_, subscribers| subscribers.is_empty())
            .is_some()
        {
            info!("Room '{}' is empty, removed", room);
        }
    }

    /// Fan `text` out to the room. Returns how many subscribers it reached.
    pub fn publish(&self, room: &RoomId, text: Utf8Bytes) -> usize {
        if text.len() > self.inner.config.max_message_bytes {
            warn!(
                "Dropping {} byte message for room '{}' (limit {})",
                text.len(),
                room,
                self.inner.config.max_message_bytes
            );
            return 0;
        }

        let Some(subscribers) = self.inner.rooms.get(room) else {
            return 0;
        };

        let mut delivered = 0;
        for subscriber in subscribers.iter() {
            match subscriber.value().send(Message::Text(text.clone())) {
                Ok(()) => delivered += 1,
                Err(_) => debug!("Subscriber {} already gone", subscriber.key()),
            }
        }
        delivered
    }

    pub fn subscriber_count(&self, room: &RoomId) -> usize {
        self.inner
            .rooms
            .get(room)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.inner.rooms.len()
    }

    pub fn presence(&self, room: RoomId) -> RoomPresence {
        let subscribers = self.subscriber_count(&room);
        RoomPresence { room, subscribers }
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}
