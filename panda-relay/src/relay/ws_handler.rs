use crate::relay::{Relay, RoomPresence};
use axum::Json;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use panda_core::RoomId;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    State(relay): State<Relay>,
) -> impl IntoResponse {
    let room = RoomId::from(room);

    ws.on_upgrade(move |socket| handle_socket(socket, room, relay))
}

pub async fn presence_handler(
    Path(room): Path<String>,
    State(relay): State<Relay>,
) -> Json<RoomPresence> {
    Json(relay.presence(RoomId::from(room)))
}

async fn handle_socket(socket: WebSocket, room: RoomId, relay: Relay) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let subscriber = relay.subscribe(room.clone(), tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();
        let room = room.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        let delivered = relay.publish(&room, text);
                        debug!("Fanned out message to {} subscribers of '{}'", delivered, room);
                    }
                    Message::Binary(data) => {
                        debug!("Ignoring {} byte binary frame from {}", data.len(), subscriber);
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    relay.unsubscribe(&room, &subscriber);
    info!("Subscriber {} left room '{}'", subscriber, room);
}
