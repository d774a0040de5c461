use crate::relay::{Relay, RelayConfig, presence_handler, ws_handler};
use anyhow::Context;
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(relay: Relay) -> Router {
    Router::new()
        .route("/ws/{room}", get(ws_handler))
        .route("/rooms/{room}", get(presence_handler))
        .with_state(relay)
}

/// Serve `relay` on an already bound listener until the process stops.
pub async fn serve_on(listener: TcpListener, relay: Relay) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("listener has no address")?;
    info!("Relay listening on ws://{}/ws/{{room}}", addr);

    axum::serve(listener, router(relay))
        .await
        .context("relay server stopped")
}

pub async fn serve(addr: SocketAddr, config: RelayConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    serve_on(listener, Relay::new(config)).await
}
