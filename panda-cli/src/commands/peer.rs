use crate::args::PeerArgs;
use crate::commands::peer_action::{PeerAction, spawn_reader};
use anyhow::{Context, Result};
use colored::*;
use panda_core::ConnectionState;
use panda_session::native::RtcBackend;
use panda_session::{Session, SessionEvent, WsSignaling};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

pub async fn run(args: PeerArgs) -> Result<()> {
    let config = args.session_config();

    println!("{}", "🐼 PANDA TV".green().bold());
    println!("   Peer:  {}", config.peer_id.to_string().cyan());
    println!("   Room:  {}", config.room.to_string().cyan());
    println!("   Relay: {}", args.url);

    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let signaling = WsSignaling::connect(&args.url, &config.room, inbound_tx)
        .await
        .with_context(|| format!("Failed to reach relay at {}", args.url))?;

    let (session, handle, mut events) =
        Session::new(config, RtcBackend::new(), Arc::new(signaling), inbound_rx);
    let mut session_task = tokio::spawn(session.run());

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
    });

    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    spawn_reader(action_tx);

    loop {
        tokio::select! {
            action = action_rx.recv() => {
                let Some(cmd) = action.and_then(PeerAction::command) else {
                    break;
                };
                if handle.send(cmd).await.is_err() {
                    break;
                }
            }
            _ = &mut session_task => {
                println!("{}", "Session ended".yellow());
                let _ = printer.await;
                return Ok(());
            }
        }
    }

    if let Err(e) = handle.shutdown().await {
        warn!("Session already stopped: {}", e);
    }
    session_task.await.context("Session task panicked")?;
    let _ = printer.await;

    println!("{}", "👋 Bye".green());
    Ok(())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::StateChanged(state) => {
            let line = format!("● {}", state);
            let line = match state {
                ConnectionState::Connected => line.green().bold(),
                ConnectionState::Connecting | ConnectionState::New => line.yellow(),
                ConnectionState::Failed => line.red().bold(),
                ConnectionState::Disconnected | ConnectionState::Closed => line.dimmed(),
            };
            println!("{}", line);
        }
        SessionEvent::Signaling(info) => println!("  {}", info.to_string().cyan()),
        SessionEvent::RemoteTrack { kind, id } => {
            println!("{}", format!("  ▶ remote {} track {}", kind, id).magenta())
        }
        SessionEvent::MediaError(e) => {
            println!("{}", format!("  Could not access camera or microphone: {}", e).red())
        }
        SessionEvent::Error(e) => println!("{}", format!("  Error: {}", e).red().bold()),
    }
}
