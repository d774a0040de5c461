use crate::error::{Result, SessionError};
use tokio::sync::mpsc;

/// User actions, delivered to the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Connect,
    Disconnect,
    NextPartner,
    Shutdown,
}

/// Cloneable remote control for a running `Session`.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { command_tx }
    }

    pub async fn send(&self, cmd: SessionCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::ChannelClosed)
    }

    pub async fn connect(&self) -> Result<()> {
        self.send(SessionCommand::Connect).await
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.send(SessionCommand::Disconnect).await
    }

    pub async fn next_partner(&self) -> Result<()> {
        self.send(SessionCommand::NextPartner).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown).await
    }
}
