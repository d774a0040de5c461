use anyhow::{Result, bail};
use colored::*;
use dialoguer::Select;
use panda_session::SessionCommand;
use std::io::{BufRead, IsTerminal};
use std::str::FromStr;
use tokio::sync::mpsc;

/// What the user can do from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerAction {
    Connect,
    NextPartner,
    Disconnect,
    Quit,
}

impl PeerAction {
    pub const ALL: [PeerAction; 4] = [
        PeerAction::Connect,
        PeerAction::NextPartner,
        PeerAction::Disconnect,
        PeerAction::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PeerAction::Connect => "Connect",
            PeerAction::NextPartner => "Next partner",
            PeerAction::Disconnect => "Disconnect",
            PeerAction::Quit => "Quit",
        }
    }

    /// `None` for `Quit`, which ends the loop instead of reaching the session.
    pub fn command(self) -> Option<SessionCommand> {
        match self {
            PeerAction::Connect => Some(SessionCommand::Connect),
            PeerAction::NextPartner => Some(SessionCommand::NextPartner),
            PeerAction::Disconnect => Some(SessionCommand::Disconnect),
            PeerAction::Quit => None,
        }
    }
}

impl FromStr for PeerAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "connect" => Ok(PeerAction::Connect),
            "n" | "next" => Ok(PeerAction::NextPartner),
            "d" | "disconnect" => Ok(PeerAction::Disconnect),
            "q" | "quit" | "exit" => Ok(PeerAction::Quit),
            other => bail!("unknown command '{other}' (connect, next, disconnect, quit)"),
        }
    }
}

/// Read actions on a plain thread and forward them to `tx`.
///
/// A terminal gets a menu; piped input is read one command per line. End of
/// input counts as `Quit`.
pub fn spawn_reader(tx: mpsc::UnboundedSender<PeerAction>) {
    std::thread::spawn(move || {
        if std::io::stdin().is_terminal() {
            read_menu(&tx);
        } else {
            read_lines(&tx);
        }
        let _ = tx.send(PeerAction::Quit);
    });
}

fn read_menu(tx: &mpsc::UnboundedSender<PeerAction>) {
    let labels: Vec<&str> = PeerAction::ALL.iter().map(|a| a.label()).collect();
    loop {
        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact_opt();

        match choice {
            Ok(Some(index)) => {
                let action = PeerAction::ALL[index];
                if tx.send(action).is_err() || action == PeerAction::Quit {
                    return;
                }
            }
            Ok(None) => return,
            Err(e) => {
                eprintln!("{}", format!("Menu failed: {e}").red());
                return;
            }
        }
    }
}

fn read_lines(tx: &mpsc::UnboundedSender<PeerAction>) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            return;
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<PeerAction>() {
            Ok(action) => {
                if tx.send(action).is_err() || action == PeerAction::Quit {
                    return;
                }
            }
            Err(e) => eprintln!("{}", e.to_string().yellow()),
        }
    }
}
