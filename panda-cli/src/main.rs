mod args;
mod commands;
mod logging;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    match cli.command {
        Commands::Relay(args) => commands::relay::run(args).await,
        Commands::Peer(args) => commands::peer::run(args).await,
    }
}
