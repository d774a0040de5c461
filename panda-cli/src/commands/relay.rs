use crate::args::RelayArgs;
use anyhow::Result;
use colored::*;

pub async fn run(args: RelayArgs) -> Result<()> {
    println!(
        "{}",
        format!("🐼 Starting PANDA relay on {}", args.listen)
            .green()
            .bold()
    );
    println!("   Rooms:    ws://{}/ws/<room>", args.listen);
    println!("   Presence: http://{}/rooms/<room>", args.listen);

    panda_relay::serve(args.listen, args.relay_config()).await
}
