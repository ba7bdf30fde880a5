use clap::Parser;
use client::network::GameClient;
use client::player::Player;
use log::{info, warn};
use shared::PlayerName;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Name to play under
    #[arg(short = 'n', long, default_value = "player-one")]
    name: String,

    /// How often to look for moles, in milliseconds
    #[arg(short = 'i', long, default_value = "500")]
    poll_interval_ms: u64,

    /// How long to wait for each server response, in milliseconds
    #[arg(short = 't', long, default_value = "1000")]
    timeout_ms: u64,

    /// Start the game on launch and stop it on exit
    #[arg(long)]
    host_game: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let client = Arc::new(
        GameClient::connect(&args.server, Duration::from_millis(args.timeout_ms)).await?,
    );
    info!("Talking to server at {}", client.server_addr());
    let player = Player::new(
        PlayerName::new(args.name),
        Duration::from_millis(args.poll_interval_ms),
    );

    player.join_game(&client).await?;
    if args.host_game {
        client.start().await?;
    }
    player.autoplay(Arc::clone(&client));

    info!("Playing as {}, press Ctrl+C to leave", player.name());
    tokio::signal::ctrl_c().await?;

    player.pause();
    match client.players().await {
        Ok(players) => {
            for entry in players {
                info!("{}: {}", entry.name, entry.score);
            }
        }
        Err(e) => warn!("Could not fetch final scores: {}", e),
    }

    if args.host_game {
        client.stop().await?;
    }
    player.leave_game(&client).await?;

    Ok(())
}
