use clap::Parser;
use log::{error, info};
use server::config::GameConfig;
use server::game::Game;
use server::network::Server;
use server::service::GameService;
use shared::{SPAWN_INTERVAL_MS, WHACK_POINTS};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Spawner tick in milliseconds; one mole appears within each tick
    #[arg(short, long, default_value_t = SPAWN_INTERVAL_MS)]
    spawn_interval_ms: u64,

    /// Points awarded per successful whack
    #[arg(short, long, default_value_t = WHACK_POINTS)]
    whack_points: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let game = Game::new(GameConfig::new(args.spawn_interval_ms, args.whack_points)?);

    let config = game.config();
    info!(
        "Spawning a mole every {:?}, {} points per whack",
        config.spawn_interval, config.whack_points
    );

    let service = Arc::new(GameService::new(game.clone()));
    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, service).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    game.stop().await;

    Ok(())
}
