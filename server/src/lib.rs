//! # Whack-a-Mole Game Server Library
//!
//! This library provides the authoritative server for a multiplayer
//! whack-a-mole session. Players join a single shared session, a background
//! spawner pops up moles while the game runs, and players score points by
//! hitting moles before anybody else does.
//!
//! ## Core Responsibilities
//!
//! ### Session Engine
//! [`game::Game`] owns every piece of mutable state: registered players and
//! their scores, the active moles, and the spawner. All operations go through
//! one lock, so concurrent commands observe a single total order. Of two
//! players racing for the same mole exactly one scores.
//!
//! ### Spawner
//! While the game runs, a background task inserts one fresh mole at a random
//! point within every spawn interval. Stopping the game cancels the task and
//! waits for it, so no mole can appear after `stop` has returned.
//!
//! ### Event Journal
//! The command layer records a human-readable line for every join, leave,
//! start, stop, hit and miss. Clients drain these to show what happened.
//!
//! ## Module Organization
//!
//! - `game`: session state and the engine operations
//! - `spawner`: cancellable background mole spawner
//! - `journal`: drain-on-read event log
//! - `service`: command layer tying the engine and the journal together
//! - `network`: UDP transport mapping packets to service calls
//! - `config`: session tunables
//! - `error`: engine error kinds
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::GameConfig;
//! use server::game::Game;
//! use server::network::Server;
//! use server::service::GameService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let service = Arc::new(GameService::new(Game::new(GameConfig::default())));
//!     let server = Server::bind("127.0.0.1:8080", service)
//!         .await
//!         .map_err(|e| e.to_string())?;
//!
//!     // Answers register/whack/start/stop/... requests until the task ends
//!     server.run().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod journal;
pub mod network;
pub mod service;
mod spawner;
