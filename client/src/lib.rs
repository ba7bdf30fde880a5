//! # Whack-a-Mole Game Client Library
//!
//! Client side of the whack-a-mole server: a typed request/response
//! connection and an autoplaying player built on top of it.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! [`network::GameClient`] speaks the UDP protocol from the `shared` crate.
//! Every command gets a request id; a background receiver matches responses
//! to waiting requests, so one client can be used from many tasks at once.
//! Failure replies are mapped onto [`error::ClientError`] kinds that callers
//! can branch on (a name clash is distinct from an unknown player).
//!
//! ### Player Module (`player`)
//! [`player::Player`] joins a game, polls the active moles on a fixed
//! interval and whacks every one of them, and leaves again on request.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::GameClient;
//! use client::player::Player;
//! use shared::PlayerName;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(GameClient::connect("127.0.0.1:8080", Duration::from_secs(1)).await?);
//!     let player = Player::new(PlayerName::new("player-one"), Duration::from_millis(500));
//!
//!     player.join_game(&client).await?;
//!     player.autoplay(Arc::clone(&client));
//!
//!     tokio::time::sleep(Duration::from_secs(10)).await;
//!     player.leave_game(&client).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod network;
pub mod player;
