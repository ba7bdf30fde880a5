//! Error kinds surfaced by the session engine and its configuration

use shared::PlayerName;
use thiserror::Error;

/// Rejections of a disallowed transition.
///
/// Both kinds are non-fatal; a miss on `whack` is not an error and is
/// reported as `Ok(false)` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Player already registered: {0}")]
    AlreadyRegistered(PlayerName),

    #[error("Player not registered: {0}")]
    NotRegistered(PlayerName),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("spawn interval must be at least 1ms")]
    ZeroSpawnInterval,
}
