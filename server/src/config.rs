//! Tunables for a game session

use crate::error::ConfigError;
use shared::{SPAWN_INTERVAL_MS, WHACK_POINTS};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Spawner tick; one mole appears at a random point within each tick.
    pub spawn_interval: Duration,
    /// Points added to a player's score per successful whack.
    pub whack_points: u32,
}

impl GameConfig {
    /// Builds a config from command-line style millisecond values.
    ///
    /// The spawn interval must be non-zero.
    pub fn new(spawn_interval_ms: u64, whack_points: u32) -> Result<Self, ConfigError> {
        if spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }

        Ok(Self {
            spawn_interval: Duration::from_millis(spawn_interval_ms),
            whack_points,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_interval: Duration::from_millis(SPAWN_INTERVAL_MS),
            whack_points: WHACK_POINTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.spawn_interval, Duration::from_millis(500));
        assert_eq!(config.whack_points, 10);
    }

    #[test]
    fn test_new_config() {
        let config = GameConfig::new(250, 5).unwrap();
        assert_eq!(config.spawn_interval, Duration::from_millis(250));
        assert_eq!(config.whack_points, 5);
    }

    #[test]
    fn test_zero_spawn_interval_rejected() {
        assert_eq!(GameConfig::new(0, 10), Err(ConfigError::ZeroSpawnInterval));
    }
}
