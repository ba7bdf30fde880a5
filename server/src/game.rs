//! Authoritative session state: players, scores, moles and the spawner
//!
//! Every operation takes the single session lock for its whole duration, so
//! callers never observe a partially applied change. Snapshots take the read
//! side, everything else the write side. This matters most for `whack`, which
//! touches both a player's score and the mole set and must let exactly one of
//! several concurrent hits on the same mole succeed.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::spawner::Spawner;
use shared::{MoleId, PlayerName, PlayerScore};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    /// Registered players and their scores, ordered by name for stable listings
    pub(crate) players: BTreeMap<PlayerName, u32>,
    /// Moles that can currently be hit
    pub(crate) moles: BTreeSet<MoleId>,
    /// Present iff the game is running
    pub(crate) spawner: Option<Spawner>,
}

/// Shared handle to a game session.
///
/// Cloning is cheap and every clone refers to the same session.
#[derive(Debug, Clone)]
pub struct Game {
    state: Arc<RwLock<SessionState>>,
    config: GameConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Adds a player with a score of zero.
    pub async fn register(&self, name: PlayerName) -> Result<(), GameError> {
        let mut state = self.state.write().await;
        if state.players.contains_key(&name) {
            return Err(GameError::AlreadyRegistered(name));
        }

        state.players.insert(name, 0);
        Ok(())
    }

    /// Removes a player, discarding their score.
    pub async fn remove(&self, name: &PlayerName) -> Result<(), GameError> {
        let mut state = self.state.write().await;
        match state.players.remove(name) {
            Some(_) => Ok(()),
            None => Err(GameError::NotRegistered(name.clone())),
        }
    }

    pub async fn players(&self) -> Vec<PlayerScore> {
        let state = self.state.read().await;
        state
            .players
            .iter()
            .map(|(name, score)| PlayerScore {
                name: name.clone(),
                score: *score,
            })
            .collect()
    }

    /// Resets all scores and launches the spawner unless it is already running.
    pub async fn start(&self) {
        let mut state = self.state.write().await;
        state.players.values_mut().for_each(|score| *score = 0);

        if state.spawner.is_none() {
            state.spawner = Some(Spawner::launch(
                Arc::downgrade(&self.state),
                self.config.spawn_interval,
            ));
        }
    }

    /// Cancels the spawner if it is running and clears every mole.
    ///
    /// Returns only after the spawner task has finished. A panic inside the
    /// spawner is resumed here.
    pub async fn stop(&self) {
        let spawner = {
            let mut state = self.state.write().await;
            state.moles.clear();
            state.spawner.take().map(Spawner::cancel)
        };

        if let Some(handle) = spawner {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    std::panic::resume_unwind(e.into_panic());
                }
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.spawner.is_some()
    }

    pub async fn moles(&self) -> Vec<MoleId> {
        let state = self.state.read().await;
        state.moles.iter().copied().collect()
    }

    /// Attempts to hit `mole` on behalf of `name`.
    ///
    /// Returns `Ok(true)` and awards points if the mole was still active,
    /// `Ok(false)` if it was already gone or never existed.
    pub async fn whack(&self, mole: MoleId, name: &PlayerName) -> Result<bool, GameError> {
        let mut state = self.state.write().await;
        let SessionState { players, moles, .. } = &mut *state;

        let Some(score) = players.get_mut(name) else {
            return Err(GameError::NotRegistered(name.clone()));
        };

        if !moles.remove(&mole) {
            return Ok(false);
        }

        *score = score.saturating_add(self.config.whack_points);
        Ok(true)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
impl Game {
    /// Plants a mole directly, bypassing the spawner.
    pub(crate) async fn plant_mole(&self) -> MoleId {
        let mole = MoleId::random();
        self.state.write().await.moles.insert(mole);
        mole
    }
}
