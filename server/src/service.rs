//! Command layer between the transport and the game engine
//!
//! Forwards each command to [`Game`], then records what happened in the
//! [`EventJournal`]. Engine outcomes are passed through unchanged.

use crate::error::GameError;
use crate::game::Game;
use crate::journal::{EventJournal, GameEvent};
use log::info;
use shared::{MoleId, PlayerName, PlayerScore};

#[derive(Debug, Default)]
pub struct GameService {
    game: Game,
    journal: EventJournal,
}

impl GameService {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            journal: EventJournal::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub async fn register(&self, name: PlayerName) -> Result<(), GameError> {
        info!("Registering player {}", name);
        match self.game.register(name.clone()).await {
            Ok(()) => {
                self.journal.record(GameEvent::Joined(name));
                Ok(())
            }
            Err(e) => {
                if let GameError::AlreadyRegistered(_) = e {
                    self.journal.record(GameEvent::RejoinAttempted(name));
                }
                Err(e)
            }
        }
    }

    pub async fn remove(&self, name: &PlayerName) -> Result<(), GameError> {
        info!("Removing player {}", name);
        match self.game.remove(name).await {
            Ok(()) => {
                self.journal.record(GameEvent::Left(name.clone()));
                Ok(())
            }
            Err(e) => {
                if let GameError::NotRegistered(_) = e {
                    self.journal.record(GameEvent::LeaveWithoutJoin(name.clone()));
                }
                Err(e)
            }
        }
    }

    pub async fn players(&self) -> Vec<PlayerScore> {
        self.game.players().await
    }

    pub async fn start(&self) {
        info!("Starting game");
        self.game.start().await;
        self.journal.record(GameEvent::Started);
    }

    pub async fn stop(&self) {
        info!("Stopping game");
        self.game.stop().await;
        self.journal.record(GameEvent::Stopped);
    }

    pub async fn moles(&self) -> Vec<MoleId> {
        self.game.moles().await
    }

    pub async fn whack(&self, mole: MoleId, name: &PlayerName) -> Result<bool, GameError> {
        match self.game.whack(mole, name).await {
            Ok(true) => {
                info!("{} hit mole {}", name, mole);
                self.journal.record(GameEvent::Hit {
                    player: name.clone(),
                    mole,
                });
                Ok(true)
            }
            Ok(false) => {
                self.journal.record(GameEvent::Missed {
                    player: name.clone(),
                    mole,
                });
                Ok(false)
            }
            Err(e) => {
                if let GameError::NotRegistered(_) = e {
                    self.journal.record(GameEvent::HitWhileUnregistered(name.clone()));
                }
                Err(e)
            }
        }
    }

    pub fn unread_events(&self) -> Vec<String> {
        self.journal.drain()
    }
}
