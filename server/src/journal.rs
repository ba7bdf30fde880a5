//! Human-readable log of what happened in the game, drained by clients

use shared::{MoleId, PlayerName};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Something worth telling the players about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Joined(PlayerName),
    RejoinAttempted(PlayerName),
    Left(PlayerName),
    LeaveWithoutJoin(PlayerName),
    Started,
    Stopped,
    Hit { player: PlayerName, mole: MoleId },
    Missed { player: PlayerName, mole: MoleId },
    HitWhileUnregistered(PlayerName),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Joined(name) => write!(f, "{} joined the game", name),
            GameEvent::RejoinAttempted(name) => write!(f, "{} tried to join the game again!", name),
            GameEvent::Left(name) => write!(f, "{} left the game", name),
            GameEvent::LeaveWithoutJoin(name) => write!(
                f,
                "{} tried to leave the game, despite having not joined yet!",
                name
            ),
            GameEvent::Started => f.write_str("Game started!"),
            GameEvent::Stopped => f.write_str("Game stopped!"),
            GameEvent::Hit { player, mole } => write!(f, "{} hit mole {}", player, mole),
            GameEvent::Missed { player, mole } => write!(f, "{} missed mole {}", player, mole),
            GameEvent::HitWhileUnregistered(name) => {
                write!(f, "{} cannot hit moles, as they are not registered", name)
            }
        }
    }
}

/// Append-only queue of rendered events.
///
/// Reading drains the queue, so each event is delivered once.
#[derive(Debug, Default)]
pub struct EventJournal {
    events: Mutex<Vec<String>>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: GameEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.to_string());
    }

    /// Takes everything recorded since the previous drain, oldest first.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
