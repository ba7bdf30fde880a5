//! A participant that joins a game and whacks every mole it sees

use crate::error::ClientError;
use crate::network::GameClient;
use log::{error, info};
use shared::{MoleId, PlayerName};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub struct Player {
    name: PlayerName,
    registered: AtomicBool,
    poll_interval: Duration,
    autoplay: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    pub fn new(name: PlayerName, poll_interval: Duration) -> Self {
        Self {
            name,
            registered: AtomicBool::new(false),
            poll_interval,
            autoplay: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    pub fn is_playing(&self) -> bool {
        self.autoplay
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Registers with the server unless already joined.
    ///
    /// A name clash counts as joined: the clash may well be our own earlier
    /// registration whose reply got lost.
    pub async fn join_game(&self, client: &GameClient) -> Result<(), ClientError> {
        if self.is_registered() {
            info!("I'm already registered!");
            return Ok(());
        }

        match client.register(&self.name).await {
            Ok(()) => info!("Successfully joined the game"),
            Err(ClientError::AlreadyRegistered(_)) => {
                info!("Name already registered in game - could be by me, or could be someone else!")
            }
            Err(e) => {
                info!("Game registration failed: {}", e);
                return Err(ClientError::JoinFailed(Box::new(e)));
            }
        }

        self.registered.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stops playing and deregisters. Not being registered counts as left.
    pub async fn leave_game(&self, client: &GameClient) -> Result<(), ClientError> {
        self.pause();

        match client.deregister(&self.name).await {
            Ok(()) => info!("Successfully left the game"),
            Err(ClientError::NotRegistered(_)) => info!("Player not registered"),
            Err(e) => {
                info!("Could not leave the game: {}", e);
                return Err(ClientError::LeaveFailed(Box::new(e)));
            }
        }

        self.registered.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Starts whacking moles every poll interval, all moles of a tick at once.
    ///
    /// Does nothing unless joined and not already playing. Returns whether a
    /// new autoplay loop was started.
    pub fn autoplay(&self, client: Arc<GameClient>) -> bool {
        let mut autoplay = self.autoplay.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_registered() || autoplay.as_ref().is_some_and(|h| !h.is_finished()) {
            return false;
        }

        let name = self.name.clone();
        let poll_interval = self.poll_interval;
        *autoplay = Some(tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let moles = match client.moles().await {
                    Ok(moles) => moles,
                    Err(e) => {
                        info!("Failed to get moles: {}", e);
                        continue;
                    }
                };

                let whacks: Vec<_> = moles
                    .into_iter()
                    .map(|mole| {
                        let client = Arc::clone(&client);
                        let name = name.clone();
                        tokio::spawn(async move { whack_mole(&client, &name, mole).await })
                    })
                    .collect();

                for whack in whacks {
                    if let Err(e) = whack.await {
                        error!("Whack task failed: {}", e);
                    }
                }
            }
        }));

        true
    }

    pub fn pause(&self) {
        if let Some(handle) = self
            .autoplay
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.pause();
    }
}

async fn whack_mole(client: &GameClient, name: &PlayerName, mole: MoleId) {
    info!("Whacking mole {}", mole);
    match client.whack(name, mole).await {
        Ok(true) => info!("Successfully hit mole"),
        Ok(false) => info!("Failed to hit mole"),
        Err(ClientError::NotRegistered(_)) => {
            error!("Could not whack mole, as player is not registered")
        }
        Err(e) => info!("Could not whack mole: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::fake_server;
    use shared::{Command, Reply};
    use std::sync::atomic::AtomicUsize;
    use tokio_test::{assert_err, assert_ok};

    async fn client_for(addr: std::net::SocketAddr) -> Arc<GameClient> {
        Arc::new(
            GameClient::connect(&addr.to_string(), Duration::from_millis(200))
                .await
                .unwrap(),
        )
    }

    fn dan() -> Player {
        Player::new(PlayerName::new("dan"), Duration::from_millis(20))
    }

    #[tokio::test]
    async fn test_join_game() {
        let addr = fake_server(|command| match command {
            Command::Register { .. } => Some(Reply::Done),
            _ => None,
        })
        .await;
        let client = client_for(addr).await;
        let player = dan();

        assert_ok!(player.join_game(&client).await);
        assert!(player.is_registered());

        // Second join is answered locally
        assert_ok!(player.join_game(&client).await);
    }

    #[tokio::test]
    async fn test_join_game_when_name_taken() {
        let addr = fake_server(|command| match command {
            Command::Register { .. } => Some(Reply::Conflict {
                reason: "Player already registered: dan".to_string(),
            }),
            _ => None,
        })
        .await;
        let client = client_for(addr).await;
        let player = dan();

        assert_ok!(player.join_game(&client).await);
        assert!(player.is_registered());
    }

    #[tokio::test]
    async fn test_join_game_failure() {
        let addr = fake_server(|_| None).await;
        let client = client_for(addr).await;
        let player = dan();

        let err = assert_err!(player.join_game(&client).await);
        assert!(matches!(err, ClientError::JoinFailed(inner) if matches!(*inner, ClientError::Timeout(_))));
        assert!(!player.is_registered());
    }

    #[tokio::test]
    async fn test_leave_game_when_not_registered() {
        let addr = fake_server(|command| match command {
            Command::Register { .. } => Some(Reply::Done),
            Command::Deregister { .. } => Some(Reply::BadRequest {
                reason: "Player not registered: dan".to_string(),
            }),
            _ => None,
        })
        .await;
        let client = client_for(addr).await;
        let player = dan();

        assert_ok!(player.join_game(&client).await);
        assert_ok!(player.leave_game(&client).await);
        assert!(!player.is_registered());
    }

    #[tokio::test]
    async fn test_leave_game_failure() {
        let addr = fake_server(|command| match command {
            Command::Deregister { .. } => Some(Reply::ServerError {
                reason: "boom".to_string(),
            }),
            _ => None,
        })
        .await;
        let client = client_for(addr).await;

        let err = assert_err!(dan().leave_game(&client).await);
        assert!(matches!(err, ClientError::LeaveFailed(_)));
    }

    #[tokio::test]
    async fn test_autoplay_requires_registration() {
        let addr = fake_server(|_| None).await;
        let client = client_for(addr).await;
        let player = dan();

        assert!(!player.autoplay(client));
        assert!(!player.is_playing());
    }

    #[tokio::test]
    async fn test_autoplay_whacks_listed_moles() {
        let whacks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&whacks);
        let addr = fake_server(move |command| match command {
            Command::Register { .. } => Some(Reply::Done),
            Command::ListMoles => Some(Reply::Moles(vec![MoleId::random(), MoleId::random()])),
            Command::Whack { .. } => {
                counter.fetch_add(1, Ordering::SeqCst);
                Some(Reply::Hit)
            }
            _ => None,
        })
        .await;
        let client = client_for(addr).await;
        let player = dan();
        assert_ok!(player.join_game(&client).await);

        assert!(player.autoplay(Arc::clone(&client)));
        assert!(!player.autoplay(Arc::clone(&client)));
        assert!(player.is_playing());

        tokio::time::timeout(Duration::from_secs(2), async {
            while whacks.load(Ordering::SeqCst) < 4 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("autoplay never whacked");

        player.pause();
        assert!(!player.is_playing());
        player.pause();
    }

    #[tokio::test]
    async fn test_autoplay_whacks_moles_concurrently() {
        let stuck = MoleId::random();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let addr = fake_server(move |command| match command {
            Command::Register { .. } => Some(Reply::Done),
            Command::ListMoles => Some(Reply::Moles(vec![stuck, MoleId::random()])),
            // Never answered, so this whack waits out the full timeout
            Command::Whack { mole, .. } if mole == stuck => None,
            Command::Whack { .. } => {
                counter.fetch_add(1, Ordering::SeqCst);
                Some(Reply::Hit)
            }
            _ => None,
        })
        .await;
        let client = Arc::new(
            GameClient::connect(&addr.to_string(), Duration::from_secs(5))
                .await
                .unwrap(),
        );
        let player = Player::new(PlayerName::new("dan"), Duration::from_secs(10));
        assert_ok!(player.join_game(&client).await);

        assert!(player.autoplay(Arc::clone(&client)));

        tokio::time::timeout(Duration::from_secs(1), async {
            while hits.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("a slow whack held up the rest of the tick");

        player.pause();
    }
}
