//! Background task that populates the session with moles while a game runs

use crate::game::SessionState;
use log::debug;
use rand::Rng;
use shared::MoleId;
use std::sync::Weak;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a running spawner task.
///
/// Owned by the session state; its presence is what marks the game as running.
#[derive(Debug)]
pub(crate) struct Spawner {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Spawner {
    /// Starts spawning into `state`, beginning at the first tick (time zero).
    ///
    /// The task only holds a weak reference so a dropped game does not keep
    /// its own spawner alive.
    pub(crate) fn launch(state: Weak<RwLock<SessionState>>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(state, period, cancel.clone()));

        Self { cancel, handle }
    }

    /// Signals cancellation and hands back the task handle so the caller can
    /// wait for it to finish.
    ///
    /// Must be called with the session write lock held: the task re-checks the
    /// token under that lock before every insertion, so nothing is inserted once
    /// the lock is released.
    pub(crate) fn cancel(self) -> JoinHandle<()> {
        self.cancel.cancel();
        self.handle
    }
}

async fn run(
    state: Weak<RwLock<SessionState>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let delay = jitter(period);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = async {
                ticker.tick().await;
                sleep(delay).await;
            } => {}
        }

        let Some(shared) = state.upgrade() else {
            break;
        };
        let mut session = shared.write().await;
        if cancel.is_cancelled() {
            break;
        }

        let mole = MoleId::random();
        session.moles.insert(mole);
        debug!("Spawned mole {} ({} active)", mole, session.moles.len());
    }

    debug!("Spawner stopped");
}

/// Uniform delay in `[0, period)`.
fn jitter(period: Duration) -> Duration {
    if period.is_zero() {
        return Duration::ZERO;
    }

    rand::thread_rng().gen_range(Duration::ZERO..period)
}
