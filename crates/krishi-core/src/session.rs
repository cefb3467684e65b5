//! A running game: the store plus its timers, storage, and event fan-out.
//!
//! [`GameSession`] is the handle the API layer and the binary share. It
//! serializes all access to the [`GameStore`] through one mutex, publishes
//! the store's events on a broadcast channel after every call, and drives
//! three repeating timers through an injected [`Scheduler`]:
//!
//! | Timer    | Default  | Effect                                  |
//! |----------|----------|-----------------------------------------|
//! | growth   | 2 s      | [`GameStore::tick`]                     |
//! | autosave | 30 s     | writes the state to [`StateStorage`]    |
//! | tip      | 8 s      | [`GameStore::next_tip`]                 |

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{info, warn};

use krishi_types::GameEvent;

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::persistence::{StateStorage, load_state, save_state};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::state::StateSnapshot;
use crate::store::GameStore;

/// Buffer size of the event channel. Slow subscribers lag rather than
/// block the game.
pub const BROADCAST_CAPACITY: usize = 256;

/// State shared between the session handle and its timer tasks.
struct Shared {
    store: Mutex<GameStore>,
    /// Held across a whole save so writes land in snapshot order.
    save_lock: Mutex<()>,
    storage: Arc<dyn StateStorage>,
    storage_key: String,
    events: broadcast::Sender<GameEvent>,
}

impl Shared {
    fn with_store<R>(&self, f: impl FnOnce(&mut GameStore) -> R) -> R {
        let (result, events) = {
            let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            let result = f(&mut store);
            (result, store.drain_events())
        };
        for event in events {
            // No subscribers is fine.
            self.events.send(event).unwrap_or(0);
        }
        result
    }

    fn save(&self) -> Result<(), GameError> {
        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self.with_store(|store| store.prepare_save());
        save_state(self.storage.as_ref(), &self.storage_key, &state)?;
        self.with_store(|store| store.record_saved(&self.storage_key, state.saved_at));
        info!(key = %self.storage_key, tick = state.tick, coins = state.ledger.balance(), "game saved");
        Ok(())
    }

    fn autosave(&self) {
        if let Err(err) = self.save() {
            warn!(key = %self.storage_key, error = %err, "autosave failed; continuing in memory");
        }
    }
}

/// A live game with its timers.
pub struct GameSession {
    shared: Arc<Shared>,
    scheduler: Arc<dyn Scheduler>,
    timers: Mutex<Vec<TaskHandle>>,
    tick_interval: Duration,
    autosave_interval: Duration,
    tip_interval: Duration,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("storage_key", &self.shared.storage_key)
            .field("running", &self.is_running())
            .field("tick_interval", &self.tick_interval)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Restore the saved game (or start a new one) and wrap it in a
    /// session. Timers are not started until [`GameSession::start`].
    pub fn open(
        config: GameConfig,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        storage: Arc<dyn StateStorage>,
    ) -> Self {
        let state = load_state(storage.as_ref(), &config.storage.key, &config, clock.now());
        Self::new(GameStore::new(config, state, clock), scheduler, storage)
    }

    /// Wrap an existing store.
    pub fn new(store: GameStore, scheduler: Arc<dyn Scheduler>, storage: Arc<dyn StateStorage>) -> Self {
        let game = &store.config().game;
        let tick_interval = Duration::from_millis(game.tick_interval_ms);
        let autosave_interval = Duration::from_millis(game.autosave_interval_ms);
        let tip_interval = Duration::from_millis(game.tip_interval_ms);
        let storage_key = store.config().storage.key.clone();
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                store: Mutex::new(store),
                save_lock: Mutex::new(()),
                storage,
                storage_key,
                events,
            }),
            scheduler,
            timers: Mutex::new(Vec::new()),
            tick_interval,
            autosave_interval,
            tip_interval,
        }
    }

    /// Start the growth, autosave, and tip timers.
    ///
    /// Calling this on a running session restarts the timers instead of
    /// doubling them.
    pub fn start(&self) {
        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in timers.drain(..) {
            self.scheduler.cancel(handle);
        }

        let shared = Arc::clone(&self.shared);
        timers.push(self.scheduler.schedule_repeating(
            self.tick_interval,
            Box::new(move || {
                shared.with_store(GameStore::tick);
            }),
        ));

        let shared = Arc::clone(&self.shared);
        timers.push(
            self.scheduler
                .schedule_repeating(self.autosave_interval, Box::new(move || shared.autosave())),
        );

        let shared = Arc::clone(&self.shared);
        timers.push(self.scheduler.schedule_repeating(
            self.tip_interval,
            Box::new(move || {
                shared.with_store(GameStore::next_tip);
            }),
        ));

        info!(
            tick_ms = self.tick_interval.as_millis(),
            autosave_ms = self.autosave_interval.as_millis(),
            tip_ms = self.tip_interval.as_millis(),
            "game session started"
        );
    }

    /// Cancel all timers and write a final save.
    ///
    /// A failed final save is logged, not returned.
    pub fn stop(&self) {
        let handles: Vec<TaskHandle> = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            self.scheduler.cancel(handle);
        }
        self.shared.autosave();
        info!("game session stopped");
    }

    /// Whether the timers are running.
    pub fn is_running(&self) -> bool {
        !self.timers.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }

    /// Write the state now.
    pub fn save(&self) -> Result<(), GameError> {
        self.shared.save()
    }

    /// Run `f` with exclusive access to the store, then publish whatever
    /// events it produced.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut GameStore) -> R) -> R {
        self.shared.with_store(f)
    }

    /// A read-only view of the game.
    pub fn snapshot(&self) -> StateSnapshot {
        self.with_store(|store| store.snapshot())
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.shared.events.subscribe()
    }
}
