//! Game store, timers, persistence, and session orchestration for the
//! Krishi farm simulation.
//!
//! This crate ties the domain crates together into a playable game: one
//! [`GameStore`] owns all mutable state, a [`GameSession`] drives it with
//! repeating timers and saves it, and events flow out on a broadcast
//! channel for the dashboard.
//!
//! # Modules
//!
//! - [`clock`] -- Injectable wall-clock source.
//! - [`config`] -- Configuration loading from `krishi-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`GameError`] and its [`ErrorKind`] classification.
//! - [`persistence`] -- [`StateStorage`] backends and forgiving state reload.
//! - [`scheduler`] -- [`Scheduler`] trait with tokio and manual backends.
//! - [`session`] -- [`GameSession`], the running game.
//! - [`state`] -- The persisted [`GameState`] and the UI snapshot.
//! - [`store`] -- [`GameStore`], the command surface.

pub mod clock;
pub mod config;
pub mod error;
pub mod persistence;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use error::{ErrorKind, GameError};
pub use persistence::{FileStorage, MemoryStorage, StateStorage, StorageError, load_state, save_state};
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskHandle, TokioScheduler};
pub use session::{BROADCAST_CAPACITY, GameSession};
pub use state::{GameState, StateSnapshot};
pub use store::GameStore;
