//! Shared application state for the API server.

use std::sync::Arc;

use tokio::sync::broadcast;

use krishi_core::GameSession;
use krishi_types::GameEvent;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. Every
/// handler goes through the one [`GameSession`], so commands from
/// different requests never interleave.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The running game.
    pub session: Arc<GameSession>,
}

impl AppState {
    /// Serve `session`.
    pub const fn new(session: Arc<GameSession>) -> Self {
        Self { session }
    }

    /// Subscribe to the game's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.session.subscribe()
    }
}
