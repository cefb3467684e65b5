//! Command API server for the Krishi farm simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for reading the game and issuing player commands
//!   (plant, water, fertilize, harvest, quizzes, missions, purchases)
//! - **`WebSocket` endpoint** (`/ws/events`) streaming every game event
//!   via [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! Handlers call straight into the shared [`GameSession`], which runs each
//! command to completion under its lock and publishes the resulting events.
//! Rejected commands become JSON error bodies with a status code derived
//! from the failure kind.
//!
//! [`GameSession`]: krishi_core::GameSession

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
