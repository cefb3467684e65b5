//! Shared type definitions for the Krishi farm simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Krishi workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the farm dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers (UUID wrappers and catalog keys)
//! - [`enums`] -- Enumeration types (weather, fertilizer, difficulty, ledger reasons)
//! - [`structs`] -- Core entity structs (plots, missions, quizzes, stats, ledger)
//! - [`events`] -- Events emitted to the dashboard

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CropCategory, Difficulty, FertilizerKind, LedgerReason, Weather};
pub use events::{EventPayload, GameEvent};
pub use ids::{AchievementId, CropId, EventId, MissionId, PlotId, QuestionId, QuizId, TipId};
pub use structs::{
    Achievement, AchievementCondition, CropType, FarmStats, GameStats, LedgerEntry, Mission, Plot,
    PurchaseItem, Quiz, QuizAnswers, QuizQuestion, Tip, WeatherReport,
};
