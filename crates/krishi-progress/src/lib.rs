//! Player progression for the Krishi farm simulation.
//!
//! Everything here gates coin rewards behind one-time conditions. The
//! trackers never touch the ledger themselves: each operation returns the
//! reward to credit and the caller applies it.
//!
//! # Modules
//!
//! - [`missions`] -- Mission tracker with photo proof.
//! - [`achievements`] -- Threshold achievements over aggregate farm stats.
//! - [`quiz`] -- Library quiz scoring.
//! - [`tips`] -- Farming tip rotation.
//! - [`error`] -- Error types.

pub mod achievements;
pub mod error;
pub mod missions;
pub mod quiz;
pub mod tips;

// Re-export primary types at crate root.
pub use achievements::{AchievementBoard, DEFAULT_ACHIEVEMENT_REWARD, Unlocked, condition_met};
pub use error::ProgressError;
pub use missions::{MissionCompletion, MissionTracker, is_overdue};
pub use quiz::{QuizBook, QuizOutcome, count_correct, meets_threshold, score_percent};
pub use tips::{DEFAULT_TIP_WINDOW, TipRotator, builtin_tips};
