//! Error types for the `krishi-progress` crate.

use krishi_types::{MissionId, QuizId};

/// Errors that can occur while completing missions or submitting quizzes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// No mission with this id exists.
    #[error("unknown mission: {0}")]
    UnknownMission(MissionId),

    /// The mission reward was already granted.
    #[error("mission {0} is already completed")]
    MissionAlreadyCompleted(MissionId),

    /// The mission needs a photo before it can be completed.
    #[error("mission {0} requires photo proof before completion")]
    PhotoProofRequired(MissionId),

    /// Photo proof was submitted for a mission that does not take one.
    #[error("mission {0} does not take photo proof")]
    PhotoNotRequired(MissionId),

    /// The photo bonus for this mission was already granted.
    #[error("photo proof for mission {0} was already submitted")]
    PhotoAlreadySubmitted(MissionId),

    /// No quiz with this id exists.
    #[error("unknown quiz: {0}")]
    UnknownQuiz(QuizId),
}
