//! Error types for the `krishi-core` crate.
//!
//! Every command on the game store returns [`GameError`], which wraps the
//! domain crates' errors and classifies them with [`ErrorKind`] for the
//! command surface.

use krishi_ledger::LedgerError;
use krishi_progress::ProgressError;
use krishi_world::WorldError;

use crate::persistence::StorageError;

/// Coarse failure category shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The entity exists but is in the wrong state for the command.
    InvalidState,
    /// The crop has not reached harvest stage.
    NotReady,
    /// The coin balance cannot cover the cost.
    InsufficientFunds,
    /// No entity with the given id exists.
    UnknownEntity,
    /// Saving or loading the game failed.
    PersistenceFailure,
}

/// Errors returned by game store commands.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A plot or crop operation was rejected.
    #[error(transparent)]
    World(#[from] WorldError),

    /// A ledger operation was rejected.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A mission or quiz operation was rejected.
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Reading or writing the save failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A purchase named no items.
    #[error("purchase must contain at least one item")]
    EmptyPurchase,
}

impl GameError {
    /// The failure category.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::World(err) => match err {
                WorldError::PlotNotFound(_) | WorldError::UnknownCrop(_) => ErrorKind::UnknownEntity,
                WorldError::AlreadyPlanted(_) | WorldError::NoPlot(_) | WorldError::InvalidFertilizer(_) => {
                    ErrorKind::InvalidState
                }
                WorldError::NotReady { .. } => ErrorKind::NotReady,
            },
            Self::Ledger(LedgerError::InsufficientFunds { .. }) => ErrorKind::InsufficientFunds,
            Self::Progress(err) => match err {
                ProgressError::UnknownMission(_) | ProgressError::UnknownQuiz(_) => ErrorKind::UnknownEntity,
                ProgressError::MissionAlreadyCompleted(_)
                | ProgressError::PhotoProofRequired(_)
                | ProgressError::PhotoNotRequired(_)
                | ProgressError::PhotoAlreadySubmitted(_) => ErrorKind::InvalidState,
            },
            Self::Storage(_) => ErrorKind::PersistenceFailure,
            Self::EmptyPurchase => ErrorKind::InvalidState,
        }
    }
}

#[cfg(test)]
mod tests {
    use krishi_types::{FertilizerKind, MissionId, PlotId};

    use super::*;

    #[test]
    fn world_errors_are_classified() {
        let plot = PlotId::new();
        assert_eq!(GameError::from(WorldError::PlotNotFound(plot)).kind(), ErrorKind::UnknownEntity);
        assert_eq!(GameError::from(WorldError::AlreadyPlanted(plot)).kind(), ErrorKind::InvalidState);
        assert_eq!(
            GameError::from(WorldError::InvalidFertilizer(FertilizerKind::None)).kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            GameError::from(WorldError::NotReady { plot, growth_stage: 40 }).kind(),
            ErrorKind::NotReady
        );
    }

    #[test]
    fn ledger_and_progress_errors_are_classified() {
        let short = LedgerError::InsufficientFunds {
            requested: 10,
            available: 5,
        };
        assert_eq!(GameError::from(short).kind(), ErrorKind::InsufficientFunds);
        assert_eq!(
            GameError::from(ProgressError::UnknownMission(MissionId::from("x"))).kind(),
            ErrorKind::UnknownEntity
        );
        assert_eq!(
            GameError::from(ProgressError::MissionAlreadyCompleted(MissionId::from("x"))).kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(GameError::EmptyPurchase.kind(), ErrorKind::InvalidState);
    }
}
