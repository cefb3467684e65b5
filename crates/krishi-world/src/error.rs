//! Error types for the `krishi-world` crate.
//!
//! All fallible plot operations return [`WorldError`]. A failed operation
//! never leaves a plot partially modified.

use krishi_types::{CropId, FertilizerKind, PlotId};

/// Errors that can occur during plot operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// No plot with this id exists on the farm.
    #[error("plot not found: {0}")]
    PlotNotFound(PlotId),

    /// The crop id is not in the catalog.
    #[error("unknown crop: {0}")]
    UnknownCrop(CropId),

    /// The plot already holds a crop.
    #[error("plot {0} is already planted")]
    AlreadyPlanted(PlotId),

    /// The action needs a planted crop but the plot is empty.
    #[error("plot {0} has nothing planted")]
    NoPlot(PlotId),

    /// `none` is not something that can be applied.
    #[error("fertilizer kind {0:?} cannot be applied")]
    InvalidFertilizer(FertilizerKind),

    /// The crop has not reached stage 100 yet.
    #[error("plot {plot} is not ready for harvest (stage {growth_stage})")]
    NotReady {
        /// The plot.
        plot: PlotId,
        /// Its current growth stage.
        growth_stage: u32,
    },
}
