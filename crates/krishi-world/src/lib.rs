//! Crops, plots, and weather for the Krishi farm simulation.
//!
//! This crate models the physical farm: a fixed grid of plots that crops
//! grow on, the catalog of plantable crops, and the weather that drives
//! growth.
//!
//! # Modules
//!
//! - [`crops`] -- The immutable crop catalog.
//! - [`environment`] -- Weather reports and the fixed/rotating weather system.
//! - [`error`] -- Error types for plot operations.
//! - [`farming`] -- [`Farm`] plot transitions, the growth tick, and yield.
//! - [`rotation`] -- Repeat-avoiding random picker shared by weather and tips.

pub mod crops;
pub mod environment;
pub mod error;
pub mod farming;
pub mod rotation;

// Re-export primary types at crate root.
pub use crops::CropCatalog;
pub use environment::{WeatherMode, WeatherSystem, weather_report};
pub use error::WorldError;
pub use farming::{
    Farm, GAUGE_MAX, GrowthRules, HarvestOutcome, TickReport, advance_plots, harvest_yield,
};
pub use rotation::RecentPicker;
