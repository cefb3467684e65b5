//! Enumeration types for the Krishi farm simulation.
//!
//! All enums serialize as `snake_case` strings so the dashboard and the
//! YAML configuration can refer to them as `"sunny"`, `"organic"`, etc.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Current weather condition, consumed by the growth tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Weather {
    /// Clear skies. Growth +2 per tick.
    Sunny,
    /// Rainfall. Growth +3 per tick.
    Rainy,
    /// Overcast. Growth +1 per tick.
    Cloudy,
}

impl Weather {
    /// Every weather variant, in catalog order.
    pub const ALL: [Self; 3] = [Self::Sunny, Self::Rainy, Self::Cloudy];
}

// ---------------------------------------------------------------------------
// Fertilizer
// ---------------------------------------------------------------------------

/// Fertilizer last applied to a plot.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FertilizerKind {
    /// Nothing applied since the plot was last reset.
    #[default]
    None,
    /// Compost, vermicompost, panchagavya. Larger health gain, raises
    /// sustainability.
    Organic,
    /// Synthetic fertilizer. Smaller health gain, lowers sustainability.
    Chemical,
}

// ---------------------------------------------------------------------------
// Crop category
// ---------------------------------------------------------------------------

/// Broad agronomic category of a crop type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CropCategory {
    /// Wheat, rice, corn.
    Cereal,
    /// Lentils, beans, gram.
    Pulse,
    /// Cotton and other non-food crops.
    Cash,
    /// Tomato and other vegetables.
    Vegetable,
}

// ---------------------------------------------------------------------------
// Mission difficulty
// ---------------------------------------------------------------------------

/// Difficulty rating shown on a mission card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Difficulty {
    /// Completable in a single session.
    Easy,
    /// Requires several care actions.
    Medium,
    /// Requires a full crop cycle.
    Hard,
}

// ---------------------------------------------------------------------------
// Ledger reasons
// ---------------------------------------------------------------------------

/// Why the coin balance moved. Recorded on every ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LedgerReason {
    /// Opening balance of a new farm.
    OpeningBalance,
    /// Reward for planting a crop.
    Planting,
    /// Reward for watering a crop.
    Watering,
    /// Reward for applying fertilizer.
    Fertilizing,
    /// Harvest yield.
    Harvest,
    /// One-time mission reward.
    MissionReward,
    /// Bonus for submitting mission photo proof.
    PhotoBonus,
    /// One-time achievement reward.
    AchievementReward,
    /// One-time quiz reward.
    QuizReward,
    /// Store purchase (debit).
    Purchase,
    /// Balance repaired while restoring a saved game.
    Restore,
    /// Older entries folded into one carried-forward balance.
    Checkpoint,
}
