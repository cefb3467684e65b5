//! Core entity structs for the Krishi farm simulation.
//!
//! These are plain data carriers. State transitions live in the crates that
//! own each entity (`krishi-world` for plots, `krishi-ledger` for coins,
//! `krishi-progress` for missions, achievements, and quizzes).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CropCategory, Difficulty, FertilizerKind, LedgerReason, Weather};
use crate::ids::{AchievementId, CropId, MissionId, PlotId, QuestionId, QuizId, TipId};

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

/// One farming cell.
///
/// Invariants maintained by `krishi-world`:
/// - `harvest_ready` implies `planted`.
/// - `harvest_ready` is true iff `growth_stage == 100`.
/// - An empty plot has `growth_stage == 0`, `fertilizer == None`, and no crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Plot {
    /// Stable identifier, unique within the farm.
    pub id: PlotId,
    /// Crop currently growing, if any.
    pub crop: Option<CropId>,
    /// Growth progress, 0-100.
    pub growth_stage: u32,
    /// Plant health, 0-100.
    pub health: u32,
    /// Soil moisture, 0-100.
    pub water_level: u32,
    /// Fertilizer applied during the current planting.
    pub fertilizer: FertilizerKind,
    /// Environmental quality of the plot's treatment, 0-100.
    pub sustainability_score: u32,
    /// Whether a crop is in the ground.
    pub planted: bool,
    /// When the current crop was planted.
    pub planted_at: Option<DateTime<Utc>>,
    /// Whether the crop has reached stage 100.
    pub harvest_ready: bool,
}

// ---------------------------------------------------------------------------
// Crop catalog
// ---------------------------------------------------------------------------

/// An immutable crop catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CropType {
    /// Catalog key.
    pub id: CropId,
    /// Display name.
    pub name: String,
    /// Agronomic category.
    pub category: CropCategory,
    /// Base sustainability contribution of growing this crop, 0-100.
    pub base_sustainability: u32,
}

// ---------------------------------------------------------------------------
// Weather report
// ---------------------------------------------------------------------------

/// The current environmental condition with its auxiliary figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherReport {
    /// The weather condition driving growth.
    pub weather: Weather,
    /// Air temperature in degrees Celsius.
    pub temperature_c: i32,
    /// Relative humidity, percent.
    pub humidity_pct: u32,
    /// Human-readable effect on crops.
    pub effect: String,
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// A checklist-style side quest with a one-time coin reward.
///
/// `requirements` is display-only text; completion is reported by the
/// player, not derived from stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mission {
    /// Catalog key.
    pub id: MissionId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Ordered requirement checklist (free text).
    pub requirements: Vec<String>,
    /// Coins granted on completion.
    pub reward: u64,
    /// Set once, never cleared.
    pub completed: bool,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// Informational deadline.
    pub deadline: DateTime<Utc>,
    /// Whether completion requires a photo submission first.
    pub requires_photo_proof: bool,
    /// Whether a photo has been submitted for this mission.
    #[serde(default)]
    pub photo_submitted: bool,
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// Threshold an achievement tests against [`FarmStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "stat", content = "threshold", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AchievementCondition {
    /// `crops_grown >= n`.
    CropsGrown(u64),
    /// `plants_watered >= n`.
    PlantsWatered(u64),
    /// `soil_health >= n`.
    SoilHealth(u32),
    /// `co2_reduced_g >= n`.
    Co2ReducedGrams(u64),
}

/// A one-time, irreversible unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Achievement {
    /// Catalog key.
    pub id: AchievementId,
    /// Display name (e.g. "Green Thumb").
    pub name: String,
    /// What the player did to earn it.
    pub description: String,
    /// Unlock predicate.
    pub condition: AchievementCondition,
    /// Locked -> unlocked only.
    pub unlocked: bool,
    /// Coins granted on unlock.
    pub reward: u64,
}

// ---------------------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------------------

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuizQuestion {
    /// Key, unique within the quiz.
    pub id: QuestionId,
    /// Question text.
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_option: usize,
    /// Shown after submission.
    pub explanation: String,
}

/// A library quiz with a passing threshold and a one-time reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Quiz {
    /// Catalog key.
    pub id: QuizId,
    /// Library topic the quiz belongs to.
    pub topic_id: String,
    /// Display title.
    pub title: String,
    /// Ordered questions.
    pub questions: Vec<QuizQuestion>,
    /// Minimum percentage to pass, 0-100.
    pub passing_score: u32,
    /// Coins granted on the first pass.
    pub coin_reward: u64,
    /// Set on the first pass, never cleared.
    #[serde(default)]
    pub completed: bool,
}

/// Answers submitted for one quiz attempt: question -> selected option.
pub type QuizAnswers = BTreeMap<QuestionId, usize>;

// ---------------------------------------------------------------------------
// Aggregate stats
// ---------------------------------------------------------------------------

/// Counters accumulated from plot actions. Sole input to achievement
/// predicates. Every field only ever increases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FarmStats {
    /// Crops harvested.
    pub crops_grown: u64,
    /// Water commands issued.
    pub plants_watered: u64,
    /// Farm soil health gauge, 0-100.
    pub soil_health: u32,
    /// Carbon dioxide emissions avoided, in grams.
    pub co2_reduced_g: u64,
}

/// Progression counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStats {
    /// Sum of all harvest yields.
    pub total_yield: u64,
    /// Experience points (one per unit of yield).
    pub experience: u64,
}

impl GameStats {
    /// Experience needed per farmer level.
    pub const XP_PER_LEVEL: u64 = 1000;

    /// Farmer level derived from experience (starts at 1).
    pub const fn level(&self) -> u64 {
        (self.experience / Self::XP_PER_LEVEL).saturating_add(1)
    }
}

// ---------------------------------------------------------------------------
// Ledger entries
// ---------------------------------------------------------------------------

/// One audited movement of the coin balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerEntry {
    /// Position in the ledger (0-based, gap-free).
    pub sequence: u64,
    /// Why the balance moved.
    pub reason: LedgerReason,
    /// Signed delta the caller asked for.
    pub requested: i64,
    /// Signed delta actually applied after clamping at zero.
    pub applied: i64,
    /// Balance after the entry.
    pub balance_after: u64,
    /// Wall-clock time of the entry.
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tips and store
// ---------------------------------------------------------------------------

/// A short farming tip shown in the dashboard popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tip {
    /// Catalog key.
    pub id: TipId,
    /// Topic label (e.g. "Soil").
    pub category: String,
    /// Tip text.
    pub text: String,
}

/// A line in a store purchase. The catalog itself lives in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PurchaseItem {
    /// Store item name, for the audit log and notifications.
    pub name: String,
    /// Price in coins.
    pub cost: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_starts_at_one() {
        let stats = GameStats::default();
        assert_eq!(stats.level(), 1);
    }

    #[test]
    fn level_increments_every_thousand_xp() {
        let stats = GameStats {
            total_yield: 0,
            experience: 8450,
        };
        assert_eq!(stats.level(), 9);
    }

    #[test]
    fn achievement_condition_serializes_tagged() {
        let json = serde_json::to_value(AchievementCondition::SoilHealth(95)).unwrap_or_default();
        assert_eq!(json["stat"], "soil_health");
        assert_eq!(json["threshold"], 95);
    }
}
