//! Game events emitted by the store and fanned out to the dashboard.
//!
//! Events are advisory: they describe state changes that already happened
//! and carry enough data for the UI to render a toast without re-reading
//! the whole state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{LedgerReason, Weather};
use crate::ids::{AchievementId, CropId, EventId, MissionId, PlotId, QuizId};
use crate::structs::Tip;

/// An emitted event with its identity and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameEvent {
    /// Unique, time-ordered event identifier.
    pub id: EventId,
    /// When the event was produced.
    pub occurred_at: DateTime<Utc>,
    /// What happened.
    pub payload: EventPayload,
}

impl GameEvent {
    /// Wrap a payload with a fresh id and the given timestamp.
    pub fn new(payload: EventPayload, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            occurred_at,
            payload,
        }
    }
}

/// The event-specific data, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventPayload {
    /// The coin balance moved.
    CoinsChanged {
        /// Why it moved.
        reason: LedgerReason,
        /// Signed delta actually applied.
        delta: i64,
        /// Balance afterwards.
        balance: u64,
    },
    /// A crop was planted.
    PlotPlanted {
        /// Target plot.
        plot_id: PlotId,
        /// Crop planted.
        crop_id: CropId,
    },
    /// A crop reached stage 100 during a tick.
    CropReady {
        /// Plot that became ready.
        plot_id: PlotId,
        /// Crop growing there.
        crop_id: Option<CropId>,
    },
    /// A plot was harvested and reset.
    PlotHarvested {
        /// Harvested plot.
        plot_id: PlotId,
        /// Crop that was harvested.
        crop_id: Option<CropId>,
        /// Coins and experience earned.
        harvest_yield: u64,
    },
    /// An achievement unlocked for the first time.
    AchievementUnlocked {
        /// Achievement key.
        achievement_id: AchievementId,
        /// Display name.
        name: String,
        /// Coins granted.
        reward: u64,
    },
    /// A quiz was scored.
    QuizResult {
        /// Quiz key.
        quiz_id: QuizId,
        /// Floor percentage of correct answers.
        score: u32,
        /// Whether the attempt met the passing threshold.
        passed: bool,
        /// Coins granted by this attempt (0 on fail or repeat pass).
        reward: u64,
    },
    /// A mission was completed.
    MissionCompleted {
        /// Mission key.
        mission_id: MissionId,
        /// Mission title.
        title: String,
        /// Coins granted.
        reward: u64,
    },
    /// Photo proof was accepted for a mission.
    PhotoAccepted {
        /// Mission key.
        mission_id: MissionId,
        /// Bonus coins granted.
        bonus: u64,
    },
    /// The weather changed (rotating mode only).
    WeatherChanged {
        /// New condition.
        weather: Weather,
    },
    /// A new farming tip should be displayed.
    TipShown {
        /// The tip.
        tip: Tip,
    },
    /// The game state was persisted.
    StateSaved {
        /// Storage key written.
        key: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_tagged_by_type() {
        let event = GameEvent::new(
            EventPayload::CoinsChanged {
                reason: LedgerReason::Harvest,
                delta: 120,
                balance: 1370,
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["type"], "coins_changed");
        assert_eq!(json["payload"]["reason"], "harvest");
        assert_eq!(json["payload"]["delta"], 120);
        assert!(json["id"].is_string());
    }

    #[test]
    fn event_deserializes_from_wire_form() {
        let event = GameEvent::new(
            EventPayload::StateSaved {
                key: "krishi-mitra-state".to_owned(),
            },
            Utc::now(),
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
