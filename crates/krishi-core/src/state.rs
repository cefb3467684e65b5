//! The persisted game state and the read-only snapshot served to the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use krishi_ledger::Ledger;
use krishi_progress::{AchievementBoard, MissionTracker, QuizBook, is_overdue};
use krishi_types::{
    Achievement, CropType, FarmStats, GameStats, LedgerEntry, Mission, MissionId, Plot, Quiz, Tip, Weather,
    WeatherReport,
};
use krishi_world::{Farm, weather_report};

use crate::config::GameConfig;

/// Soil health a new farm starts at.
pub const INITIAL_SOIL_HEALTH: u32 = 50;

/// Everything that survives a restart.
///
/// Serialized as one JSON object. Reload merges the saved top-level fields
/// over a fresh state, so fields added in later versions fall back to their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The farm's plots.
    pub plots: Farm,
    /// Coin balance and audit log.
    pub ledger: Ledger,
    /// Yield and experience.
    pub stats: GameStats,
    /// Aggregate counters behind achievements.
    pub farm_stats: FarmStats,
    /// Mission progress.
    pub missions: MissionTracker,
    /// Achievement progress.
    pub achievements: AchievementBoard,
    /// Quiz progress.
    pub quizzes: QuizBook,
    /// Current weather.
    pub weather: Weather,
    /// Growth ticks applied so far.
    pub tick: u64,
    /// When the state was last written.
    pub saved_at: Option<DateTime<Utc>>,
}

impl GameState {
    /// A brand-new farm built from configuration.
    pub fn new(config: &GameConfig, now: DateTime<Utc>) -> Self {
        Self {
            plots: Farm::new(config.game.plot_count, &config.growth),
            ledger: Ledger::with_opening_balance(config.game.starting_coins, now),
            stats: GameStats::default(),
            farm_stats: FarmStats {
                soil_health: INITIAL_SOIL_HEALTH,
                ..FarmStats::default()
            },
            missions: MissionTracker::builtin(now),
            achievements: AchievementBoard::builtin(config.rewards.achievement),
            quizzes: QuizBook::builtin(),
            weather: config.weather.initial,
            tick: 0,
            saved_at: None,
        }
    }
}

/// A read-only view of the game for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    /// Growth ticks applied so far.
    pub tick: u64,
    /// Coin balance.
    pub coins: u64,
    /// Farmer level.
    pub level: u64,
    /// Yield and experience.
    pub stats: GameStats,
    /// Aggregate farm counters.
    pub farm_stats: FarmStats,
    /// Current weather with its report.
    pub weather: WeatherReport,
    /// All plots.
    pub plots: Vec<Plot>,
    /// Plantable crops.
    pub crops: Vec<CropType>,
    /// All missions.
    pub missions: Vec<Mission>,
    /// First incomplete mission.
    pub active_mission: Option<Mission>,
    /// Incomplete missions past their deadline. They can still be completed.
    pub overdue_missions: Vec<MissionId>,
    /// All achievements.
    pub achievements: Vec<Achievement>,
    /// All quizzes.
    pub quizzes: Vec<Quiz>,
    /// Tip currently on display.
    pub tip: Option<Tip>,
    /// Most recent ledger entry.
    pub last_transaction: Option<LedgerEntry>,
    /// When the state was last saved.
    pub saved_at: Option<DateTime<Utc>>,
}

impl StateSnapshot {
    /// Capture the state as of `now`.
    pub fn capture(state: &GameState, crops: &[CropType], tip: Option<&Tip>, now: DateTime<Utc>) -> Self {
        Self {
            tick: state.tick,
            coins: state.ledger.balance(),
            level: state.stats.level(),
            stats: state.stats,
            farm_stats: state.farm_stats,
            weather: weather_report(state.weather),
            plots: state.plots.plots().to_vec(),
            crops: crops.to_vec(),
            missions: state.missions.missions().to_vec(),
            active_mission: state.missions.active_mission().cloned(),
            overdue_missions: state
                .missions
                .missions()
                .iter()
                .filter(|mission| is_overdue(mission, now))
                .map(|mission| mission.id.clone())
                .collect(),
            achievements: state.achievements.achievements().to_vec(),
            quizzes: state.quizzes.quizzes().to_vec(),
            tip: tip.cloned(),
            last_transaction: state.ledger.last_entry().cloned(),
            saved_at: state.saved_at,
        }
    }
}
