//! The game store: the only mutator of [`GameState`].
//!
//! Every player command and every growth tick is a method here. Commands
//! validate before they mutate, so a rejected command leaves the state
//! exactly as it was. Side effects the UI cares about (coin movements,
//! unlocks, ready crops) are buffered as [`GameEvent`]s in an outbox that
//! the session drains after each call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use krishi_ledger::LedgerError;
use krishi_progress::{MissionCompletion, QuizOutcome, TipRotator, Unlocked, builtin_tips};
use krishi_types::{
    CropId, EventPayload, FertilizerKind, GameEvent, LedgerEntry, LedgerReason, MissionId, Plot, PlotId,
    PurchaseItem, QuizAnswers, QuizId, Tip,
};
use krishi_world::{CropCatalog, GAUGE_MAX, HarvestOutcome, TickReport, WeatherSystem};

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::state::{GameState, StateSnapshot};

/// Soil health gained per organic fertilizer application.
pub const SOIL_HEALTH_PER_ORGANIC: u32 = 2;

/// Grams of CO2 avoided per organic fertilizer application.
pub const CO2_GRAMS_PER_ORGANIC: u64 = 250;

/// Ledger entries kept in the saved state; older ones are folded into a
/// checkpoint on the next growth tick.
pub const LEDGER_RETAINED_ENTRIES: usize = 500;

/// Owns the game state and applies commands to it.
pub struct GameStore {
    state: GameState,
    config: GameConfig,
    catalog: CropCatalog,
    weather: WeatherSystem,
    tips: TipRotator,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    outbox: Vec<GameEvent>,
}

impl std::fmt::Debug for GameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStore")
            .field("tick", &self.state.tick)
            .field("coins", &self.state.ledger.balance())
            .field("weather", &self.weather.current())
            .field("pending_events", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

impl GameStore {
    /// Wrap a (fresh or restored) state.
    pub fn new(config: GameConfig, state: GameState, clock: Arc<dyn Clock>) -> Self {
        let weather = WeatherSystem::new(
            config.weather.mode,
            state.weather,
            config.weather.change_every_ticks,
            config.weather.avoid_recent,
        );
        let rng = config
            .game
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let tips = TipRotator::new(builtin_tips(), config.game.tip_window);

        Self {
            state,
            config,
            catalog: CropCatalog::builtin(),
            weather,
            tips,
            rng,
            clock,
            outbox: Vec::new(),
        }
    }

    /// The current state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The configuration the store runs with.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current coin balance.
    pub const fn coins(&self) -> u64 {
        self.state.ledger.balance()
    }

    // -----------------------------------------------------------------------
    // Plot commands
    // -----------------------------------------------------------------------

    /// Plant `crop` in an empty plot and credit the planting reward.
    pub fn plant(&mut self, plot_id: PlotId, crop: &CropId) -> Result<Plot, GameError> {
        let now = self.clock.now();
        let plot = self
            .state
            .plots
            .plant(plot_id, crop, &self.catalog, &self.config.growth, now)?
            .clone();

        self.emit(EventPayload::PlotPlanted {
            plot_id,
            crop_id: crop.clone(),
        });
        self.credit(LedgerReason::Planting, self.config.rewards.plant);
        Ok(plot)
    }

    /// Water a planted plot and credit the watering reward.
    pub fn water(&mut self, plot_id: PlotId) -> Result<Plot, GameError> {
        let plot = self.state.plots.water(plot_id, &self.config.growth)?.clone();

        self.state.farm_stats.plants_watered = self.state.farm_stats.plants_watered.saturating_add(1);
        self.credit(LedgerReason::Watering, self.config.rewards.water);
        self.auto_evaluate();
        Ok(plot)
    }

    /// Apply organic or chemical fertilizer to a planted plot.
    pub fn apply_fertilizer(&mut self, plot_id: PlotId, kind: FertilizerKind) -> Result<Plot, GameError> {
        let plot = self
            .state
            .plots
            .apply_fertilizer(plot_id, kind, &self.config.growth)?
            .clone();

        let reward = match kind {
            FertilizerKind::Organic => {
                let stats = &mut self.state.farm_stats;
                stats.soil_health = stats
                    .soil_health
                    .saturating_add(SOIL_HEALTH_PER_ORGANIC)
                    .min(GAUGE_MAX);
                stats.co2_reduced_g = stats.co2_reduced_g.saturating_add(CO2_GRAMS_PER_ORGANIC);
                self.config.rewards.organic_fertilizer
            }
            FertilizerKind::Chemical => self.config.rewards.chemical_fertilizer,
            FertilizerKind::None => 0,
        };

        self.credit(LedgerReason::Fertilizing, reward);
        self.auto_evaluate();
        Ok(plot)
    }

    /// Harvest a ready plot, crediting its yield as coins and experience.
    pub fn harvest(&mut self, plot_id: PlotId) -> Result<HarvestOutcome, GameError> {
        let outcome = self.state.plots.harvest(plot_id, &self.config.growth)?;

        let stats = &mut self.state.stats;
        stats.total_yield = stats.total_yield.saturating_add(outcome.harvest_yield);
        stats.experience = stats.experience.saturating_add(outcome.harvest_yield);
        self.state.farm_stats.crops_grown = self.state.farm_stats.crops_grown.saturating_add(1);

        info!(
            plot = %plot_id,
            crop = ?outcome.crop,
            harvest_yield = outcome.harvest_yield,
            level = self.state.stats.level(),
            "crop harvested"
        );

        self.emit(EventPayload::PlotHarvested {
            plot_id,
            crop_id: outcome.crop.clone(),
            harvest_yield: outcome.harvest_yield,
        });
        self.credit(LedgerReason::Harvest, outcome.harvest_yield);
        self.auto_evaluate();
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Progression commands
    // -----------------------------------------------------------------------

    /// Score a quiz submission, crediting the reward on the first pass.
    pub fn submit_quiz(&mut self, quiz_id: &QuizId, answers: &QuizAnswers) -> Result<QuizOutcome, GameError> {
        let outcome = self.state.quizzes.submit(quiz_id, answers)?;

        self.emit(EventPayload::QuizResult {
            quiz_id: quiz_id.clone(),
            score: outcome.score,
            passed: outcome.passed,
            reward: outcome.reward,
        });
        self.credit(LedgerReason::QuizReward, outcome.reward);
        Ok(outcome)
    }

    /// Unlock every achievement whose threshold is met and credit rewards.
    pub fn evaluate_achievements(&mut self) -> Vec<Unlocked> {
        let unlocked = self.state.achievements.evaluate(&self.state.farm_stats);
        for achievement in &unlocked {
            self.emit(EventPayload::AchievementUnlocked {
                achievement_id: achievement.achievement_id.clone(),
                name: achievement.name.clone(),
                reward: achievement.reward,
            });
            self.credit(LedgerReason::AchievementReward, achievement.reward);
        }
        unlocked
    }

    /// Complete a mission and credit its reward.
    pub fn complete_mission(&mut self, mission_id: &MissionId) -> Result<MissionCompletion, GameError> {
        let completion = self.state.missions.complete(mission_id)?;

        self.emit(EventPayload::MissionCompleted {
            mission_id: completion.mission_id.clone(),
            title: completion.title.clone(),
            reward: completion.reward,
        });
        self.credit(LedgerReason::MissionReward, completion.reward);
        Ok(completion)
    }

    /// Accept photo proof for a mission and credit the photo bonus.
    pub fn submit_photo_proof(&mut self, mission_id: &MissionId) -> Result<u64, GameError> {
        let bonus = self
            .state
            .missions
            .submit_photo_proof(mission_id, self.config.rewards.photo_bonus)?;

        self.emit(EventPayload::PhotoAccepted {
            mission_id: mission_id.clone(),
            bonus,
        });
        self.credit(LedgerReason::PhotoBonus, bonus);
        Ok(bonus)
    }

    /// Buy store items with one debit of their total cost.
    ///
    /// Rejected without any change when the items cost more than the
    /// balance.
    pub fn purchase(&mut self, items: &[PurchaseItem]) -> Result<LedgerEntry, GameError> {
        if items.is_empty() {
            return Err(GameError::EmptyPurchase);
        }
        let total = items
            .iter()
            .fold(0_u64, |sum, item| sum.saturating_add(item.cost));
        let balance = self.state.ledger.balance();
        if total > balance {
            warn!(total, balance, "purchase rejected");
            return Err(LedgerError::InsufficientFunds {
                requested: total,
                available: balance,
            }
            .into());
        }

        let now = self.clock.now();
        let entry = self.state.ledger.try_debit(LedgerReason::Purchase, total, now)?;
        info!(items = items.len(), total, balance = entry.balance_after, "purchase completed");
        self.emit(EventPayload::CoinsChanged {
            reason: LedgerReason::Purchase,
            delta: entry.applied,
            balance: entry.balance_after,
        });
        Ok(entry)
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Advance every growing plot by one tick under the current weather,
    /// then let the weather move on.
    pub fn tick(&mut self) -> TickReport {
        let weather = self.weather.current();
        let report = self.state.plots.tick(weather, &self.config.growth);
        self.state.tick = self.state.tick.saturating_add(1);

        for (plot_id, crop_id) in &report.became_ready {
            info!(plot = %plot_id, crop = ?crop_id, "crop ready for harvest");
            self.emit(EventPayload::CropReady {
                plot_id: *plot_id,
                crop_id: crop_id.clone(),
            });
        }

        if let Some(next) = self.weather.on_tick(&mut self.rng) {
            self.emit(EventPayload::WeatherChanged { weather: next });
        }
        self.state.weather = self.weather.current();

        let folded = self.state.ledger.compact(LEDGER_RETAINED_ENTRIES);
        if folded > 0 {
            debug!(folded, "ledger history compacted");
        }

        debug!(
            tick = self.state.tick,
            ?weather,
            advanced = report.advanced,
            ready = report.became_ready.len(),
            "growth tick"
        );
        report
    }

    /// Rotate to the next farming tip.
    pub fn next_tip(&mut self) -> Option<Tip> {
        let tip = self.tips.next(&mut self.rng)?.clone();
        self.emit(EventPayload::TipShown { tip: tip.clone() });
        Some(tip)
    }

    /// The tip currently on display.
    pub fn current_tip(&self) -> Option<&Tip> {
        self.tips.current()
    }

    // -----------------------------------------------------------------------
    // Views and persistence hooks
    // -----------------------------------------------------------------------

    /// A read-only view of the whole game.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.state, self.catalog.all(), self.tips.current(), self.clock.now())
    }

    /// A copy of the state stamped with the save time. The live state is
    /// not touched until [`GameStore::record_saved`].
    pub fn prepare_save(&self) -> GameState {
        let mut state = self.state.clone();
        state.saved_at = Some(self.clock.now());
        state
    }

    /// Note that the state was written under `key` at `saved_at`.
    pub fn record_saved(&mut self, key: &str, saved_at: Option<DateTime<Utc>>) {
        self.state.saved_at = saved_at;
        self.emit(EventPayload::StateSaved { key: key.to_owned() });
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// The current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn emit(&mut self, payload: EventPayload) {
        let event = GameEvent::new(payload, self.clock.now());
        self.outbox.push(event);
    }

    fn credit(&mut self, reason: LedgerReason, amount: u64) {
        if amount == 0 {
            return;
        }
        let entry = self.state.ledger.credit(reason, amount, self.clock.now());
        self.emit(EventPayload::CoinsChanged {
            reason,
            delta: entry.applied,
            balance: entry.balance_after,
        });
    }

    fn auto_evaluate(&mut self) {
        let unlocked = self.evaluate_achievements();
        if !unlocked.is_empty() {
            debug!(count = unlocked.len(), "achievements unlocked by command");
        }
    }
}
