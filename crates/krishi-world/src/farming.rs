//! Plot state transitions: planting, care actions, harvest, and the growth
//! tick.
//!
//! A [`Farm`] owns a fixed set of plots. Plots are created empty when the
//! farm is initialized and are never destroyed, only reset by harvest.
//!
//! ```text
//! Empty --plant--> Planted/Growing --tick*--> HarvestReady --harvest--> Empty
//! ```
//!
//! Every operation validates first and mutates second, so a rejected
//! command leaves the plot untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use krishi_types::{CropId, FertilizerKind, Plot, PlotId, Weather};

use crate::crops::CropCatalog;
use crate::error::WorldError;

/// Upper bound of every 0-100 gauge on a plot.
pub const GAUGE_MAX: u32 = 100;

// ---------------------------------------------------------------------------
// Growth rules
// ---------------------------------------------------------------------------

/// Tunable numbers behind plot transitions. Loaded from the `growth`
/// section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthRules {
    /// Growth stage a freshly planted crop starts at.
    #[serde(default = "default_seed_stage")]
    pub seed_stage: u32,
    /// Stage gained per tick under rain.
    #[serde(default = "default_rainy_rate")]
    pub rainy_rate: u32,
    /// Stage gained per tick under sun.
    #[serde(default = "default_sunny_rate")]
    pub sunny_rate: u32,
    /// Stage gained per tick under cloud.
    #[serde(default = "default_cloudy_rate")]
    pub cloudy_rate: u32,
    /// Water lost per tick by a growing plot.
    #[serde(default = "default_water_decay")]
    pub water_decay: u32,
    /// Water added by one watering.
    #[serde(default = "default_water_per_watering")]
    pub water_per_watering: u32,
    /// Health added by one watering.
    #[serde(default = "default_health_per_watering")]
    pub health_per_watering: u32,
    /// Health added by organic fertilizer.
    #[serde(default = "default_organic_health")]
    pub organic_health: u32,
    /// Sustainability added by organic fertilizer.
    #[serde(default = "default_organic_sustainability")]
    pub organic_sustainability: u32,
    /// Health added by chemical fertilizer.
    #[serde(default = "default_chemical_health")]
    pub chemical_health: u32,
    /// Sustainability removed by chemical fertilizer.
    #[serde(default = "default_chemical_sustainability_penalty")]
    pub chemical_sustainability_penalty: u32,
    /// Health lost per tick by a growing plot whose water was already at
    /// zero when the tick started. Zero disables drought stress.
    #[serde(default = "default_drought_penalty")]
    pub drought_penalty: u32,
    /// Yield of a plot at full health and full sustainability.
    #[serde(default = "default_yield_scale")]
    pub yield_scale: u32,
    /// Water level of an empty plot.
    #[serde(default = "default_baseline_water")]
    pub baseline_water: u32,
    /// Health of a new plot.
    #[serde(default = "default_initial_health")]
    pub initial_health: u32,
    /// Sustainability of a new plot.
    #[serde(default = "default_initial_sustainability")]
    pub initial_sustainability: u32,
}

const fn default_seed_stage() -> u32 {
    10
}
const fn default_rainy_rate() -> u32 {
    3
}
const fn default_sunny_rate() -> u32 {
    2
}
const fn default_cloudy_rate() -> u32 {
    1
}
const fn default_water_decay() -> u32 {
    2
}
const fn default_water_per_watering() -> u32 {
    30
}
const fn default_health_per_watering() -> u32 {
    10
}
const fn default_organic_health() -> u32 {
    20
}
const fn default_organic_sustainability() -> u32 {
    10
}
const fn default_chemical_health() -> u32 {
    10
}
const fn default_chemical_sustainability_penalty() -> u32 {
    15
}
const fn default_drought_penalty() -> u32 {
    0
}
const fn default_yield_scale() -> u32 {
    200
}
const fn default_baseline_water() -> u32 {
    50
}
const fn default_initial_health() -> u32 {
    100
}
const fn default_initial_sustainability() -> u32 {
    100
}

impl Default for GrowthRules {
    fn default() -> Self {
        Self {
            seed_stage: default_seed_stage(),
            rainy_rate: default_rainy_rate(),
            sunny_rate: default_sunny_rate(),
            cloudy_rate: default_cloudy_rate(),
            water_decay: default_water_decay(),
            water_per_watering: default_water_per_watering(),
            health_per_watering: default_health_per_watering(),
            organic_health: default_organic_health(),
            organic_sustainability: default_organic_sustainability(),
            chemical_health: default_chemical_health(),
            chemical_sustainability_penalty: default_chemical_sustainability_penalty(),
            drought_penalty: default_drought_penalty(),
            yield_scale: default_yield_scale(),
            baseline_water: default_baseline_water(),
            initial_health: default_initial_health(),
            initial_sustainability: default_initial_sustainability(),
        }
    }
}

impl GrowthRules {
    /// Stage gained per tick under the given weather.
    pub const fn growth_rate(&self, weather: Weather) -> u32 {
        match weather {
            Weather::Rainy => self.rainy_rate,
            Weather::Sunny => self.sunny_rate,
            Weather::Cloudy => self.cloudy_rate,
        }
    }

    /// A brand-new empty plot.
    pub fn new_plot(&self) -> Plot {
        Plot {
            id: PlotId::new(),
            crop: None,
            growth_stage: 0,
            health: self.initial_health.min(GAUGE_MAX),
            water_level: self.baseline_water.min(GAUGE_MAX),
            fertilizer: FertilizerKind::None,
            sustainability_score: self.initial_sustainability.min(GAUGE_MAX),
            planted: false,
            planted_at: None,
            harvest_ready: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Yield
// ---------------------------------------------------------------------------

/// Harvest yield for a plot in the given condition.
///
/// Formula: `floor(health/100 * sustainability/100 * scale)`, evaluated in
/// integer arithmetic as `health * sustainability * scale / 10000`.
pub fn harvest_yield(health: u32, sustainability: u32, scale: u32) -> u64 {
    u64::from(health)
        .saturating_mul(u64::from(sustainability))
        .saturating_mul(u64::from(scale))
        .checked_div(10_000)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What a successful harvest produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// The crop that was harvested.
    pub crop: Option<CropId>,
    /// Coins and experience earned.
    pub harvest_yield: u64,
    /// The plot after reset.
    pub plot: Plot,
}

/// What one growth tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Plots that advanced this tick.
    pub advanced: usize,
    /// Plots that reached stage 100 this tick, with their crop.
    pub became_ready: Vec<(PlotId, Option<CropId>)>,
}

// ---------------------------------------------------------------------------
// Growth tick
// ---------------------------------------------------------------------------

/// Advance a snapshot of plots by one tick.
///
/// Pure: every output plot is computed from the input snapshot alone.
/// Only planted plots that are not yet harvest-ready change; they gain
/// stage (clamped at 100), lose water (floored at 0), and suffer the
/// drought penalty if their water was already 0.
pub fn advance_plots(snapshot: &[Plot], weather: Weather, rules: &GrowthRules) -> (Vec<Plot>, TickReport) {
    let rate = rules.growth_rate(weather);
    let mut report = TickReport::default();

    let next = snapshot
        .iter()
        .map(|plot| {
            if !plot.planted || plot.harvest_ready {
                return plot.clone();
            }

            let growth_stage = plot.growth_stage.saturating_add(rate).min(GAUGE_MAX);
            let harvest_ready = growth_stage >= GAUGE_MAX;
            let health = if plot.water_level == 0 {
                plot.health.saturating_sub(rules.drought_penalty)
            } else {
                plot.health
            };

            report.advanced = report.advanced.saturating_add(1);
            if harvest_ready {
                report.became_ready.push((plot.id, plot.crop.clone()));
            }

            Plot {
                growth_stage,
                harvest_ready,
                health,
                water_level: plot.water_level.saturating_sub(rules.water_decay),
                ..plot.clone()
            }
        })
        .collect();

    (next, report)
}

// ---------------------------------------------------------------------------
// Farm
// ---------------------------------------------------------------------------

/// The authoritative collection of plots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Farm {
    plots: Vec<Plot>,
}

impl Farm {
    /// Create a farm of `count` empty plots.
    pub fn new(count: usize, rules: &GrowthRules) -> Self {
        Self {
            plots: (0..count).map(|_| rules.new_plot()).collect(),
        }
    }

    /// Wrap an existing set of plots (e.g. restored from a save).
    pub const fn from_plots(plots: Vec<Plot>) -> Self {
        Self { plots }
    }

    /// All plots, in layout order.
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    /// Look up one plot.
    pub fn plot(&self, id: PlotId) -> Result<&Plot, WorldError> {
        self.plots
            .iter()
            .find(|p| p.id == id)
            .ok_or(WorldError::PlotNotFound(id))
    }

    fn plot_mut(&mut self, id: PlotId) -> Result<&mut Plot, WorldError> {
        self.plots
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(WorldError::PlotNotFound(id))
    }

    /// Put a crop into an empty plot.
    pub fn plant(
        &mut self,
        id: PlotId,
        crop: &CropId,
        catalog: &CropCatalog,
        rules: &GrowthRules,
        now: DateTime<Utc>,
    ) -> Result<&Plot, WorldError> {
        if !catalog.contains(crop) {
            return Err(WorldError::UnknownCrop(crop.clone()));
        }
        let plot = self.plot_mut(id)?;
        if plot.planted {
            return Err(WorldError::AlreadyPlanted(id));
        }

        plot.crop = Some(crop.clone());
        plot.planted = true;
        plot.planted_at = Some(now);
        plot.growth_stage = rules.seed_stage.min(GAUGE_MAX);
        plot.harvest_ready = plot.growth_stage >= GAUGE_MAX;

        debug!(plot = %id, crop = %crop, "crop planted");
        Ok(plot)
    }

    /// Water a planted plot.
    pub fn water(&mut self, id: PlotId, rules: &GrowthRules) -> Result<&Plot, WorldError> {
        let plot = self.plot_mut(id)?;
        if !plot.planted {
            return Err(WorldError::NoPlot(id));
        }

        plot.water_level = plot
            .water_level
            .saturating_add(rules.water_per_watering)
            .min(GAUGE_MAX);
        plot.health = plot
            .health
            .saturating_add(rules.health_per_watering)
            .min(GAUGE_MAX);

        debug!(plot = %id, water = plot.water_level, health = plot.health, "plot watered");
        Ok(plot)
    }

    /// Apply organic or chemical fertilizer to a planted plot.
    pub fn apply_fertilizer(
        &mut self,
        id: PlotId,
        kind: FertilizerKind,
        rules: &GrowthRules,
    ) -> Result<&Plot, WorldError> {
        if kind == FertilizerKind::None {
            return Err(WorldError::InvalidFertilizer(kind));
        }
        let plot = self.plot_mut(id)?;
        if !plot.planted {
            return Err(WorldError::NoPlot(id));
        }

        match kind {
            FertilizerKind::Organic => {
                plot.health = plot.health.saturating_add(rules.organic_health).min(GAUGE_MAX);
                plot.sustainability_score = plot
                    .sustainability_score
                    .saturating_add(rules.organic_sustainability)
                    .min(GAUGE_MAX);
            }
            FertilizerKind::Chemical => {
                plot.health = plot.health.saturating_add(rules.chemical_health).min(GAUGE_MAX);
                plot.sustainability_score = plot
                    .sustainability_score
                    .saturating_sub(rules.chemical_sustainability_penalty);
            }
            FertilizerKind::None => {}
        }
        plot.fertilizer = kind;

        debug!(
            plot = %id,
            ?kind,
            health = plot.health,
            sustainability = plot.sustainability_score,
            "fertilizer applied"
        );
        Ok(plot)
    }

    /// Harvest a ready plot and reset it to empty.
    ///
    /// Health and sustainability carry over to the next planting.
    pub fn harvest(&mut self, id: PlotId, rules: &GrowthRules) -> Result<HarvestOutcome, WorldError> {
        let plot = self.plot_mut(id)?;
        if !plot.harvest_ready {
            return Err(WorldError::NotReady {
                plot: id,
                growth_stage: plot.growth_stage,
            });
        }

        let harvest_yield = harvest_yield(plot.health, plot.sustainability_score, rules.yield_scale);
        let crop = plot.crop.take();

        plot.growth_stage = 0;
        plot.fertilizer = FertilizerKind::None;
        plot.water_level = rules.baseline_water.min(GAUGE_MAX);
        plot.harvest_ready = false;
        plot.planted = false;
        plot.planted_at = None;

        debug!(plot = %id, harvest_yield, "plot harvested");
        Ok(HarvestOutcome {
            crop,
            harvest_yield,
            plot: plot.clone(),
        })
    }

    /// Advance every growing plot by one tick under `weather`.
    ///
    /// The whole batch is computed from one snapshot and swapped in at once.
    pub fn tick(&mut self, weather: Weather, rules: &GrowthRules) -> TickReport {
        let (next, report) = advance_plots(&self.plots, weather, rules);
        self.plots = next;
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn farm_with_one_plot() -> (Farm, PlotId, GrowthRules, CropCatalog) {
        let rules = GrowthRules::default();
        let farm = Farm::new(1, &rules);
        let id = farm.plots()[0].id;
        (farm, id, rules, CropCatalog::builtin())
    }

    fn wheat() -> CropId {
        CropId::from("wheat")
    }

    #[test]
    fn new_farm_plots_are_empty_baseline() {
        let rules = GrowthRules::default();
        let farm = Farm::new(9, &rules);
        assert_eq!(farm.plots().len(), 9);
        for plot in farm.plots() {
            assert!(!plot.planted);
            assert_eq!(plot.growth_stage, 0);
            assert_eq!(plot.health, 100);
            assert_eq!(plot.water_level, 50);
            assert_eq!(plot.sustainability_score, 100);
            assert_eq!(plot.fertilizer, FertilizerKind::None);
        }
    }

    #[test]
    fn plant_sets_seed_stage() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        let plot = farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        assert!(plot.planted);
        assert_eq!(plot.growth_stage, 10);
        assert_eq!(plot.crop, Some(wheat()));
        assert!(plot.planted_at.is_some());
    }

    #[test]
    fn plant_twice_fails_and_leaves_plot_unchanged() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        let before = farm.plot(id).unwrap().clone();

        let err = farm
            .plant(id, &CropId::from("rice"), &catalog, &rules, Utc::now())
            .unwrap_err();
        assert_eq!(err, WorldError::AlreadyPlanted(id));
        assert_eq!(farm.plot(id).unwrap(), &before);
    }

    #[test]
    fn plant_unknown_crop_or_plot_fails() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        let err = farm
            .plant(id, &CropId::from("mango"), &catalog, &rules, Utc::now())
            .unwrap_err();
        assert_eq!(err, WorldError::UnknownCrop(CropId::from("mango")));

        let missing = PlotId::new();
        let err = farm
            .plant(missing, &wheat(), &catalog, &rules, Utc::now())
            .unwrap_err();
        assert_eq!(err, WorldError::PlotNotFound(missing));
    }

    #[test]
    fn water_requires_planted_plot() {
        let (mut farm, id, rules, _) = farm_with_one_plot();
        assert_eq!(farm.water(id, &rules).unwrap_err(), WorldError::NoPlot(id));
    }

    #[test]
    fn water_raises_water_and_health_clamped() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        let plot = farm.water(id, &rules).unwrap();
        assert_eq!(plot.water_level, 80);
        assert_eq!(plot.health, 100);
        let plot = farm.water(id, &rules).unwrap();
        assert_eq!(plot.water_level, 100);
    }

    #[test]
    fn organic_fertilizer_raises_sustainability() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        farm.apply_fertilizer(id, FertilizerKind::Chemical, &rules).unwrap();
        let plot = farm.apply_fertilizer(id, FertilizerKind::Organic, &rules).unwrap();
        assert_eq!(plot.sustainability_score, 95);
        assert_eq!(plot.fertilizer, FertilizerKind::Organic);
    }

    #[test]
    fn chemical_fertilizer_floors_sustainability_at_zero() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        for _ in 0..10 {
            farm.apply_fertilizer(id, FertilizerKind::Chemical, &rules).unwrap();
        }
        assert_eq!(farm.plot(id).unwrap().sustainability_score, 0);
    }

    #[test]
    fn fertilizer_none_is_rejected() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        assert_eq!(
            farm.apply_fertilizer(id, FertilizerKind::None, &rules).unwrap_err(),
            WorldError::InvalidFertilizer(FertilizerKind::None)
        );
    }

    #[test]
    fn yield_formula_matches_reference_point() {
        assert_eq!(harvest_yield(80, 75, 200), 120);
        assert_eq!(harvest_yield(100, 100, 200), 200);
        assert_eq!(harvest_yield(0, 100, 200), 0);
        assert_eq!(harvest_yield(33, 33, 200), 21);
    }

    #[test]
    fn harvest_before_ready_fails() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        assert!(matches!(
            farm.harvest(id, &rules),
            Err(WorldError::NotReady { growth_stage: 10, .. })
        ));
    }

    #[test]
    fn harvest_resets_plot_and_keeps_health() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        farm.apply_fertilizer(id, FertilizerKind::Chemical, &rules).unwrap();
        while !farm.plot(id).unwrap().harvest_ready {
            farm.tick(Weather::Rainy, &rules);
        }

        let outcome = farm.harvest(id, &rules).unwrap();
        assert_eq!(outcome.crop, Some(wheat()));
        // 100 * 85 * 200 / 10000.
        assert_eq!(outcome.harvest_yield, 170);

        let plot = farm.plot(id).unwrap();
        assert!(!plot.planted);
        assert!(!plot.harvest_ready);
        assert_eq!(plot.growth_stage, 0);
        assert_eq!(plot.crop, None);
        assert_eq!(plot.fertilizer, FertilizerKind::None);
        assert_eq!(plot.water_level, 50);
        assert_eq!(plot.planted_at, None);
        assert_eq!(plot.health, 100);
        assert_eq!(plot.sustainability_score, 85);
    }

    #[test]
    fn rainy_tick_advances_by_three_from_one_snapshot() {
        let rules = GrowthRules::default();
        let mut farm = Farm::new(3, &rules);
        let catalog = CropCatalog::builtin();
        let ids: Vec<PlotId> = farm.plots().iter().map(|p| p.id).collect();
        farm.plant(ids[0], &wheat(), &catalog, &rules, Utc::now()).unwrap();
        farm.plant(ids[1], &wheat(), &catalog, &rules, Utc::now()).unwrap();

        let report = farm.tick(Weather::Rainy, &rules);
        assert_eq!(report.advanced, 2);
        assert_eq!(farm.plots()[0].growth_stage, 13);
        assert_eq!(farm.plots()[1].growth_stage, 13);
        assert_eq!(farm.plots()[0].water_level, 48);
        assert_eq!(farm.plots()[2].growth_stage, 0);
        assert_eq!(farm.plots()[2].water_level, 50);
    }

    #[test]
    fn growth_rates_follow_weather() {
        let rules = GrowthRules::default();
        assert_eq!(rules.growth_rate(Weather::Rainy), 3);
        assert_eq!(rules.growth_rate(Weather::Sunny), 2);
        assert_eq!(rules.growth_rate(Weather::Cloudy), 1);
    }

    #[test]
    fn stage_clamps_at_hundred_and_sets_ready() {
        let (mut farm, id, rules, catalog) = farm_with_one_plot();
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        let mut ready_events = 0;
        let mut last_stage = 0;
        for _ in 0..40 {
            let report = farm.tick(Weather::Rainy, &rules);
            ready_events += report.became_ready.len();
            let stage = farm.plot(id).unwrap().growth_stage;
            assert!(stage >= last_stage);
            assert!(stage <= 100);
            last_stage = stage;
        }
        assert_eq!(last_stage, 100);
        assert_eq!(ready_events, 1);
        assert!(farm.plot(id).unwrap().harvest_ready);
    }

    #[test]
    fn drought_costs_health_only_once_dry() {
        let (mut farm, id, _, catalog) = farm_with_one_plot();
        let rules = GrowthRules {
            drought_penalty: 1,
            ..GrowthRules::default()
        };
        farm.plant(id, &wheat(), &catalog, &rules, Utc::now()).unwrap();
        // 50 water lasts 25 ticks; cloudy growth keeps the crop growing.
        for _ in 0..25 {
            farm.tick(Weather::Cloudy, &rules);
        }
        let plot = farm.plot(id).unwrap();
        assert_eq!(plot.water_level, 0);
        assert_eq!(plot.health, 100);

        farm.tick(Weather::Cloudy, &rules);
        assert_eq!(farm.plot(id).unwrap().health, 99);
    }

    #[test]
    fn drought_stress_is_off_by_default() {
        let rules = GrowthRules::default();
        assert_eq!(rules.drought_penalty, 0);
        let mut farm = Farm::new(1, &rules);
        let id = farm.plots()[0].id;
        farm.plant(id, &wheat(), &CropCatalog::builtin(), &rules, Utc::now())
            .unwrap();
        for _ in 0..40 {
            farm.tick(Weather::Cloudy, &rules);
        }
        assert_eq!(farm.plot(id).unwrap().health, 100);
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: GrowthRules = serde_json::from_str(r#"{"sunny_rate": 5}"#).unwrap();
        assert_eq!(rules.sunny_rate, 5);
        assert_eq!(rules.rainy_rate, 3);
        assert_eq!(rules.yield_scale, 200);
    }
}
