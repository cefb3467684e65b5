//! The weather model.
//!
//! Weather is a closed set of three conditions that feeds the growth tick.
//! Two modes are supported:
//!
//! | Mode       | Behavior                                                     |
//! |------------|--------------------------------------------------------------|
//! | `fixed`    | The initial weather never changes.                           |
//! | `rotating` | Every `change_every_ticks` ticks a new condition is drawn,   |
//! |            | avoiding the recent ones via [`RecentPicker`].               |
//!
//! Randomness is supplied by the caller so a seeded RNG gives reproducible
//! weather sequences.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use krishi_types::{Weather, WeatherReport};

use crate::rotation::RecentPicker;

/// How the weather evolves over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherMode {
    /// Weather stays at its initial value.
    #[default]
    Fixed,
    /// Weather is redrawn periodically.
    Rotating,
}

/// Temperature, humidity, and crop effect for a weather condition.
pub fn weather_report(weather: Weather) -> WeatherReport {
    let (temperature_c, humidity_pct, effect) = match weather {
        Weather::Sunny => (28, 65, "Good for most crops"),
        Weather::Rainy => (24, 85, "Fastest growth, no irrigation needed"),
        Weather::Cloudy => (26, 70, "Slow growth, low evaporation"),
    };
    WeatherReport {
        weather,
        temperature_c,
        humidity_pct,
        effect: effect.to_owned(),
    }
}

/// Current weather plus the rule for changing it.
#[derive(Debug, Clone)]
pub struct WeatherSystem {
    mode: WeatherMode,
    current: Weather,
    /// Ticks between redraws in rotating mode. Zero never redraws.
    change_every_ticks: u32,
    /// Ticks elapsed since the last change.
    ticks_in_current: u32,
    picker: RecentPicker,
}

impl WeatherSystem {
    /// Create a weather system starting at `initial`.
    ///
    /// `avoid_recent` is the exclusion window for rotating draws; with
    /// three conditions, 1 guarantees every redraw changes the weather.
    pub fn new(mode: WeatherMode, initial: Weather, change_every_ticks: u32, avoid_recent: usize) -> Self {
        let mut picker = RecentPicker::new(avoid_recent);
        if let Some(index) = weather_index(initial) {
            picker.record(index);
        }
        Self {
            mode,
            current: initial,
            change_every_ticks,
            ticks_in_current: 0,
            picker,
        }
    }

    /// A system that always reports `weather`.
    pub fn fixed(weather: Weather) -> Self {
        Self::new(WeatherMode::Fixed, weather, 0, 0)
    }

    /// The weather the next growth tick will use.
    pub const fn current(&self) -> Weather {
        self.current
    }

    /// Account for one elapsed tick, redrawing when due.
    ///
    /// Returns the new weather if it changed.
    pub fn on_tick(&mut self, rng: &mut impl Rng) -> Option<Weather> {
        if self.mode == WeatherMode::Fixed || self.change_every_ticks == 0 {
            return None;
        }

        self.ticks_in_current = self.ticks_in_current.saturating_add(1);
        if self.ticks_in_current < self.change_every_ticks {
            return None;
        }
        self.ticks_in_current = 0;

        let index = self.picker.pick(Weather::ALL.len(), rng)?;
        let next = Weather::ALL.get(index).copied()?;
        if next == self.current {
            return None;
        }

        info!(from = ?self.current, to = ?next, "weather changed");
        self.current = next;
        Some(next)
    }
}

fn weather_index(weather: Weather) -> Option<usize> {
    Weather::ALL.iter().position(|w| *w == weather)
}
