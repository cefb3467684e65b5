//! Configuration loading and typed config structures for the Krishi farm
//! simulation.
//!
//! The canonical configuration lives in `krishi-config.yaml` at the project
//! root. Every field has a default, so an empty file (or no file at all)
//! yields the stock game.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use krishi_types::Weather;
use krishi_world::{GrowthRules, WeatherMode};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `krishi-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Farm size, starting coins, and timer intervals.
    #[serde(default)]
    pub game: GameSection,

    /// Coin rewards per action.
    #[serde(default)]
    pub rewards: RewardsConfig,

    /// Plot growth and care numbers.
    #[serde(default)]
    pub growth: GrowthRules,

    /// Weather behavior.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Where the game is saved.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `KRISHI_STORAGE_DIR` overrides `storage.dir`
    /// - `KRISHI_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override selected values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("KRISHI_STORAGE_DIR") {
            self.storage.dir = PathBuf::from(dir);
        }
        if let Some(port) = std::env::var("KRISHI_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.server.port = port;
        }
    }
}

/// Farm size, opening balance, and timer intervals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameSection {
    /// Coins a new farm starts with.
    #[serde(default = "default_starting_coins")]
    pub starting_coins: u64,

    /// Number of plots on a new farm.
    #[serde(default = "default_plot_count")]
    pub plot_count: usize,

    /// Milliseconds between growth ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Milliseconds between autosaves.
    #[serde(default = "default_autosave_interval_ms")]
    pub autosave_interval_ms: u64,

    /// Milliseconds between farming tips.
    #[serde(default = "default_tip_interval_ms")]
    pub tip_interval_ms: u64,

    /// Recent tips a new tip must differ from.
    #[serde(default = "default_tip_window")]
    pub tip_window: usize,

    /// Seed for tip and weather draws. Unset draws a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            starting_coins: default_starting_coins(),
            plot_count: default_plot_count(),
            tick_interval_ms: default_tick_interval_ms(),
            autosave_interval_ms: default_autosave_interval_ms(),
            tip_interval_ms: default_tip_interval_ms(),
            tip_window: default_tip_window(),
            seed: None,
        }
    }
}

/// Coin rewards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardsConfig {
    /// Planting a crop.
    #[serde(default = "default_plant_reward")]
    pub plant: u64,

    /// Watering a crop.
    #[serde(default = "default_water_reward")]
    pub water: u64,

    /// Applying organic fertilizer.
    #[serde(default = "default_organic_reward")]
    pub organic_fertilizer: u64,

    /// Applying chemical fertilizer.
    #[serde(default = "default_chemical_reward")]
    pub chemical_fertilizer: u64,

    /// Unlocking an achievement.
    #[serde(default = "default_achievement_reward")]
    pub achievement: u64,

    /// Submitting mission photo proof.
    #[serde(default = "default_photo_bonus")]
    pub photo_bonus: u64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            plant: default_plant_reward(),
            water: default_water_reward(),
            organic_fertilizer: default_organic_reward(),
            chemical_fertilizer: default_chemical_reward(),
            achievement: default_achievement_reward(),
            photo_bonus: default_photo_bonus(),
        }
    }
}

/// Weather behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherConfig {
    /// `fixed` or `rotating`.
    #[serde(default)]
    pub mode: WeatherMode,

    /// Weather at farm creation.
    #[serde(default = "default_initial_weather")]
    pub initial: Weather,

    /// Ticks between redraws in rotating mode.
    #[serde(default = "default_change_every_ticks")]
    pub change_every_ticks: u32,

    /// Recent conditions a redraw must differ from.
    #[serde(default = "default_weather_window")]
    pub avoid_recent: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            mode: WeatherMode::default(),
            initial: default_initial_weather(),
            change_every_ticks: default_change_every_ticks(),
            avoid_recent: default_weather_window(),
        }
    }
}

/// Save location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the save file.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Storage key; the file is `<dir>/<key>.json`.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_storage_key(),
        }
    }
}

/// HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_starting_coins() -> u64 {
    1250
}

const fn default_plot_count() -> usize {
    9
}

const fn default_tick_interval_ms() -> u64 {
    2000
}

const fn default_autosave_interval_ms() -> u64 {
    30_000
}

const fn default_tip_interval_ms() -> u64 {
    8000
}

const fn default_tip_window() -> usize {
    krishi_progress::DEFAULT_TIP_WINDOW
}

const fn default_plant_reward() -> u64 {
    50
}

const fn default_water_reward() -> u64 {
    20
}

const fn default_organic_reward() -> u64 {
    30
}

const fn default_chemical_reward() -> u64 {
    10
}

const fn default_achievement_reward() -> u64 {
    krishi_progress::DEFAULT_ACHIEVEMENT_REWARD
}

const fn default_photo_bonus() -> u64 {
    100
}

const fn default_initial_weather() -> Weather {
    Weather::Sunny
}

const fn default_change_every_ticks() -> u32 {
    30
}

const fn default_weather_window() -> usize {
    1
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_storage_key() -> String {
    "krishi-mitra-state".to_owned()
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}
