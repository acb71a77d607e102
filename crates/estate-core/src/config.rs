//! Configuration loading and typed config structures for the Pocket Estate
//! simulation.
//!
//! The canonical configuration lives in `estate-config.yaml` next to the
//! engine binary. Every field has a default, so an empty file (or no file
//! at all) yields a working setup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use estate_farm::SlotCostTable;
use estate_types::{ActorDefaults, MAX_FODDER, MAX_PLOTS};

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

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `estate-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EstateConfig {
    /// World-level settings (name, tick rate, save location, seed).
    #[serde(default)]
    pub world: WorldConfig,

    /// Scheduler intervals.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Economy parameters.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Ledger selection.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EstateConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ESTATE_DATA_DIR` overrides `world.data_dir`
    /// - `ESTATE_USE_EXTERNAL_LEDGER` overrides `ledger.use_external`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ESTATE_DATA_DIR") {
            self.world.data_dir = val;
        }
        if let Ok(val) = std::env::var("ESTATE_USE_EXTERNAL_LEDGER") {
            self.ledger.use_external = matches!(val.as_str(), "1" | "true" | "yes");
        }
    }

    /// Reject settings the scheduler cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };
        if self.world.tick_rate_hz == 0 {
            return invalid("world.tick_rate_hz must be at least 1");
        }
        if self.schedule.growth_interval_ticks == 0
            || self.schedule.production_interval_ticks == 0
            || self.schedule.save_interval_ticks == 0
        {
            return invalid("schedule intervals must be at least 1 tick");
        }
        if self
            .economy
            .slot_costs
            .as_ref()
            .is_some_and(|costs| costs.len() > MAX_PLOTS)
        {
            return invalid("economy.slot_costs lists more plots than exist");
        }
        if self.economy.buffer_stack_limit == 0 {
            return invalid("economy.buffer_stack_limit must be at least 1");
        }
        Ok(())
    }

    /// Values new actors start with.
    pub const fn actor_defaults(&self) -> ActorDefaults {
        ActorDefaults {
            starting_balance: self.economy.starting_balance,
            starting_plots: self.economy.starting_plots,
            buffer_stack_limit: self.economy.buffer_stack_limit,
            max_fodder: self.economy.max_fodder,
        }
    }

    /// The plot unlock schedule in effect.
    pub fn slot_costs(&self) -> SlotCostTable {
        self.economy
            .slot_costs
            .clone()
            .map_or_else(SlotCostTable::standard, SlotCostTable::new)
    }

    /// Full path of the save file.
    pub fn save_path(&self) -> PathBuf {
        Path::new(&self.world.data_dir).join(&self.world.save_file)
    }

    /// Real time between ticks.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1)
            .checked_div(self.world.tick_rate_hz)
            .unwrap_or(Duration::from_millis(50))
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable world name, used in logs.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Ticks per real second.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Directory the save file lives in.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Save file name within `data_dir`.
    #[serde(default = "default_save_file")]
    pub save_file: String,

    /// Seed for loot rolls. Unset means a fresh seed each run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            tick_rate_hz: default_tick_rate_hz(),
            data_dir: default_data_dir(),
            save_file: default_save_file(),
            seed: None,
        }
    }
}

/// Scheduler intervals, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Ticks between growth passes (growth, compost, auto-harvest).
    #[serde(default = "default_growth_interval_ticks")]
    pub growth_interval_ticks: u64,

    /// Growth units applied to each growing plot per growth pass.
    #[serde(default = "default_growth_delta")]
    pub growth_delta: u32,

    /// Ticks between production passes.
    #[serde(default = "default_production_interval_ticks")]
    pub production_interval_ticks: u64,

    /// Ticks between background saves.
    #[serde(default = "default_save_interval_ticks")]
    pub save_interval_ticks: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            growth_interval_ticks: default_growth_interval_ticks(),
            growth_delta: default_growth_delta(),
            production_interval_ticks: default_production_interval_ticks(),
            save_interval_ticks: default_save_interval_ticks(),
        }
    }
}

/// Economy parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Balance of a newly seen actor.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: u64,

    /// Plots unlocked for a newly seen actor.
    #[serde(default = "default_starting_plots")]
    pub starting_plots: usize,

    /// Currency credited per harvested plot.
    #[serde(default = "default_harvest_currency")]
    pub harvest_currency: u64,

    /// Reward points credited per harvested plot.
    #[serde(default = "default_harvest_experience")]
    pub harvest_experience: u64,

    /// Whether auto-harvest pays the same rewards as a manual harvest.
    #[serde(default)]
    pub auto_harvest_rewards: bool,

    /// Plot unlock costs. Unset means the standard schedule.
    #[serde(default)]
    pub slot_costs: Option<Vec<u64>>,

    /// Fodder capacity of each pen.
    #[serde(default = "default_max_fodder")]
    pub max_fodder: u32,

    /// Maximum stacks per output buffer.
    #[serde(default = "default_buffer_stack_limit")]
    pub buffer_stack_limit: usize,

    /// Sell price overrides keyed by resource id.
    #[serde(default)]
    pub prices: BTreeMap<String, u64>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
            starting_plots: default_starting_plots(),
            harvest_currency: default_harvest_currency(),
            harvest_experience: default_harvest_experience(),
            auto_harvest_rewards: false,
            slot_costs: None,
            max_fodder: default_max_fodder(),
            buffer_stack_limit: default_buffer_stack_limit(),
            prices: BTreeMap::new(),
        }
    }
}

/// Ledger selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Use a registered external provider instead of internal balances.
    #[serde(default)]
    pub use_external: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log a tick summary every N ticks. Zero disables it.
    #[serde(default = "default_summary_every_ticks")]
    pub summary_every_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            summary_every_ticks: default_summary_every_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Pocket Estate".to_owned()
}

const fn default_tick_rate_hz() -> u32 {
    20
}

fn default_data_dir() -> String {
    "world".to_owned()
}

fn default_save_file() -> String {
    "pocketestate_data.dat".to_owned()
}

const fn default_growth_interval_ticks() -> u64 {
    200
}

const fn default_growth_delta() -> u32 {
    20
}

const fn default_production_interval_ticks() -> u64 {
    1200
}

const fn default_save_interval_ticks() -> u64 {
    6000
}

const fn default_starting_balance() -> u64 {
    1000
}

const fn default_starting_plots() -> usize {
    3
}

const fn default_harvest_currency() -> u64 {
    10
}

const fn default_harvest_experience() -> u64 {
    5
}

const fn default_max_fodder() -> u32 {
    MAX_FODDER
}

const fn default_buffer_stack_limit() -> usize {
    270
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_summary_every_ticks() -> u64 {
    1200
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EstateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.tick_rate_hz, 20);
        assert_eq!(config.schedule.growth_interval_ticks, 200);
        assert_eq!(config.schedule.production_interval_ticks, 1200);
        assert_eq!(config.schedule.save_interval_ticks, 6000);
        assert_eq!(config.economy.starting_balance, 1000);
        assert!(!config.ledger.use_external);
    }

    #[test]
    fn parse_empty_yaml_gives_defaults() {
        let config = EstateConfig::parse("{}").unwrap();
        assert_eq!(config, EstateConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test Estate"
  tick_rate_hz: 10
  data_dir: "/tmp/estate"
  save_file: "estate.dat"
  seed: 99

schedule:
  growth_interval_ticks: 100
  growth_delta: 5
  production_interval_ticks: 600
  save_interval_ticks: 3000

economy:
  starting_balance: 250
  starting_plots: 1
  harvest_currency: 3
  harvest_experience: 2
  auto_harvest_rewards: true
  slot_costs: [0, 10, 20]
  max_fodder: 100
  buffer_stack_limit: 5
  prices:
    wheat: 7

ledger:
  use_external: true

logging:
  level: "debug"
  summary_every_ticks: 0
"#;
        let config = EstateConfig::parse(yaml).unwrap();
        assert_eq!(config.world.seed, Some(99));
        assert_eq!(config.save_path(), PathBuf::from("/tmp/estate/estate.dat"));
        assert_eq!(config.tick_period(), Duration::from_millis(100));
        assert_eq!(config.schedule.growth_delta, 5);
        assert!(config.economy.auto_harvest_rewards);
        assert_eq!(config.slot_costs().as_slice(), &[0, 10, 20]);
        assert_eq!(config.economy.prices.get("wheat"), Some(&7));
        assert!(config.ledger.use_external);
        assert_eq!(config.logging.level, "debug");

        let defaults = config.actor_defaults();
        assert_eq!(defaults.starting_balance, 250);
        assert_eq!(defaults.buffer_stack_limit, 5);
        assert_eq!(defaults.max_fodder, 100);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = EstateConfig::parse("schedule:\n  growth_interval_ticks: 0\n");
        assert!(matches!(err, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let err = EstateConfig::parse("world:\n  tick_rate_hz: 0\n");
        assert!(matches!(err, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn oversized_slot_table_is_rejected() {
        let config = EstateConfig {
            economy: EconomyConfig {
                slot_costs: Some(vec![0; MAX_PLOTS + 1]),
                ..EconomyConfig::default()
            },
            ..EstateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unset_slot_costs_use_standard_schedule() {
        let config = EstateConfig::default();
        assert_eq!(config.slot_costs(), SlotCostTable::standard());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            EstateConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
