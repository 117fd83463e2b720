//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::gas_engine::{
    DEFAULT_ELECTRICAL_EFFICIENCY, DEFAULT_HGH_FRACTION, DEFAULT_LGH_FRACTION,
    DEFAULT_MIN_LOAD_FRACTION, DEFAULT_RAMP_FRACTION, GasEngine,
};
use crate::error::ConfigError;
use crate::sim::balance::SiteParameters;
use crate::sim::types::{ActionPolicy, EnvConfig};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Episode horizon, data source, and agent selection.
    #[serde(default)]
    pub episode: EpisodeConfig,
    /// Backup plant and settlement parameters.
    #[serde(default)]
    pub site: SiteParameters,
    /// Dispatchable assets, in action declaration order.
    #[serde(default = "baseline_assets")]
    pub assets: Vec<AssetConfig>,
}

/// Episode horizon, data source, and agent selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EpisodeConfig {
    /// Path to the time-series CSV.
    pub time_series: PathBuf,
    /// Number of rows kept from the time series (must be > 0).
    pub episode_length: usize,
    /// Offset between decision row and evaluation row.
    pub lag: usize,
    /// Seed for the random agent.
    pub seed: u64,
    /// Agent type: `"random"` or `"demand_following"`.
    pub agent: String,
    /// Treatment of out-of-envelope actions.
    pub action_policy: ActionPolicy,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            time_series: PathBuf::from("data/time_series.csv"),
            episode_length: 48,
            lag: 0,
            seed: 42,
            agent: "random".to_string(),
            action_policy: ActionPolicy::default(),
        }
    }
}

/// Gas engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    pub name: String,
    /// Rated electrical output (MW).
    pub size_mw: f64,
    /// Minimum stable load as a share of size, in (0.0, 1.0].
    pub min_load_fraction: f64,
    /// Ramp radius as a share of size.
    pub ramp_fraction: f64,
    /// Power out / fuel in.
    pub electrical_efficiency: f64,
    /// Share of fuel recovered as high-grade heat.
    pub hgh_fraction: f64,
    /// Share of fuel recovered as low-grade heat.
    pub lgh_fraction: f64,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            name: "GT".to_string(),
            size_mw: 25.0,
            min_load_fraction: DEFAULT_MIN_LOAD_FRACTION,
            ramp_fraction: DEFAULT_RAMP_FRACTION,
            electrical_efficiency: DEFAULT_ELECTRICAL_EFFICIENCY,
            hgh_fraction: DEFAULT_HGH_FRACTION,
            lgh_fraction: DEFAULT_LGH_FRACTION,
        }
    }
}

impl AssetConfig {
    fn engine(name: &str, size_mw: f64) -> Self {
        Self {
            name: name.to_string(),
            size_mw,
            ..Self::default()
        }
    }

    /// Builds the engine. Call only on a validated configuration.
    pub fn build(&self) -> GasEngine {
        GasEngine::new(
            self.name.clone(),
            self.size_mw,
            self.min_load_fraction,
            self.ramp_fraction,
            self.electrical_efficiency,
            self.hgh_fraction,
            self.lgh_fraction,
        )
    }
}

fn baseline_assets() -> Vec<AssetConfig> {
    ["GT 1", "GT 2", "GT 3"]
        .into_iter()
        .map(|name| AssetConfig::engine(name, 25.0))
        .collect()
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ScenarioConfig {
    /// Available agent names.
    pub const AGENTS: &[&str] = &["random", "demand_following"];

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "single_engine", "high_lag"];

    /// Returns the baseline scenario: three 25 MW engines, no lag.
    pub fn baseline() -> Self {
        Self {
            episode: EpisodeConfig::default(),
            site: SiteParameters::default(),
            assets: baseline_assets(),
        }
    }

    /// Returns a single-engine site following demand.
    pub fn single_engine() -> Self {
        Self {
            episode: EpisodeConfig {
                agent: "demand_following".to_string(),
                ..EpisodeConfig::default()
            },
            site: SiteParameters::default(),
            assets: vec![AssetConfig::engine("GT 1", 25.0)],
        }
    }

    /// Returns the baseline site evaluated two periods after each decision.
    pub fn high_lag() -> Self {
        Self {
            episode: EpisodeConfig {
                lag: 2,
                ..EpisodeConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "single_engine" => Ok(Self::single_engine()),
            "high_lag" => Ok(Self::high_lag()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// A relative `episode.time_series` is resolved against the scenario
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                "scenario",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if cfg.episode.time_series.is_relative()
            && let Some(dir) = path.parent()
        {
            cfg.episode.time_series = dir.join(&cfg.episode.time_series);
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Controller configuration for this scenario.
    pub fn env_config(&self) -> EnvConfig {
        EnvConfig::new(self.episode.lag)
            .with_action_policy(self.episode.action_policy)
            .with_site(self.site)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let ep = &self.episode;

        if ep.episode_length == 0 {
            errors.push(ConfigError::new("episode.episode_length", "must be > 0"));
        } else if ep.lag + 2 > ep.episode_length {
            errors.push(ConfigError::new(
                "episode.lag",
                "must be <= episode.episode_length - 2",
            ));
        }
        if !Self::AGENTS.contains(&ep.agent.as_str()) {
            errors.push(ConfigError::new(
                "episode.agent",
                format!(
                    "must be one of {}, got \"{}\"",
                    Self::AGENTS.join(", "),
                    ep.agent
                ),
            ));
        }

        let site = &self.site;
        for (field, value) in [
            ("site.boiler_efficiency", site.boiler_efficiency),
            ("site.chiller_cop", site.chiller_cop),
            ("site.settlements_per_hour", site.settlements_per_hour),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }

        if self.assets.is_empty() {
            errors.push(ConfigError::new("assets", "at least one asset is required"));
        }
        let mut names = HashSet::new();
        for (i, a) in self.assets.iter().enumerate() {
            let field = |name: &str| format!("assets[{i}].{name}");
            if a.name.trim().is_empty() {
                errors.push(ConfigError::new(field("name"), "must not be empty"));
            } else if !names.insert(a.name.as_str()) {
                errors.push(ConfigError::new(
                    field("name"),
                    format!("duplicate asset name \"{}\"", a.name),
                ));
            }
            if !(a.size_mw.is_finite() && a.size_mw > 0.0) {
                errors.push(ConfigError::new(field("size_mw"), "must be > 0"));
            }
            if !(a.min_load_fraction > 0.0 && a.min_load_fraction <= 1.0) {
                errors.push(ConfigError::new(
                    field("min_load_fraction"),
                    "must be in (0.0, 1.0]",
                ));
            }
            if !(a.ramp_fraction.is_finite() && a.ramp_fraction >= 0.0) {
                errors.push(ConfigError::new(field("ramp_fraction"), "must be >= 0"));
            }
            if !(a.electrical_efficiency > 0.0 && a.electrical_efficiency <= 1.0) {
                errors.push(ConfigError::new(
                    field("electrical_efficiency"),
                    "must be in (0.0, 1.0]",
                ));
            }
            if !(a.hgh_fraction >= 0.0 && a.lgh_fraction >= 0.0) {
                errors.push(ConfigError::new(
                    field("hgh_fraction"),
                    "heat fractions must be >= 0",
                ));
            } else if a.electrical_efficiency + a.hgh_fraction + a.lgh_fraction > 1.0 {
                errors.push(ConfigError::new(
                    field("electrical_efficiency"),
                    "efficiency plus heat fractions must be <= 1.0",
                ));
            }
        }

        errors
    }
}
