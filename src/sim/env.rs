//! Episode controller that drives assets, settlement, and action envelopes.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::assets::{Asset, AssetOutputs};
use crate::error::{ConfigError, EnvError};
use crate::timeseries::TimeSeries;

use super::balance::settle;
use super::clock::EpisodeClock;
use super::envelope::ActionSpace;
use super::spaces::{self, Bounds, FieldBounds, OBSERVATION_FIELDS, Observation};
use super::types::{ActionPolicy, EnvConfig, EnvStatus, LogEntry, Reset, StepOutcome, StepRecord};

/// Step/reset environment for a site of dispatchable assets.
///
/// The environment owns the assets and all episode-local state; the time
/// series is shared read-only. After every step the legal action space is
/// rebuilt from the newly committed set-points.
#[derive(Debug)]
pub struct Environment {
    config: EnvConfig,
    series: Arc<TimeSeries>,
    assets: Vec<Box<dyn Asset>>,
    clock: EpisodeClock,
    status: EnvStatus,
    /// Append-only per-step summaries, bounded by the episode horizon.
    log: Vec<LogEntry>,
    last_action: Vec<f64>,
    action_space: ActionSpace,
}

impl Environment {
    /// Creates an environment and resets it to the start of the episode.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if there are no assets, or if the series is
    /// too short to allow a single step with the configured lag
    /// (`len < lag + 2`).
    pub fn new(
        config: EnvConfig,
        series: Arc<TimeSeries>,
        assets: Vec<Box<dyn Asset>>,
    ) -> Result<Self, ConfigError> {
        if assets.is_empty() {
            return Err(ConfigError::new("assets", "at least one asset is required"));
        }
        let clock = EpisodeClock::new(series.len(), config.lag).ok_or_else(|| {
            ConfigError::new(
                "episode.lag",
                format!(
                    "a series of {} rows allows no step with lag {}; need at least lag + 2 rows",
                    series.len(),
                    config.lag
                ),
            )
        })?;

        let action_space = ActionSpace::from_assets(&assets);
        let mut env = Self {
            config,
            series,
            assets,
            clock,
            status: EnvStatus::Ready,
            log: Vec::with_capacity(clock.terminal()),
            last_action: Vec::new(),
            action_space,
        };
        env.reset();
        Ok(env)
    }

    /// Starts a new episode.
    ///
    /// Assets return to their initial operating point, the log is cleared,
    /// and the first row's observation is published with the initial action
    /// space. Calling `reset` repeatedly yields identical results.
    pub fn reset(&mut self) -> Reset {
        self.clock.rewind();
        self.status = EnvStatus::Ready;
        self.log.clear();
        for asset in &mut self.assets {
            asset.reset();
            debug!(
                asset = asset.name(),
                kind = asset.asset_type(),
                "asset reset"
            );
        }
        self.last_action = self.committed_setpoints();
        self.action_space = ActionSpace::from_assets(&self.assets);

        info!(
            assets = self.assets.len(),
            horizon = self.clock.terminal(),
            lag = self.clock.lag(),
            "episode reset"
        );

        Reset {
            observation: self.observation_at(0),
            action_space: self.action_space.clone(),
        }
    }

    /// Applies one action and settles the resulting period.
    ///
    /// # Arguments
    ///
    /// * `action` - One set-point per asset variable, in declaration order
    ///
    /// # Errors
    ///
    /// Returns an `EnvError` if the episode is done, the action has the wrong
    /// length, a value is not finite, or (under [`ActionPolicy::Reject`]) a
    /// value lies outside its envelope. The environment is left unchanged on
    /// error.
    pub fn step(&mut self, action: &[f64]) -> Result<StepOutcome, EnvError> {
        if self.status == EnvStatus::Done {
            return Err(EnvError::EpisodeDone);
        }
        let (committed, clipped) = self.resolve_action(action)?;

        // 1. Commit set-points and update asset physics
        let mut values = committed.iter();
        for asset in &mut self.assets {
            for var in asset.variables_mut() {
                if let Some(&v) = values.next() {
                    var.current = v;
                }
            }
            asset.update();
        }
        let generation: AssetOutputs = self.assets.iter().map(|a| a.outputs()).sum();

        // 2. Settle against the lagged row
        let step = self.clock.step();
        let row = &self.series.rows()[self.clock.evaluation_index()];
        let settlement = settle(generation, row, &self.config.site);

        let info = LogEntry {
            settlement_period: row.settlement_period,
            total_generation: generation.power_output,
            import_price: row.import_price,
            total_heat_demand: row.total_heat_demand(),
        };
        self.log.push(info);

        let record = StepRecord {
            step,
            settlement_period: row.settlement_period,
            action: committed.clone(),
            clipped,
            hgh_demand: row.hgh_demand,
            lgh_demand: row.lgh_demand,
            cooling_demand: row.cooling_demand,
            electrical_demand: row.electrical_demand,
            gas_price: row.gas_price,
            import_price: row.import_price,
            export_price: row.export_price,
            settlement,
        };

        // 3. Advance and publish the next envelope
        let done = self.clock.advance();
        self.status = if done {
            EnvStatus::Done
        } else {
            EnvStatus::Running
        };
        self.last_action = committed;
        self.action_space = ActionSpace::from_assets(&self.assets);

        debug!(
            step,
            reward = settlement.reward,
            import = settlement.import,
            export = settlement.export,
            done,
            "step settled"
        );

        Ok(StepOutcome {
            observation: self.observation_at(self.clock.step()),
            reward: settlement.reward,
            done,
            info,
            record,
            action_space: self.action_space.clone(),
        })
    }

    /// Checks an action against the current space and returns the values to commit.
    fn resolve_action(&self, action: &[f64]) -> Result<(Vec<f64>, bool), EnvError> {
        let expected = self.action_space.len();
        if action.len() != expected {
            return Err(EnvError::ActionLength {
                expected,
                found: action.len(),
            });
        }

        let variables = self.assets.iter().flat_map(|a| a.variables().iter());
        let mut committed = Vec::with_capacity(expected);
        let mut clipped = false;

        for ((var, envelope), &x) in variables.zip(self.action_space.envelopes()).zip(action) {
            if !x.is_finite() {
                return Err(EnvError::NonFinite {
                    variable: var.name.clone(),
                    value: x,
                });
            }
            let legal = envelope.contains(x);
            let value = match self.config.action_policy {
                ActionPolicy::Accept => x.clamp(0.0, var.max),
                _ if legal => envelope.project(x),
                ActionPolicy::Clip => {
                    let projected = envelope.project(x);
                    warn!(
                        variable = %var.name,
                        requested = x,
                        committed = projected,
                        envelope = %envelope,
                        "action outside envelope, clipped"
                    );
                    clipped = true;
                    projected
                }
                ActionPolicy::Reject => {
                    return Err(EnvError::OutOfEnvelope {
                        variable: var.name.clone(),
                        value: x,
                        envelope: envelope.to_string(),
                    });
                }
            };
            committed.push(value);
        }

        Ok((committed, clipped))
    }

    fn committed_setpoints(&self) -> Vec<f64> {
        self.assets
            .iter()
            .flat_map(|a| a.variables().iter().map(|v| v.current))
            .collect()
    }

    fn observation_at(&self, index: usize) -> Observation {
        self.series.rows()[index].observation()
    }

    pub fn status(&self) -> EnvStatus {
        self.status
    }

    /// Number of steps taken in the current episode.
    pub fn step_index(&self) -> usize {
        self.clock.step()
    }

    /// Step index at which the episode terminates.
    pub fn horizon(&self) -> usize {
        self.clock.terminal()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Last committed set-points, in declaration order.
    pub fn last_action(&self) -> &[f64] {
        &self.last_action
    }

    /// Legal envelope for the next action.
    pub fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    /// Declared observation fields and bounds.
    pub fn observation_space(&self) -> &'static [FieldBounds] {
        &OBSERVATION_FIELDS
    }

    /// Static per-variable action bounds used for space declaration.
    pub fn action_bounds(&self) -> Vec<(String, Bounds)> {
        spaces::declared_action_bounds(&self.assets)
    }

    pub fn assets(&self) -> &[Box<dyn Asset>] {
        &self.assets
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }
}
