//! Core episode types: controller configuration, per-step records, and log entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::balance::{Settlement, SiteParameters};
use super::envelope::ActionSpace;
use super::spaces::Observation;

/// How the controller treats an action value outside its legal envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPolicy {
    /// Replace the value with the nearest legal value.
    #[default]
    Clip,
    /// Fail the step with `EnvError::OutOfEnvelope`.
    Reject,
    /// Apply the value as given, clamped only to `[0, max]`.
    Accept,
}

/// Episode controller configuration.
///
/// # Examples
///
/// ```
/// use energy_gym::sim::types::{ActionPolicy, EnvConfig};
///
/// let cfg = EnvConfig::new(1);
/// assert_eq!(cfg.lag, 1);
/// assert_eq!(cfg.action_policy, ActionPolicy::Clip);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvConfig {
    /// Offset between the decision row and the evaluation row.
    pub lag: usize,
    /// Treatment of out-of-envelope actions.
    pub action_policy: ActionPolicy,
    /// Backup plant and settlement parameters.
    pub site: SiteParameters,
}

impl EnvConfig {
    pub fn new(lag: usize) -> Self {
        Self {
            lag,
            action_policy: ActionPolicy::default(),
            site: SiteParameters::default(),
        }
    }

    pub fn with_action_policy(self, action_policy: ActionPolicy) -> Self {
        Self {
            action_policy,
            ..self
        }
    }

    pub fn with_site(self, site: SiteParameters) -> Self {
        Self { site, ..self }
    }
}

/// Lifecycle status of the episode controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnvStatus {
    /// Reset and waiting for the first step.
    Ready,
    /// At least one step taken, horizon not reached.
    Running,
    /// Horizon reached; only `reset` is accepted.
    Done,
}

/// Compact per-step summary appended to the episode log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogEntry {
    pub settlement_period: u8,
    /// Total electrical generation of all assets (MW).
    pub total_generation: f64,
    pub import_price: f64,
    /// HGH plus LGH demand (MW).
    pub total_heat_demand: f64,
}

/// Initial observation and action space published by `reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reset {
    pub observation: Observation,
    pub action_space: ActionSpace,
}

/// Result of one `step` call.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Observation for the next decision.
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    /// Entry appended to the episode log by this step.
    pub info: LogEntry,
    /// Full record of the step.
    pub record: StepRecord,
    /// Legal envelope for the next action.
    pub action_space: ActionSpace,
}

/// Complete record of one episode step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Step index the action was taken at.
    pub step: usize,
    /// Settlement period of the evaluation row.
    pub settlement_period: u8,
    /// Committed set-points, in declaration order.
    pub action: Vec<f64>,
    /// Whether any value was moved onto its envelope.
    pub clipped: bool,
    pub hgh_demand: f64,
    pub lgh_demand: f64,
    pub cooling_demand: f64,
    pub electrical_demand: f64,
    pub gas_price: f64,
    pub import_price: f64,
    pub export_price: f64,
    pub settlement: Settlement,
}

impl StepRecord {
    pub fn reward(&self) -> f64 {
        self.settlement.reward
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.settlement;
        write!(
            f,
            "t={:>3} (SP {:>2}) | gen={:>6.2} MW  import={:>6.2}  export={:>6.2} | \
             boiler={:.2}  chiller={:.2} | gas={:.2} | reward={:>9.2}{}",
            self.step,
            self.settlement_period,
            s.generation.power_output,
            s.import,
            s.export,
            s.backup_heat,
            s.backup_cooling,
            s.total_gas,
            s.reward,
            if self.clipped { " (clipped)" } else { "" },
        )
    }
}
