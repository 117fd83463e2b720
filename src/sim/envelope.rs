//! State-dependent legal action envelopes.
//!
//! Each asset variable is in one of three operating states, derived purely
//! from its last committed set-point:
//!
//! | state        | set-point          | legal next actions                         |
//! |--------------|--------------------|--------------------------------------------|
//! | `Off`        | `0`                | `{0} ∪ {min}`                              |
//! | `AtMinimum`  | `min`              | `{0} ∪ [min, min(max, min + radius)]`      |
//! | `Running`    | `(min, max]`       | `[max(cur - radius, min), min(cur + radius, max)]` |
//!
//! There is no stored mode: the controller rebuilds the envelopes from the
//! committed set-points after every step.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::assets::{Asset, AssetVariable};

/// Slack allowed when testing membership of a computed action.
const TOLERANCE: f64 = 1e-9;

/// Operating state of one asset variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatingState {
    Off,
    AtMinimum,
    Running,
}

impl OperatingState {
    /// Classifies a committed set-point. Ties at `min` favor `AtMinimum`.
    ///
    /// Set-points between `0` and `min` are only reachable when actions are
    /// accepted unchecked; they are treated as `AtMinimum`.
    pub fn classify(current: f64, min: f64) -> Self {
        if current <= 0.0 {
            Self::Off
        } else if current <= min {
            Self::AtMinimum
        } else {
            Self::Running
        }
    }
}

/// Continuous closed band of set-points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.low - TOLERANCE && x <= self.high + TOLERANCE
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.low, self.high)
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.high > self.low {
            rng.random_range(self.low..=self.high)
        } else {
            self.low
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Legal choice set for the next action on one asset variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionEnvelope {
    /// Asset is off: stay off or jump straight to minimum load.
    OffOrMinimum { minimum: f64 },
    /// Asset is at minimum load: shut off or ramp within the band.
    OffOrBand { band: Band },
    /// Asset is running: ramp within the band.
    Band { band: Band },
}

impl ActionEnvelope {
    /// Builds the envelope for a variable whose last committed set-point is `current`.
    pub fn new(current: f64, min: f64, max: f64, radius: f64) -> Self {
        match OperatingState::classify(current, min) {
            OperatingState::Off => Self::OffOrMinimum { minimum: min },
            OperatingState::AtMinimum => Self::OffOrBand {
                band: Band {
                    low: min.max(min - radius),
                    high: max.min(min + radius),
                },
            },
            OperatingState::Running => {
                let current = current.min(max);
                Self::Band {
                    band: Band {
                        low: (current - radius).max(min),
                        high: (current + radius).min(max),
                    },
                }
            }
        }
    }

    pub fn for_variable(var: &AssetVariable) -> Self {
        Self::new(var.current, var.min, var.max, var.radius)
    }

    pub fn state(&self) -> OperatingState {
        match self {
            Self::OffOrMinimum { .. } => OperatingState::Off,
            Self::OffOrBand { .. } => OperatingState::AtMinimum,
            Self::Band { .. } => OperatingState::Running,
        }
    }

    /// Smallest legal value across all sub-ranges.
    pub fn low(&self) -> f64 {
        match self {
            Self::OffOrMinimum { minimum } => minimum.min(0.0),
            Self::OffOrBand { band } => band.low.min(0.0),
            Self::Band { band } => band.low,
        }
    }

    /// Largest legal value across all sub-ranges.
    pub fn high(&self) -> f64 {
        match self {
            Self::OffOrMinimum { minimum } => minimum.max(0.0),
            Self::OffOrBand { band } => band.high.max(0.0),
            Self::Band { band } => band.high,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        match self {
            Self::OffOrMinimum { minimum } => {
                x.abs() <= TOLERANCE || (x - minimum).abs() <= TOLERANCE
            }
            Self::OffOrBand { band } => x.abs() <= TOLERANCE || band.contains(x),
            Self::Band { band } => band.contains(x),
        }
    }

    /// Nearest legal value to `x`. Equidistant choices resolve to off.
    pub fn project(&self, x: f64) -> f64 {
        match self {
            Self::OffOrMinimum { minimum } => nearer_of_off(x, *minimum),
            Self::OffOrBand { band } => nearer_of_off(x, band.clamp(x)),
            Self::Band { band } => band.clamp(x),
        }
    }

    /// Draws a legal value: each discrete option is equally likely, and a
    /// band is sampled uniformly.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Self::OffOrMinimum { minimum } => {
                if rng.random_bool(0.5) {
                    0.0
                } else {
                    *minimum
                }
            }
            Self::OffOrBand { band } => {
                if rng.random_bool(0.5) {
                    0.0
                } else {
                    band.sample(rng)
                }
            }
            Self::Band { band } => band.sample(rng),
        }
    }
}

fn nearer_of_off(x: f64, candidate: f64) -> f64 {
    if x.abs() <= (x - candidate).abs() {
        0.0
    } else {
        candidate
    }
}

impl fmt::Display for ActionEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffOrMinimum { minimum } => write!(f, "{{0}} ∪ {{{minimum}}}"),
            Self::OffOrBand { band } => write!(f, "{{0}} ∪ {band}"),
            Self::Band { band } => write!(f, "{band}"),
        }
    }
}

/// Envelopes for every asset variable, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSpace {
    names: Vec<String>,
    envelopes: Vec<ActionEnvelope>,
}

impl ActionSpace {
    /// Rebuilds the space from the assets' committed set-points.
    pub fn from_assets(assets: &[Box<dyn Asset>]) -> Self {
        let (names, envelopes) = assets
            .iter()
            .flat_map(|a| a.variables().iter())
            .map(|v| (v.name.clone(), ActionEnvelope::for_variable(v)))
            .unzip();
        Self { names, envelopes }
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn envelopes(&self) -> &[ActionEnvelope] {
        &self.envelopes
    }

    pub fn lows(&self) -> Vec<f64> {
        self.envelopes.iter().map(ActionEnvelope::low).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.envelopes.iter().map(ActionEnvelope::high).collect()
    }

    /// Returns `true` when `action` has the right length and every value is legal.
    pub fn contains(&self, action: &[f64]) -> bool {
        action.len() == self.len()
            && self
                .envelopes
                .iter()
                .zip(action)
                .all(|(e, &x)| e.contains(x))
    }

    /// Projects each value onto its envelope. Extra values are ignored.
    pub fn project(&self, action: &[f64]) -> Vec<f64> {
        self.envelopes
            .iter()
            .zip(action)
            .map(|(e, &x)| e.project(x))
            .collect()
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.envelopes.iter().map(|e| e.sample(rng)).collect()
    }
}
