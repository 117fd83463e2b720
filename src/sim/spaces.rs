//! Observation vector and declared observation/action bounds.

use serde::Serialize;

use crate::assets::Asset;

/// Number of fields in an observation.
pub const OBSERVATION_DIM: usize = 8;

/// Closed interval used for space declaration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Named field with its declared bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldBounds {
    pub name: &'static str,
    pub bounds: Bounds,
}

/// Declared observation fields in vector order.
pub const OBSERVATION_FIELDS: [FieldBounds; OBSERVATION_DIM] = [
    FieldBounds {
        name: "Settlement period",
        bounds: Bounds::new(0.0, 48.0),
    },
    FieldBounds {
        name: "HGH demand",
        bounds: Bounds::new(0.0, 30.0),
    },
    FieldBounds {
        name: "LGH demand",
        bounds: Bounds::new(0.0, 20.0),
    },
    FieldBounds {
        name: "Cooling demand",
        bounds: Bounds::new(0.0, 10.0),
    },
    FieldBounds {
        name: "Electrical demand",
        bounds: Bounds::new(0.0, 20.0),
    },
    FieldBounds {
        name: "Gas price",
        bounds: Bounds::new(15.0, 25.0),
    },
    FieldBounds {
        name: "Import electricity price",
        bounds: Bounds::new(-200.0, 1600.0),
    },
    FieldBounds {
        name: "Export electricity price",
        bounds: Bounds::new(-200.0, 1600.0),
    },
];

/// Visible state handed to the agent: one time-series row without its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation([f64; OBSERVATION_DIM]);

impl Observation {
    pub fn new(values: [f64; OBSERVATION_DIM]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; OBSERVATION_DIM] {
        &self.0
    }

    pub fn settlement_period(&self) -> f64 {
        self.0[0]
    }

    pub fn electrical_demand(&self) -> f64 {
        self.0[4]
    }

    /// Returns the names of fields whose value falls outside the declared bounds.
    pub fn out_of_bounds(&self) -> Vec<&'static str> {
        self.0
            .iter()
            .zip(OBSERVATION_FIELDS.iter())
            .filter(|(v, f)| !f.bounds.contains(**v))
            .map(|(_, f)| f.name)
            .collect()
    }
}

/// Static per-variable action bounds `[0, maximum]`, in declaration order.
///
/// The dynamic per-step envelope always lies inside these bounds.
pub fn declared_action_bounds(assets: &[Box<dyn Asset>]) -> Vec<(String, Bounds)> {
    assets
        .iter()
        .flat_map(|a| a.variables().iter())
        .map(|v| (v.name.clone(), Bounds::new(0.0_f64.min(v.min), v.max)))
        .collect()
}
