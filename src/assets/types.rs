//! Common types and traits for dispatchable assets.

use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

/// A controllable set-point on an asset.
///
/// `current` is either `0.0` (off) or lies in `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetVariable {
    pub name: String,
    /// Last committed set-point.
    pub current: f64,
    /// Minimum stable operating point.
    pub min: f64,
    /// Maximum operating point.
    pub max: f64,
    /// Maximum allowed change of `current` between consecutive steps.
    pub radius: f64,
}

impl AssetVariable {
    /// Creates a variable with the given bounds, initially off.
    ///
    /// # Panics
    ///
    /// Panics if `min` is negative, `min > max`, or `radius` is negative.
    pub fn new(name: impl Into<String>, min: f64, max: f64, radius: f64) -> Self {
        assert!(min >= 0.0, "min must be >= 0");
        assert!(min <= max, "min must be <= max");
        assert!(radius >= 0.0, "radius must be >= 0");
        Self {
            name: name.into(),
            current: 0.0,
            min,
            max,
            radius,
        }
    }

    /// Returns `true` when `current` is off or inside `[min, max]`.
    pub fn is_consistent(&self) -> bool {
        self.current == 0.0 || (self.min..=self.max).contains(&self.current)
    }
}

/// Energy flows produced by an asset for the current step (MW).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AssetOutputs {
    pub gas_burnt: f64,
    pub hgh_output: f64,
    pub lgh_output: f64,
    pub cooling_output: f64,
    pub power_output: f64,
}

impl Add for AssetOutputs {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            gas_burnt: self.gas_burnt + rhs.gas_burnt,
            hgh_output: self.hgh_output + rhs.hgh_output,
            lgh_output: self.lgh_output + rhs.lgh_output,
            cooling_output: self.cooling_output + rhs.cooling_output,
            power_output: self.power_output + rhs.power_output,
        }
    }
}

impl Sum for AssetOutputs {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Trait implemented by every dispatchable asset on the site.
///
/// The episode controller writes set-points into [`Asset::variables_mut`],
/// calls [`Asset::update`] once, and then reads [`Asset::outputs`].
pub trait Asset: std::fmt::Debug {
    /// Human-readable asset name.
    fn name(&self) -> &str;

    /// Controllable variables in declaration order.
    fn variables(&self) -> &[AssetVariable];

    /// Mutable access used to commit the next action.
    fn variables_mut(&mut self) -> &mut [AssetVariable];

    /// Recomputes derived outputs from the current variables.
    fn update(&mut self);

    /// Returns the asset to its declared initial operating point.
    fn reset(&mut self);

    /// Outputs computed by the last [`Asset::update`] call.
    fn outputs(&self) -> AssetOutputs;

    /// Returns a human-readable type name for the asset.
    fn asset_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_variable_starts_off() {
        let v = AssetVariable::new("GT 1 output", 5.0, 25.0, 5.0);
        assert_eq!(v.current, 0.0);
        assert!(v.is_consistent());
    }

    #[test]
    #[should_panic]
    fn min_above_max_panics() {
        AssetVariable::new("bad", 10.0, 5.0, 1.0);
    }

    #[test]
    fn consistency_rejects_gap_between_off_and_min() {
        let mut v = AssetVariable::new("GT 1 output", 5.0, 25.0, 5.0);
        v.current = 2.0;
        assert!(!v.is_consistent());
        v.current = 25.0;
        assert!(v.is_consistent());
    }

    #[test]
    fn outputs_sum() {
        let a = AssetOutputs {
            gas_burnt: 1.0,
            hgh_output: 2.0,
            lgh_output: 3.0,
            cooling_output: 0.5,
            power_output: 4.0,
        };
        let total: AssetOutputs = [a, a, AssetOutputs::default()].into_iter().sum();
        assert_eq!(total.gas_burnt, 2.0);
        assert_eq!(total.power_output, 8.0);
        assert_eq!(total.cooling_output, 1.0);
    }
}
