use crate::assets::types::{Asset, AssetOutputs, AssetVariable};

/// Default minimum stable load as a fraction of rated size.
pub const DEFAULT_MIN_LOAD_FRACTION: f64 = 0.2;
/// Default ramp radius as a fraction of rated size.
pub const DEFAULT_RAMP_FRACTION: f64 = 0.2;
/// Default electrical efficiency (power out / fuel in).
pub const DEFAULT_ELECTRICAL_EFFICIENCY: f64 = 0.35;
/// Default share of fuel input recovered as high-grade heat.
pub const DEFAULT_HGH_FRACTION: f64 = 0.25;
/// Default share of fuel input recovered as low-grade heat.
pub const DEFAULT_LGH_FRACTION: f64 = 0.20;

/// A gas-fired reciprocating engine or turbine with heat recovery.
///
/// `GasEngine` exposes a single variable: its electrical set-point in MW.
/// Fuel burn scales linearly with output, and recovered heat is a fixed
/// share of the fuel input split between high- and low-grade circuits.
///
/// # Examples
///
/// ```
/// use energy_gym::assets::{Asset, GasEngine};
///
/// let mut gt = GasEngine::with_size("GT 1", 25.0);
/// gt.variables_mut()[0].current = 10.0;
/// gt.update();
/// assert_eq!(gt.outputs().power_output, 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct GasEngine {
    name: String,
    variables: [AssetVariable; 1],

    /// Electrical efficiency (0..1.0).
    pub electrical_efficiency: f64,

    /// Share of fuel input recovered as high-grade heat.
    pub hgh_fraction: f64,

    /// Share of fuel input recovered as low-grade heat.
    pub lgh_fraction: f64,

    outputs: AssetOutputs,
}

impl GasEngine {
    /// Creates a new gas engine.
    ///
    /// # Arguments
    ///
    /// * `name` - Asset name; the variable is named `"<name> output"`
    /// * `size_mw` - Rated electrical output (must be > 0)
    /// * `min_load_fraction` - Minimum stable load as a share of size (0..1.0]
    /// * `ramp_fraction` - Ramp radius as a share of size (>= 0)
    /// * `electrical_efficiency` - Power out / fuel in (0..1.0]
    /// * `hgh_fraction` - Share of fuel recovered as high-grade heat
    /// * `lgh_fraction` - Share of fuel recovered as low-grade heat
    ///
    /// # Panics
    ///
    /// Panics if size, fractions, or efficiency are out of range, or if the
    /// efficiency and heat fractions together exceed 1.0.
    pub fn new(
        name: impl Into<String>,
        size_mw: f64,
        min_load_fraction: f64,
        ramp_fraction: f64,
        electrical_efficiency: f64,
        hgh_fraction: f64,
        lgh_fraction: f64,
    ) -> Self {
        assert!(size_mw > 0.0);
        assert!(min_load_fraction > 0.0 && min_load_fraction <= 1.0);
        assert!(ramp_fraction >= 0.0);
        assert!(electrical_efficiency > 0.0 && electrical_efficiency <= 1.0);
        assert!(hgh_fraction >= 0.0 && lgh_fraction >= 0.0);
        assert!(electrical_efficiency + hgh_fraction + lgh_fraction <= 1.0);

        let name = name.into();
        let variable = AssetVariable::new(
            format!("{name} output"),
            size_mw * min_load_fraction,
            size_mw,
            size_mw * ramp_fraction,
        );

        Self {
            name,
            variables: [variable],
            electrical_efficiency,
            hgh_fraction,
            lgh_fraction,
            outputs: AssetOutputs::default(),
        }
    }

    /// Creates a gas engine of the given size with default characteristics.
    pub fn with_size(name: impl Into<String>, size_mw: f64) -> Self {
        Self::new(
            name,
            size_mw,
            DEFAULT_MIN_LOAD_FRACTION,
            DEFAULT_RAMP_FRACTION,
            DEFAULT_ELECTRICAL_EFFICIENCY,
            DEFAULT_HGH_FRACTION,
            DEFAULT_LGH_FRACTION,
        )
    }

    /// Current electrical set-point (MW).
    pub fn setpoint_mw(&self) -> f64 {
        self.variables[0].current
    }
}

impl Asset for GasEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&self) -> &[AssetVariable] {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut [AssetVariable] {
        &mut self.variables
    }

    fn update(&mut self) {
        let power = self.setpoint_mw().max(0.0);
        let gas = power / self.electrical_efficiency;
        self.outputs = AssetOutputs {
            gas_burnt: gas,
            hgh_output: gas * self.hgh_fraction,
            lgh_output: gas * self.lgh_fraction,
            cooling_output: 0.0,
            power_output: power,
        };
    }

    fn reset(&mut self) {
        self.variables[0].current = 0.0;
        self.outputs = AssetOutputs::default();
    }

    fn outputs(&self) -> AssetOutputs {
        self.outputs
    }

    fn asset_type(&self) -> &'static str {
        "GasEngine"
    }
}
