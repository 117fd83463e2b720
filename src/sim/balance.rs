//! Site energy balance and half-hourly settlement.

use serde::{Deserialize, Serialize};

use crate::assets::AssetOutputs;
use crate::timeseries::TimeSeriesRow;

/// Fixed characteristics of the site's backup plant and settlement rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteParameters {
    /// Backup boiler efficiency (heat out / gas in).
    pub boiler_efficiency: f64,
    /// Backup electric chiller coefficient of performance.
    pub chiller_cop: f64,
    /// Settlement periods per hour; rates per hour are divided by this.
    pub settlements_per_hour: f64,
}

impl Default for SiteParameters {
    fn default() -> Self {
        Self {
            boiler_efficiency: 0.8,
            chiller_cop: 3.0,
            settlements_per_hour: 2.0,
        }
    }
}

/// Energy balance and cash flows for one settlement period.
///
/// All energy quantities are MW averaged over the period; money is in the
/// price unit of the time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Settlement {
    /// Aggregated output of all dispatchable assets.
    pub generation: AssetOutputs,
    /// Heat supplied by the backup boiler (HGH + LGH shortfall).
    pub backup_heat: f64,
    /// Gas burnt by the backup boiler.
    pub backup_gas: f64,
    /// Asset gas plus backup boiler gas.
    pub total_gas: f64,
    /// Cooling supplied by the backup chiller.
    pub backup_cooling: f64,
    /// Electrical load added by the backup chiller.
    pub chiller_load: f64,
    /// Demand plus chiller load minus generation (positive = import).
    pub electrical_balance: f64,
    /// Imported electricity (>= 0).
    pub import: f64,
    /// Exported electricity (>= 0).
    pub export: f64,
    pub gas_cost: f64,
    pub import_cost: f64,
    pub export_revenue: f64,
    /// `export_revenue - (gas_cost + import_cost)`.
    pub reward: f64,
}

/// Unmet demand after generation, floored at zero.
pub fn shortfall(demand: f64, generated: f64) -> f64 {
    (demand - generated).max(0.0)
}

/// Splits a signed electrical balance into `(import, export)` magnitudes.
///
/// At most one of the two is non-zero.
pub fn split_balance(balance: f64) -> (f64, f64) {
    if balance > 0.0 {
        (balance, 0.0)
    } else if balance < 0.0 {
        (0.0, -balance)
    } else {
        (0.0, 0.0)
    }
}

/// Settles one period: backup supply, grid exchange, and reward.
///
/// # Arguments
///
/// * `generation` - Summed outputs of all assets for this step
/// * `row` - Exogenous demand and prices the action is evaluated against
/// * `site` - Backup plant and settlement parameters
pub fn settle(generation: AssetOutputs, row: &TimeSeriesRow, site: &SiteParameters) -> Settlement {
    // Heat: each grade is balanced separately, the boiler covers both.
    let backup_heat = shortfall(row.hgh_demand, generation.hgh_output)
        + shortfall(row.lgh_demand, generation.lgh_output);
    let backup_gas = backup_heat / site.boiler_efficiency;
    let total_gas = generation.gas_burnt + backup_gas;

    // Cooling: the chiller's electricity joins site demand.
    let backup_cooling = shortfall(row.cooling_demand, generation.cooling_output);
    let chiller_load = backup_cooling / site.chiller_cop;

    let electrical_balance = row.electrical_demand + chiller_load - generation.power_output;
    let (import, export) = split_balance(electrical_balance);

    let per_period = site.settlements_per_hour;
    let gas_cost = row.gas_price * total_gas / per_period;
    let import_cost = row.import_price * import / per_period;
    let export_revenue = row.export_price * export / per_period;

    Settlement {
        generation,
        backup_heat,
        backup_gas,
        total_gas,
        backup_cooling,
        chiller_load,
        electrical_balance,
        import,
        export,
        gas_cost,
        import_cost,
        export_revenue,
        reward: export_revenue - (gas_cost + import_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn row(hgh: f64, lgh: f64, cooling: f64, elec: f64) -> TimeSeriesRow {
        TimeSeriesRow {
            timestamp: NaiveDateTime::default(),
            settlement_period: 1,
            hgh_demand: hgh,
            lgh_demand: lgh,
            cooling_demand: cooling,
            electrical_demand: elec,
            gas_price: 20.0,
            import_price: 100.0,
            export_price: 50.0,
        }
    }

    fn outputs(gas: f64, hgh: f64, lgh: f64, cooling: f64, power: f64) -> AssetOutputs {
        AssetOutputs {
            gas_burnt: gas,
            hgh_output: hgh,
            lgh_output: lgh,
            cooling_output: cooling,
            power_output: power,
        }
    }

    #[test]
    fn all_assets_off_backup_covers_everything() {
        // boiler: 10 heat / 0.8 = 12.5 gas → 20 * 12.5 / 2 = 125
        // import: 20 MW at 100 / 2 = 1000
        let s = settle(
            AssetOutputs::default(),
            &row(10.0, 0.0, 0.0, 20.0),
            &SiteParameters::default(),
        );
        assert_eq!(s.backup_heat, 10.0);
        assert_eq!(s.total_gas, 12.5);
        assert_eq!(s.gas_cost, 125.0);
        assert_eq!(s.import, 20.0);
        assert_eq!(s.import_cost, 1000.0);
        assert_eq!(s.export, 0.0);
        assert_eq!(s.reward, -1125.0);
    }

    #[test]
    fn heat_grades_do_not_offset_each_other() {
        // Surplus HGH cannot cover an LGH shortfall.
        let s = settle(
            outputs(0.0, 15.0, 0.0, 0.0, 0.0),
            &row(10.0, 4.0, 0.0, 0.0),
            &SiteParameters::default(),
        );
        assert_eq!(s.backup_heat, 4.0);
        assert_eq!(s.backup_gas, 5.0);
    }

    #[test]
    fn chiller_load_adds_to_import() {
        let s = settle(
            AssetOutputs::default(),
            &row(0.0, 0.0, 6.0, 1.0),
            &SiteParameters::default(),
        );
        assert_eq!(s.backup_cooling, 6.0);
        assert_eq!(s.chiller_load, 2.0);
        assert_eq!(s.import, 3.0);
        assert_eq!(s.import_cost, 150.0);
    }

    #[test]
    fn surplus_generation_is_exported() {
        // 30 MW out vs 20 MW demand: 10 MW export at 50 / 2 = 250 revenue
        let s = settle(
            outputs(60.0, 20.0, 10.0, 0.0, 30.0),
            &row(10.0, 5.0, 0.0, 20.0),
            &SiteParameters::default(),
        );
        assert_eq!(s.import, 0.0);
        assert_eq!(s.export, 10.0);
        assert_eq!(s.export_revenue, 250.0);
        assert_eq!(s.backup_heat, 0.0);
        assert_eq!(s.gas_cost, 600.0);
        assert_eq!(s.reward, 250.0 - 600.0);
    }

    #[test]
    fn import_and_export_are_exclusive() {
        for balance in [-7.5, -0.1, 0.0, 0.1, 12.0] {
            let (import, export) = split_balance(balance);
            assert!(import >= 0.0 && export >= 0.0);
            assert_eq!(import * export, 0.0);
            assert!((import - export - balance).abs() < 1e-12);
        }
    }

    #[test]
    fn exact_balance_has_no_negative_zero() {
        for balance in [0.0, -0.0] {
            let (import, export) = split_balance(balance);
            assert!(import.is_sign_positive() && export.is_sign_positive());
        }
        let s = settle(
            outputs(40.0, 10.0, 5.0, 0.0, 20.0),
            &row(10.0, 5.0, 0.0, 20.0),
            &SiteParameters::default(),
        );
        assert!(s.export.is_sign_positive());
        assert_eq!(s.export_revenue.to_string(), "0");
    }

    #[test]
    fn shortfall_never_negative() {
        assert_eq!(shortfall(5.0, 8.0), 0.0);
        assert_eq!(shortfall(8.0, 5.0), 3.0);
    }

    #[test]
    fn custom_site_parameters() {
        let site = SiteParameters {
            boiler_efficiency: 0.5,
            chiller_cop: 4.0,
            settlements_per_hour: 1.0,
        };
        let s = settle(AssetOutputs::default(), &row(1.0, 1.0, 4.0, 0.0), &site);
        assert_eq!(s.backup_gas, 4.0);
        assert_eq!(s.chiller_load, 1.0);
        assert_eq!(s.gas_cost, 80.0);
    }
}
