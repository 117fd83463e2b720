//! Post-hoc episode summary computed from step records.

use std::fmt;

use serde::Serialize;

use super::types::StepRecord;

/// Aggregate indicators derived from a complete episode.
///
/// Computed post-hoc from `Vec<StepRecord>` so that reported totals always
/// agree with the per-step data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub steps: usize,
    /// Sum of per-step rewards.
    pub total_reward: f64,
    pub gas_cost: f64,
    pub import_cost: f64,
    pub export_revenue: f64,
    /// Total imported electricity (MW summed over periods).
    pub imported: f64,
    /// Total exported electricity (MW summed over periods).
    pub exported: f64,
    /// Total heat supplied by the backup boiler.
    pub backup_heat: f64,
    /// Total cooling supplied by the backup chiller.
    pub backup_cooling: f64,
    /// Highest single-period import.
    pub peak_import: f64,
    /// Steps where at least one action value was clipped.
    pub clipped_steps: usize,
}

impl EpisodeSummary {
    pub fn from_records(records: &[StepRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            let s = &r.settlement;
            acc.steps += 1;
            acc.total_reward += s.reward;
            acc.gas_cost += s.gas_cost;
            acc.import_cost += s.import_cost;
            acc.export_revenue += s.export_revenue;
            acc.imported += s.import;
            acc.exported += s.export;
            acc.backup_heat += s.backup_heat;
            acc.backup_cooling += s.backup_cooling;
            acc.peak_import = acc.peak_import.max(s.import);
            if r.clipped {
                acc.clipped_steps += 1;
            }
            acc
        })
    }

    pub fn mean_reward(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.total_reward / self.steps as f64
        }
    }
}

impl fmt::Display for EpisodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Episode Summary ---")?;
        writeln!(f, "Steps:                 {}", self.steps)?;
        writeln!(
            f,
            "Total reward:          {:.2} (mean {:.2})",
            self.total_reward,
            self.mean_reward()
        )?;
        writeln!(f, "Gas cost:              {:.2}", self.gas_cost)?;
        writeln!(f, "Import cost:           {:.2}", self.import_cost)?;
        writeln!(f, "Export revenue:        {:.2}", self.export_revenue)?;
        writeln!(
            f,
            "Imported / exported:   {:.2} / {:.2} MW (peak import {:.2})",
            self.imported, self.exported, self.peak_import
        )?;
        writeln!(
            f,
            "Backup heat / cooling: {:.2} / {:.2} MW",
            self.backup_heat, self.backup_cooling
        )?;
        write!(f, "Clipped steps:         {}", self.clipped_steps)
    }
}
