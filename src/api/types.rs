//! API response and query types.
//!
//! Telemetry field names match the CSV export columns.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::sim::kpi::EpisodeSummary;
use crate::sim::types::StepRecord;

/// Combined state response: scenario, summary, and latest step.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub config: ScenarioConfig,
    pub summary: EpisodeSummary,
    /// Last step of the episode; `null` when no step was recorded.
    pub latest_step: Option<TelemetryRecord>,
}

/// Single step flattened to the CSV export's field names.
#[derive(Debug, Serialize)]
pub struct TelemetryRecord {
    pub step: usize,
    pub settlement_period: u8,
    /// Committed set-points in declaration order (MW).
    pub action_mw: Vec<f64>,
    pub clipped: bool,
    pub electrical_demand: f64,
    pub import_price: f64,
    pub export_price: f64,
    /// Total asset electrical output (MW).
    pub generation_mw: f64,
    pub backup_heat: f64,
    pub backup_cooling: f64,
    pub import_mw: f64,
    pub export_mw: f64,
    pub gas_cost: f64,
    pub import_cost: f64,
    pub export_revenue: f64,
    pub reward: f64,
}

impl From<&StepRecord> for TelemetryRecord {
    fn from(r: &StepRecord) -> Self {
        let s = &r.settlement;
        Self {
            step: r.step,
            settlement_period: r.settlement_period,
            action_mw: r.action.clone(),
            clipped: r.clipped,
            electrical_demand: r.electrical_demand,
            import_price: r.import_price,
            export_price: r.export_price,
            generation_mw: s.generation.power_output,
            backup_heat: s.backup_heat,
            backup_cooling: s.backup_cooling,
            import_mw: s.import,
            export_mw: s.export,
            gas_cost: s.gas_cost,
            import_cost: s.import_cost,
            export_revenue: s.export_revenue,
            reward: s.reward,
        }
    }
}

/// Optional range query parameters for the telemetry endpoint.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// First step (inclusive).
    pub from: Option<usize>,
    /// Last step (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
