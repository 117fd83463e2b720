//! Config-driven construction of the environment and agent.

use std::sync::Arc;

use tracing::info;

use crate::assets::Asset;
use crate::config::ScenarioConfig;
use crate::error::{ConfigError, SimResult};
use crate::sim::agent::{Agent, DemandFollowingAgent, RandomAgent, run_episode};
use crate::sim::env::Environment;
use crate::sim::kpi::EpisodeSummary;
use crate::sim::types::StepRecord;
use crate::timeseries::TimeSeries;

/// Completed episode: the scenario it ran, every step, and the summary.
#[derive(Debug, Clone)]
pub struct EpisodeRun {
    pub config: ScenarioConfig,
    pub records: Vec<StepRecord>,
    pub summary: EpisodeSummary,
}

/// Builds the site's assets in declaration order.
pub fn build_assets(cfg: &ScenarioConfig) -> Vec<Box<dyn Asset>> {
    cfg.assets
        .iter()
        .map(|a| Box::new(a.build()) as Box<dyn Asset>)
        .collect()
}

/// Builds the agent named in `episode.agent`.
///
/// Unknown names fall back to the random agent; `validate` reports them.
pub fn build_agent(cfg: &ScenarioConfig) -> Box<dyn Agent> {
    match cfg.episode.agent.as_str() {
        "demand_following" => Box::new(DemandFollowingAgent),
        _ => Box::new(RandomAgent::new(cfg.episode.seed)),
    }
}

/// Builds a reset environment over an already loaded series.
///
/// # Errors
///
/// Returns a `ConfigError` if the series is too short for the lag.
pub fn build_environment(
    cfg: &ScenarioConfig,
    series: Arc<TimeSeries>,
) -> Result<Environment, ConfigError> {
    Environment::new(cfg.env_config(), series, build_assets(cfg))
}

/// Validates `cfg`, loads its time series, and runs one episode.
///
/// # Errors
///
/// Returns the first validation error, or any load or step error.
pub fn run_scenario(cfg: &ScenarioConfig) -> SimResult<EpisodeRun> {
    if let Some(err) = cfg.validate().into_iter().next() {
        return Err(err.into());
    }
    let ep = &cfg.episode;
    let series = TimeSeries::load(&ep.time_series, ep.episode_length, ep.lag)?;
    run_with_series(cfg, Arc::new(series))
}

/// Runs one episode of `cfg` over `series`.
///
/// # Errors
///
/// Returns a `ConfigError` if the environment cannot be built, or an
/// `EnvError` if the agent produces an illegal action under the
/// `reject` policy.
pub fn run_with_series(cfg: &ScenarioConfig, series: Arc<TimeSeries>) -> SimResult<EpisodeRun> {
    let mut env = build_environment(cfg, series)?;
    let mut agent = build_agent(cfg);
    let records = run_episode(&mut env, agent.as_mut())?;
    let summary = EpisodeSummary::from_records(&records);
    info!(
        steps = summary.steps,
        total_reward = summary.total_reward,
        agent = %cfg.episode.agent,
        lag = env.config().lag,
        rows = env.series().len(),
        "episode complete"
    );
    Ok(EpisodeRun {
        config: cfg.clone(),
        records,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::error::SimError;
    use crate::timeseries::TimeSeriesRow;

    fn series(len: usize) -> Arc<TimeSeries> {
        let rows = (0..len)
            .map(|i| TimeSeriesRow {
                timestamp: NaiveDateTime::default(),
                settlement_period: (i % 48) as u8 + 1,
                hgh_demand: 12.0,
                lgh_demand: 6.0,
                cooling_demand: 2.0,
                electrical_demand: 15.0,
                gas_price: 18.0,
                import_price: 80.0,
                export_price: 40.0,
            })
            .collect();
        Arc::new(TimeSeries::from_rows(rows))
    }

    #[test]
    fn same_scenario_and_seed_is_deterministic() {
        let cfg = ScenarioConfig::baseline();
        let a = run_with_series(&cfg, series(48)).unwrap();
        let b = run_with_series(&cfg, series(48)).unwrap();
        assert_eq!(a.records, b.records);
        assert_eq!(a.summary.steps, 47);
    }

    #[test]
    fn builds_agent_from_config() {
        let cfg = ScenarioConfig::single_engine();
        let run = run_with_series(&cfg, series(10)).unwrap();
        // 15 MW demand on one 25 MW engine: off → 5 → 10 → 15
        assert_eq!(run.records[0].action, vec![5.0]);
        assert_eq!(run.records[1].action, vec![10.0]);
        assert_eq!(run.records[2].action, vec![15.0]);
        assert_eq!(run.summary.clipped_steps, 0);
    }

    #[test]
    fn environment_carries_scenario_settings() {
        let cfg = ScenarioConfig::high_lag();
        let env = build_environment(&cfg, series(12)).unwrap();
        assert_eq!(env.config().lag, 2);
        assert_eq!(env.config().action_policy, cfg.episode.action_policy);
        assert_eq!(env.series().len(), 12);
        let names: Vec<_> = env.assets().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["GT 1", "GT 2", "GT 3"]);
        assert!(env.assets().iter().all(|a| a.asset_type() == "GasEngine"));
    }

    #[test]
    fn lag_shortens_the_episode() {
        let run = run_with_series(&ScenarioConfig::high_lag(), series(48)).unwrap();
        assert_eq!(run.records.len(), 45);
    }

    #[test]
    fn too_short_series_is_config_error() {
        let err = run_with_series(&ScenarioConfig::high_lag(), series(3)).unwrap_err();
        assert!(matches!(err, SimError::Config(e) if e.field == "episode.lag"));
    }

    #[test]
    fn invalid_config_is_reported_before_loading() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.episode.agent = "bogus".to_string();
        let err = run_scenario(&cfg).unwrap_err();
        assert!(matches!(err, SimError::Config(e) if e.field == "episode.agent"));
    }
}
