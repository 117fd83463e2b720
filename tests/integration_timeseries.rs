//! Integration tests for loading time series from disk and running on them.

mod common;

use std::sync::Arc;

use energy_gym::config::ScenarioConfig;
use energy_gym::runner;
use energy_gym::sim::spaces::OBSERVATION_FIELDS;
use energy_gym::timeseries::TimeSeries;
use energy_gym::{DataError, SimError};

#[test]
fn loads_csv_from_disk_and_truncates() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = common::write_series(dir.path(), 60);
    let series = TimeSeries::load(&path, 48, 2).expect("series loads");
    assert_eq!(series.len(), 48);
    let row = series.row(47).expect("last row present");
    assert_eq!(row.settlement_period, 48);
    assert_eq!(row.timestamp.to_string(), "2016-01-01 23:30:00");
}

#[test]
fn too_few_rows_for_length_and_lag() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = common::write_series(dir.path(), 50);
    assert!(TimeSeries::load(&path, 48, 1).is_ok());
    let err = TimeSeries::load(&path, 48, 2).unwrap_err();
    assert!(matches!(err, SimError::Config(ref e) if e.field == "episode.episode_length"));
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = TimeSeries::load(&path, 4, 0).unwrap_err();
    assert!(matches!(err, SimError::Data(DataError::Io { .. })));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn bundled_sample_data_fits_declared_observation_bounds() {
    let series = TimeSeries::load(&common::sample_data(), 48, 0).expect("sample data loads");
    for (i, row) in series.rows().iter().enumerate() {
        let out = row.observation().out_of_bounds();
        assert!(out.is_empty(), "row {i} out of bounds: {out:?}");
    }
    assert_eq!(OBSERVATION_FIELDS.len(), 8);
}

#[test]
fn scenario_runs_end_to_end_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = common::write_series(dir.path(), 60);

    let mut cfg = ScenarioConfig::baseline();
    cfg.episode.time_series = path;
    cfg.episode.agent = "demand_following".to_string();
    let run = runner::run_scenario(&cfg).expect("episode runs");
    assert_eq!(run.records.len(), 47);
    assert_eq!(run.summary.steps, 47);
    assert!(run.summary.total_reward.is_finite());
}

#[test]
fn seeds_change_random_trajectories() {
    let series = Arc::new(
        TimeSeries::from_reader(common::csv_text(60).as_bytes(), 48, 0).expect("series parses"),
    );
    let mut cfg = ScenarioConfig::baseline();
    let a = runner::run_with_series(&cfg, Arc::clone(&series)).expect("run a");
    cfg.episode.seed = 43;
    let b = runner::run_with_series(&cfg, series).expect("run b");
    assert_ne!(a.records, b.records);
}
