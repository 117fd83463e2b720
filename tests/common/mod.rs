//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;

use energy_gym::assets::{Asset, GasEngine};
use energy_gym::sim::env::Environment;
use energy_gym::sim::types::{ActionPolicy, EnvConfig};
use energy_gym::timeseries::{TimeSeries, TimeSeriesRow};

/// Header row of the time-series CSV layout.
pub const HEADER: &str = ",Timestamp,Settlement period,HGH,LGH,Cooling,Electrical,\
                          Gas price,Import electricity price,Export electricity price";

/// Row with HGH 10, electrical 20, gas 20, import 100, export 50, nothing else.
pub fn reference_row(settlement_period: u8) -> TimeSeriesRow {
    TimeSeriesRow {
        timestamp: NaiveDateTime::default(),
        settlement_period,
        hgh_demand: 10.0,
        lgh_demand: 0.0,
        cooling_demand: 0.0,
        electrical_demand: 20.0,
        gas_price: 20.0,
        import_price: 100.0,
        export_price: 50.0,
    }
}

/// In-memory series of `len` reference rows with settlement periods 1, 2, ...
pub fn reference_series(len: usize) -> Arc<TimeSeries> {
    let rows = (0..len)
        .map(|i| reference_row((i % 48) as u8 + 1))
        .collect();
    Arc::new(TimeSeries::from_rows(rows))
}

/// Three 25 MW engines: minimum 5, ramp radius 5.
pub fn three_engines() -> Vec<Box<dyn Asset>> {
    (1..=3)
        .map(|i| Box::new(GasEngine::with_size(format!("GT {i}"), 25.0)) as Box<dyn Asset>)
        .collect()
}

/// Environment over `reference_series(len)` with three engines.
pub fn environment(len: usize, lag: usize, policy: ActionPolicy) -> Environment {
    Environment::new(
        EnvConfig::new(lag).with_action_policy(policy),
        reference_series(len),
        three_engines(),
    )
    .expect("reference environment should build")
}

/// CSV text with `n` half-hourly rows whose demands vary with the row index.
pub fn csv_text(n: usize) -> String {
    let mut s = format!("{HEADER}\n");
    for i in 0..n {
        s.push_str(&format!(
            "{i},2016-01-{:02} {:02}:{:02}:00,{},{},{},{},{},20,{},{}\n",
            1 + i / 48,
            (i % 48) / 2,
            (i % 2) * 30,
            i % 48 + 1,
            10 + i % 5,
            4 + i % 3,
            i % 4,
            12 + i % 7,
            80 + i % 11,
            40 + i % 11,
        ));
    }
    s
}

/// Writes `csv_text(n)` to `dir/series.csv` and returns the path.
pub fn write_series(dir: &Path, n: usize) -> PathBuf {
    let path = dir.join("series.csv");
    fs::write(&path, csv_text(n)).expect("fixture CSV should be written");
    path
}

/// Path to the bundled sample time series.
pub fn sample_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/time_series.csv")
}
