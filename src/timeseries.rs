//! Exogenous demand and price time series.
//!
//! The stored form is a CSV file with a header row. The first column is a
//! row index and is ignored; the remaining columns are, in order:
//!
//! | column | content                         |
//! |--------|---------------------------------|
//! | 1      | timestamp                       |
//! | 2      | settlement period (0..=48)      |
//! | 3..=6  | HGH, LGH, cooling, electrical demand |
//! | 7..=9  | gas, import, export price (per MWh)  |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

use crate::error::{ConfigError, DataError, SimResult};
use crate::sim::spaces::Observation;

/// Column names used in error messages, in stored order after the index.
const COLUMN_NAMES: [&str; 9] = [
    "timestamp",
    "settlement_period",
    "hgh_demand",
    "lgh_demand",
    "cooling_demand",
    "electrical_demand",
    "gas_price",
    "import_price",
    "export_price",
];

/// Accepted naive timestamp layouts, tried in order before RFC 3339.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// Largest legal settlement period index.
pub const MAX_SETTLEMENT_PERIOD: u8 = 48;

/// One half-hour of exogenous demand and price signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub timestamp: NaiveDateTime,
    pub settlement_period: u8,
    /// High-grade heat demand (MW).
    pub hgh_demand: f64,
    /// Low-grade heat demand (MW).
    pub lgh_demand: f64,
    /// Cooling demand (MW).
    pub cooling_demand: f64,
    /// Electrical demand (MW).
    pub electrical_demand: f64,
    /// Gas price (per MWh).
    pub gas_price: f64,
    /// Import electricity price (per MWh).
    pub import_price: f64,
    /// Export electricity price (per MWh).
    pub export_price: f64,
}

impl TimeSeriesRow {
    /// Non-timestamp fields in declared observation order.
    pub fn observation(&self) -> Observation {
        Observation::new([
            f64::from(self.settlement_period),
            self.hgh_demand,
            self.lgh_demand,
            self.cooling_demand,
            self.electrical_demand,
            self.gas_price,
            self.import_price,
            self.export_price,
        ])
    }

    pub fn total_heat_demand(&self) -> f64 {
        self.hgh_demand + self.lgh_demand
    }
}

/// Immutable, ordered sequence of rows for one episode.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    rows: Vec<TimeSeriesRow>,
}

impl TimeSeries {
    /// Loads a time series from a CSV file and truncates it to `episode_length` rows.
    ///
    /// # Errors
    ///
    /// Returns a `DataError` if the file is absent or malformed, and a
    /// `ConfigError` if `episode_length` is zero or the file holds fewer than
    /// `episode_length + lag + 1` rows.
    pub fn load(path: &Path, episode_length: usize, lag: usize) -> SimResult<Self> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let series = Self::from_reader(file, episode_length, lag)?;
        tracing::info!(
            path = %path.display(),
            rows = series.len(),
            lag,
            "time series loaded"
        );
        Ok(series)
    }

    /// Parses CSV from any reader with the same rules as [`TimeSeries::load`].
    pub fn from_reader<R: Read>(reader: R, episode_length: usize, lag: usize) -> SimResult<Self> {
        if episode_length == 0 {
            return Err(ConfigError::new("episode.episode_length", "must be > 0").into());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record.map_err(DataError::from)?;
            rows.push(parse_record(&record, i + 1)?);
        }

        let required = episode_length + lag + 1;
        if rows.len() < required {
            return Err(ConfigError::new(
                "episode.episode_length",
                format!(
                    "time series has {} rows but episode_length + lag + 1 = {required} are required",
                    rows.len()
                ),
            )
            .into());
        }

        rows.truncate(episode_length);
        Ok(Self { rows })
    }

    /// Wraps rows that were built in memory.
    pub fn from_rows(rows: Vec<TimeSeriesRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&TimeSeriesRow> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[TimeSeriesRow] {
        &self.rows
    }
}

fn parse_record(record: &csv::StringRecord, row: usize) -> Result<TimeSeriesRow, DataError> {
    let expected = COLUMN_NAMES.len() + 1;
    if record.len() < expected {
        return Err(DataError::MissingColumns {
            row,
            expected,
            found: record.len(),
        });
    }

    // Column 0 is the stored index.
    let timestamp = parse_timestamp(&record[1], row)?;

    let mut values = [0.0_f64; 8];
    let columns = COLUMN_NAMES.iter().copied().skip(1);
    let fields = record.iter().skip(2).zip(columns);
    for (slot, (raw, column)) in values.iter_mut().zip(fields) {
        *slot = parse_number(raw, row, column)?;
    }
    let [sp, hgh, lgh, cooling, electrical, gas, import, export] = values;

    if sp.fract() != 0.0 || !(0.0..=f64::from(MAX_SETTLEMENT_PERIOD)).contains(&sp) {
        return Err(DataError::SettlementPeriod { row, value: sp });
    }

    for (value, column) in [hgh, lgh, cooling, electrical]
        .into_iter()
        .zip(COLUMN_NAMES[2..6].iter().copied())
    {
        if value < 0.0 {
            return Err(DataError::NegativeDemand { row, column, value });
        }
    }

    Ok(TimeSeriesRow {
        timestamp,
        settlement_period: sp as u8,
        hgh_demand: hgh,
        lgh_demand: lgh,
        cooling_demand: cooling,
        electrical_demand: electrical,
        gas_price: gas,
        import_price: import,
        export_price: export,
    })
}

fn parse_number(raw: &str, row: usize, column: &'static str) -> Result<f64, DataError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::NotNumeric {
            row,
            column,
            value: raw.to_string(),
        })
}

fn parse_timestamp(raw: &str, row: usize) -> Result<NaiveDateTime, DataError> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .ok_or_else(|| DataError::BadTimestamp {
            row,
            value: raw.to_string(),
        })
}
