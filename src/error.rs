//! Error types for loading, configuration, and episode interaction.

use std::path::PathBuf;

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Malformed or unreadable time-series input.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read time series \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column \"{column}\": \"{value}\" is not numeric")]
    NotNumeric {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: \"{value}\" is not a recognised timestamp")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: settlement period {value} is outside 0..=48")]
    SettlementPeriod { row: usize, value: f64 },

    #[error("row {row}, column \"{column}\": demand {value} is negative")]
    NegativeDemand {
        row: usize,
        column: &'static str,
        value: f64,
    },
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"episode.lag"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the episode controller while stepping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("episode is done; call reset() before stepping again")]
    EpisodeDone,

    #[error("action has {found} values but the site declares {expected} asset variables")]
    ActionLength { expected: usize, found: usize },

    #[error("action value for \"{variable}\" is not finite: {value}")]
    NonFinite { variable: String, value: f64 },

    #[error("action value {value} for \"{variable}\" lies outside the legal envelope {envelope}")]
    OutOfEnvelope {
        variable: String,
        value: f64,
        envelope: String,
    },
}
