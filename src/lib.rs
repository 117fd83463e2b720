//! Gym-style dispatch environment for an industrial energy site.
//!
//! An agent sets the electrical output of gas engines each half-hourly
//! settlement period; backup plant covers any heat and cooling shortfall,
//! the grid balances electricity, and the period's cash flow is the reward.

#[cfg(feature = "api")]
pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod io;
pub mod runner;
/// Episode controller, action envelopes, settlement, and agents.
pub mod sim;
pub mod timeseries;

pub use error::{ConfigError, DataError, EnvError, SimError, SimResult};
