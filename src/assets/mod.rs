//! Dispatchable generation assets.

/// Gas engine with heat recovery.
pub mod gas_engine;
pub mod types;

pub use gas_engine::GasEngine;
pub use types::{Asset, AssetOutputs, AssetVariable};
