/// Sample policies and the episode driver.
pub mod agent;
/// Backup supply, grid exchange, and reward settlement.
pub mod balance;
/// Episode step counter with lagged evaluation.
pub mod clock;
pub mod env;
pub mod envelope;
pub mod kpi;
pub mod spaces;
pub mod types;

pub use agent::{Agent, DemandFollowingAgent, RandomAgent, run_episode};
pub use env::Environment;
