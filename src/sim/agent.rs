use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::EnvError;

use super::env::Environment;
use super::envelope::ActionSpace;
use super::spaces::Observation;
use super::types::{Reset, StepRecord};

/// Policy that picks the next action from the published envelope.
pub trait Agent {
    /// Returns one set-point per asset variable, in declaration order.
    fn act(&mut self, observation: &Observation, space: &ActionSpace) -> Vec<f64>;
}

/// Samples every envelope uniformly.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _observation: &Observation, space: &ActionSpace) -> Vec<f64> {
        space.sample(&mut self.rng)
    }
}

/// Naive dispatcher that tracks site electrical demand.
///
/// Demand is split evenly across asset variables and each share is projected
/// onto its envelope, so engines that are off start at minimum load once the
/// share is closer to minimum than to zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemandFollowingAgent;

impl Agent for DemandFollowingAgent {
    fn act(&mut self, observation: &Observation, space: &ActionSpace) -> Vec<f64> {
        if space.is_empty() {
            return Vec::new();
        }
        let share = observation.electrical_demand().max(0.0) / space.len() as f64;
        space.envelopes().iter().map(|e| e.project(share)).collect()
    }
}

/// Resets `env` and steps with `agent` until the episode is done.
///
/// # Returns
///
/// One `StepRecord` per step, in order.
pub fn run_episode<A: Agent + ?Sized>(
    env: &mut Environment,
    agent: &mut A,
) -> Result<Vec<StepRecord>, EnvError> {
    let Reset {
        mut observation, ..
    } = env.reset();
    let mut records = Vec::with_capacity(env.horizon());
    loop {
        let action = agent.act(&observation, env.action_space());
        let outcome = env.step(&action)?;
        observation = outcome.observation;
        records.push(outcome.record);
        if outcome.done {
            break;
        }
    }
    Ok(records)
}
