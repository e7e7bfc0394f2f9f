//! Environment port - the game the agent plays

use crate::{
    Result,
    types::{Action, Observation},
};

/// Result of applying one action to the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Reward for the step
    pub reward: f64,
    /// Whether the episode ended
    pub done: bool,
}

impl StepOutcome {
    pub fn new(reward: f64, done: bool) -> Self {
        Self { reward, done }
    }
}

/// Game simulator driven by the training pipeline.
///
/// Physics and reward design live entirely on the implementor's side.
pub trait Environment {
    /// Start a new episode.
    fn reset(&mut self) -> Result<()>;

    /// Current continuous state.
    fn observe(&self) -> Observation;

    /// Apply `action` and advance one step.
    fn step(&mut self, action: Action) -> Result<StepOutcome>;
}
