//! Tabular Q-learning agent
//!
//! Combines the discretizer, the Q-table and an ε-greedy policy, and applies
//! the one-step Q-learning update to observed transitions.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    ports::{Policy, QTableRepository},
    q_learning::{
        discretizer::{DiscreteState, Discretizer},
        q_table::QTable,
        serialization::SavedQTable,
    },
    types::{Action, ActionSet, Observation},
};

/// Hyperparameters and fixed structure of a Q-learning agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningParams {
    /// α, in (0, 1]
    pub learning_rate: f64,
    /// γ, in (0, 1]
    pub discount_factor: f64,
    /// Initial exploration rate, in [0, 1]
    pub epsilon: f64,
    /// Multiplicative decay per episode, in (0, 1]
    pub epsilon_decay: f64,
    /// Exploration floor, in [0, 1]
    pub min_epsilon: f64,
    /// Ordered action set
    pub actions: ActionSet,
    /// State discretizer
    pub discretizer: Discretizer,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount_factor: 0.95,
            epsilon: 0.0,
            epsilon_decay: 0.995,
            min_epsilon: 0.05,
            actions: ActionSet::default(),
            discretizer: Discretizer::default(),
        }
    }
}

impl QLearningParams {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the exploration schedule: initial value, per-episode decay and floor.
    pub fn with_exploration(mut self, epsilon: f64, epsilon_decay: f64, min_epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self.epsilon_decay = epsilon_decay;
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_actions(mut self, actions: ActionSet) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_discretizer(mut self, discretizer: Discretizer) -> Self {
        self.discretizer = discretizer;
        self
    }

    /// Check every scalar parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        let unit_open = |name: &str, value: f64| {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(Error::invalid_config(format!(
                    "{name} must be in (0, 1], got {value}"
                )))
            }
        };
        let unit_closed = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::invalid_config(format!(
                    "{name} must be in [0, 1], got {value}"
                )))
            }
        };

        unit_open("learning_rate", self.learning_rate)?;
        unit_open("discount_factor", self.discount_factor)?;
        unit_open("epsilon_decay", self.epsilon_decay)?;
        unit_closed("epsilon", self.epsilon)?;
        unit_closed("min_epsilon", self.min_epsilon)?;
        Ok(())
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by always updating toward the maximum next-state value,
/// regardless of which action the behaviour policy picked.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    discretizer: Discretizer,
    actions: ActionSet,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    initial_epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent with an empty Q-table
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any parameter is out of range.
    pub fn new(params: QLearningParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            q_table: QTable::new(params.actions.len()),
            discretizer: params.discretizer,
            actions: params.actions,
            learning_rate: params.learning_rate,
            discount_factor: params.discount_factor,
            epsilon: params.epsilon,
            initial_epsilon: params.epsilon,
            epsilon_decay: params.epsilon_decay,
            min_epsilon: params.min_epsilon,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Create an agent and restore its Q-table from `path`.
    ///
    /// A missing file is not an error: the agent starts with an empty table.
    /// Any other load failure propagates.
    pub fn open(
        params: QLearningParams,
        repository: &dyn QTableRepository,
        path: &Path,
    ) -> Result<Self> {
        let mut agent = Self::new(params)?;
        match agent.load_q_table(repository, path) {
            Ok(()) => {}
            Err(Error::StorageNotFound { path }) => {
                warn!(path = %path.display(), "No Q-table found, starting empty");
            }
            Err(e) => return Err(e),
        }
        Ok(agent)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// ε-greedy action selection
    pub fn act(&mut self, observation: &Observation) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            if let Some(&action) = self.actions.as_slice().choose(&mut self.rng) {
                return action;
            }
        }
        // Exploit: greedy action based on Q-values
        self.greedy_action(observation)
    }

    /// Exploit only: action with the highest Q-value, lowest index on ties
    pub fn greedy_action(&mut self, observation: &Observation) -> Action {
        let state = self.discretizer.discretize(observation);
        let index = self.q_table.greedy_index(state);
        self.actions.as_slice()[index]
    }

    /// Q-values for an observation without touching the table
    pub fn q_values(&self, observation: &Observation) -> Vec<f64> {
        let state = self.discretizer.discretize(observation);
        self.q_table
            .get(&state)
            .map(<[f64]>::to_vec)
            .unwrap_or_else(|| vec![0.0; self.actions.len()])
    }

    /// Q-learning update for one observed transition
    ///
    /// Q(s,a) ← Q(s,a) + α[target - Q(s,a)] where target is `r` on terminal
    /// transitions and `r + γ max_a' Q(s',a')` otherwise.
    ///
    /// Returns the TD error `target - Q(s,a)` before the update.
    pub fn update(
        &mut self,
        state: &Observation,
        action: Action,
        reward: f64,
        next_state: &Observation,
        done: bool,
    ) -> Result<f64> {
        let state = self.discretizer.discretize(state);
        let next_state = self.discretizer.discretize(next_state);
        self.update_discrete(state, action, reward, next_state, done)
    }

    /// Q-learning update on already discretized states
    pub fn update_discrete(
        &mut self,
        state: DiscreteState,
        action: Action,
        reward: f64,
        next_state: DiscreteState,
        done: bool,
    ) -> Result<f64> {
        let action_index = self.actions.index_of(action)?;

        let current_q = self.q_table.values_mut(state)[action_index];
        let td_target = if done {
            reward
        } else {
            reward + self.discount_factor * self.q_table.max_q(next_state)
        };
        let td_error = td_target - current_q;
        self.q_table.values_mut(state)[action_index] = current_q + self.learning_rate * td_error;
        Ok(td_error)
    }

    /// Decay epsilon after an episode, never below the floor
    ///
    /// An initial rate below `min_epsilon` is lifted to the floor by the
    /// first decay and stays there.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
        debug!(epsilon = self.epsilon, "Exploration rate decayed");
    }

    /// Discard everything learned: empty table, initial epsilon, reseeded RNG.
    pub fn reset_learning(&mut self) {
        self.q_table.reset();
        self.epsilon = self.initial_epsilon;
        self.reset_rng();
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }

    /// Persist the Q-table through `repository`
    pub fn save_q_table(&self, repository: &dyn QTableRepository, path: &Path) -> Result<()> {
        let saved = SavedQTable::from_agent(self);
        repository.save(&saved, path)?;
        info!(
            path = %path.display(),
            states = self.q_table.len(),
            "Saved Q-table"
        );
        Ok(())
    }

    /// Replace the Q-table with one loaded through `repository`
    ///
    /// # Errors
    ///
    /// [`Error::StorageNotFound`] if nothing exists at `path`,
    /// [`Error::StorageCorrupt`] for undecodable data, and
    /// [`Error::ActionSetMismatch`] / [`Error::DiscretizerMismatch`] if the
    /// table was trained with a different configuration.
    pub fn load_q_table(&mut self, repository: &dyn QTableRepository, path: &Path) -> Result<()> {
        let saved = repository.load(path)?;
        self.q_table = saved.into_q_table(&self.actions, &self.discretizer, path)?;
        info!(
            path = %path.display(),
            states = self.q_table.len(),
            "Loaded Q-table"
        );
        Ok(())
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min_epsilon(&self) -> f64 {
        self.min_epsilon
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}

impl Policy for QLearningAgent {
    fn act(&mut self, observation: &Observation) -> Result<Action> {
        Ok(QLearningAgent::act(self, observation))
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}
