//! Network agent: greedy policy over a dense network's Q-value estimates

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    adapters::msgpack_repository::{read_msgpack, write_atomic},
    error::{Error, Result},
    network::dense::DenseNetwork,
    ports::Policy,
    q_learning::{Discretizer, q_table::argmax_first},
    types::{Action, ActionSet, Observation},
};

/// Per-feature input normalisation `(x - mean) / std`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub mean: [f64; 4],
    pub std: [f64; 4],
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            mean: [0.0; 4],
            std: [1.0; 4],
        }
    }
}

impl Normalization {
    pub fn new(mean: [f64; 4], std: [f64; 4]) -> Result<Self> {
        let normalization = Self { mean, std };
        normalization.validate()?;
        Ok(normalization)
    }

    fn validate(&self) -> Result<()> {
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(Error::invalid_config("normalization mean must be finite"));
        }
        if self.std.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(Error::invalid_config(
                "normalization std must be finite and non-zero",
            ));
        }
        Ok(())
    }

    pub fn apply(&self, features: [usize; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (i, value) in features.into_iter().enumerate() {
            out[i] = (value as f64 - self.mean[i]) / self.std[i];
        }
        out
    }
}

/// Stateless policy backed by a pre-trained network
///
/// Uses the same [`Discretizer`] as the tabular agent so both see identical
/// bucket indices.
#[derive(Debug, Clone)]
pub struct NetworkAgent {
    network: DenseNetwork,
    normalization: Normalization,
    discretizer: Discretizer,
    actions: ActionSet,
}

impl NetworkAgent {
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if the network does not take four
    /// inputs or does not produce one output per action.
    pub fn new(
        network: DenseNetwork,
        normalization: Normalization,
        discretizer: Discretizer,
        actions: ActionSet,
    ) -> Result<Self> {
        normalization.validate()?;
        if network.input_width() != 4 {
            return Err(Error::invalid_config(format!(
                "network must take 4 inputs, takes {}",
                network.input_width()
            )));
        }
        if network.output_width() != actions.len() {
            return Err(Error::invalid_config(format!(
                "network produces {} outputs for {} actions",
                network.output_width(),
                actions.len()
            )));
        }
        Ok(Self {
            network,
            normalization,
            discretizer,
            actions,
        })
    }

    /// Load a saved network and check it against the expected configuration.
    pub fn load(path: &Path, discretizer: &Discretizer, actions: &ActionSet) -> Result<Self> {
        let saved = SavedNetwork::load_from_file(path)?;
        let agent = saved.into_agent(discretizer, actions, path)?;
        info!(
            path = %path.display(),
            layers = agent.network.layers().len(),
            "Loaded network"
        );
        Ok(agent)
    }

    /// Predicted Q-values for an observation, in action order
    pub fn q_values(&self, observation: &Observation) -> Result<Vec<f64>> {
        let state = self.discretizer.discretize(observation);
        let input = self.normalization.apply(state.to_array());
        self.network.forward(&input)
    }

    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }
}

impl Policy for NetworkAgent {
    fn act(&mut self, observation: &Observation) -> Result<Action> {
        let q_values = self.q_values(observation)?;
        self.actions.get(argmax_first(&q_values))
    }

    fn name(&self) -> &str {
        "Network"
    }
}

/// Persisted network bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedNetwork {
    pub version: u32,
    pub actions: ActionSet,
    pub discretizer: Discretizer,
    pub normalization: Normalization,
    pub network: DenseNetwork,
}

impl SavedNetwork {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &NetworkAgent) -> Self {
        Self {
            version: Self::VERSION,
            actions: agent.actions.clone(),
            discretizer: agent.discretizer.clone(),
            normalization: agent.normalization.clone(),
            network: agent.network.clone(),
        }
    }

    /// Check the bundle against the expected configuration and build the
    /// agent. `path` is only used for error reporting.
    pub fn into_agent(
        self,
        discretizer: &Discretizer,
        actions: &ActionSet,
        path: &Path,
    ) -> Result<NetworkAgent> {
        if self.version != Self::VERSION {
            return Err(Error::StorageCorrupt {
                path: path.to_path_buf(),
                message: format!(
                    "unsupported network format version {}, expected {}",
                    self.version,
                    Self::VERSION
                ),
            });
        }
        if &self.actions != actions {
            return Err(Error::ActionSetMismatch {
                stored: self.actions.to_string(),
                configured: actions.to_string(),
            });
        }
        if &self.discretizer != discretizer {
            return Err(Error::DiscretizerMismatch);
        }
        NetworkAgent::new(self.network, self.normalization, self.discretizer, self.actions)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_atomic(self, path.as_ref())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_msgpack(path.as_ref())
    }
}
