//! Serialization support for Q-tables.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    q_learning::{
        agent::QLearningAgent,
        discretizer::{DiscreteState, Discretizer},
        q_table::QTable,
    },
    types::ActionSet,
};

/// Persisted form of a Q-table
///
/// Stores the plain state → values mapping together with the action set and
/// discretizer it was trained with, so it cannot be silently reused under a
/// different key space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub actions: ActionSet,
    pub discretizer: Discretizer,
    pub entries: HashMap<DiscreteState, Vec<f64>>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent) -> Self {
        Self::from_q_table(agent.q_table(), agent.actions(), agent.discretizer())
    }

    pub fn from_q_table(q_table: &QTable, actions: &ActionSet, discretizer: &Discretizer) -> Self {
        Self {
            version: Self::VERSION,
            actions: actions.clone(),
            discretizer: discretizer.clone(),
            entries: q_table.entries().clone(),
        }
    }

    /// Validate against the expected configuration and rebuild a lazily
    /// defaulting [`QTable`].
    ///
    /// `path` is only used for error reporting.
    pub fn into_q_table(
        self,
        actions: &ActionSet,
        discretizer: &Discretizer,
        path: &Path,
    ) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(Error::StorageCorrupt {
                path: path.to_path_buf(),
                message: format!(
                    "unsupported Q-table format version {}, expected {}",
                    self.version,
                    Self::VERSION
                ),
            });
        }

        if let Some((state, values)) = self
            .entries
            .iter()
            .find(|(_, values)| values.len() != self.actions.len())
        {
            return Err(Error::StorageCorrupt {
                path: path.to_path_buf(),
                message: format!(
                    "state {state} has {} values, expected {}",
                    values.len(),
                    self.actions.len()
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

        Ok(QTable::from_entries(actions.len(), self.entries))
    }
}
