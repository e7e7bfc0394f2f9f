//! Configuration types for agent creation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, q_learning::QLearningParams};

/// Which [`crate::ports::Policy`] implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Q-table lookup with ε-greedy exploration
    #[default]
    Tabular,
    /// Pre-trained dense network
    Network,
}

/// Configuration for creating an agent.
///
/// # Examples
///
/// ```
/// use flapq::app::{AgentConfig, AgentKind};
///
/// let config = AgentConfig::new(AgentKind::Tabular)
///     .with_seed(42)
///     .with_q_table_path("flappy_q_table.msgpack");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent variant
    pub kind: AgentKind,
    /// Learning hyperparameters, action set and discretizer
    pub params: QLearningParams,
    /// Previously persisted Q-table to restore (tabular only)
    pub q_table_path: Option<PathBuf>,
    /// Saved network bundle (network only)
    pub network_path: Option<PathBuf>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration for `kind` with default parameters.
    pub fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            params: QLearningParams::default(),
            q_table_path: None,
            network_path: None,
            seed: None,
        }
    }

    pub fn with_params(mut self, params: QLearningParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_q_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.q_table_path = Some(path.into());
        self
    }

    pub fn with_network_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.network_path = Some(path.into());
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.kind == AgentKind::Network && self.network_path.is_none() {
            return Err(Error::invalid_config("network agent requires network_path"));
        }
        Ok(())
    }

    /// Read a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| Error::Io {
            operation: format!("write config {path:?}"),
            source,
        })
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(AgentKind::default())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"kind":"tabular","params":{"learning_rate":0.5}}"#).unwrap();
        assert_eq!(config.params.learning_rate, 0.5);
        assert_eq!(config.params.discount_factor, 0.95);
        assert_eq!(config.params.min_epsilon, 0.05);
        assert!(config.q_table_path.is_none());
    }

    #[test]
    fn test_network_requires_path() {
        assert!(AgentConfig::new(AgentKind::Network).validate().is_err());
        assert!(
            AgentConfig::new(AgentKind::Network)
                .with_network_path("net.msgpack")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_json_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("agent.json");
        let config = AgentConfig::new(AgentKind::Tabular)
            .with_seed(9)
            .with_q_table_path("table.msgpack");

        config.to_json_file(&path).unwrap();
        assert_eq!(AgentConfig::from_json_file(&path).unwrap(), config);
    }
}
