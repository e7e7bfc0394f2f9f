//! Dependency injection container.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for building agents from configuration.

use std::{path::Path, sync::Arc};

use super::config::{AgentConfig, AgentKind};
use crate::{
    Result,
    adapters::MsgPackRepository,
    error::Error,
    network::NetworkAgent,
    pipeline::{Trainer, TrainingConfig},
    ports::{Policy, QTableRepository},
    q_learning::QLearningAgent,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ```
/// use flapq::app::{App, AgentConfig};
///
/// let app = App::new();
/// let agent = app.create_q_agent(&AgentConfig::default().with_seed(42))?;
/// assert!(agent.q_table().is_empty());
/// # Ok::<(), flapq::Error>(())
/// ```
pub struct App {
    /// Repository for Q-table persistence
    repository: Arc<dyn QTableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses `MsgPackRepository` and no default seed.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the Q-table repository.
    pub fn repository(&self) -> Arc<dyn QTableRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Build a tabular agent, restoring `q_table_path` when configured.
    ///
    /// A configured path with nothing stored yet yields an empty table; a
    /// damaged table is an error.
    pub fn create_q_agent(&self, config: &AgentConfig) -> Result<QLearningAgent> {
        config.validate()?;
        let agent = match &config.q_table_path {
            Some(path) => {
                QLearningAgent::open(config.params.clone(), self.repository.as_ref(), path)?
            }
            None => QLearningAgent::new(config.params.clone())?,
        };

        // Config seed overrides the container default
        Ok(match config.seed.or(self.default_seed) {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    /// Build the configured policy variant.
    pub fn create_policy(&self, config: &AgentConfig) -> Result<Box<dyn Policy>> {
        match config.kind {
            AgentKind::Tabular => Ok(Box::new(self.create_q_agent(config)?)),
            AgentKind::Network => {
                config.validate()?;
                let path = config
                    .network_path
                    .as_deref()
                    .ok_or_else(|| Error::invalid_config("network agent requires network_path"))?;
                Ok(Box::new(NetworkAgent::load(
                    path,
                    &config.params.discretizer,
                    &config.params.actions,
                )?))
            }
        }
    }

    /// Save a tabular agent's Q-table.
    pub fn save_q_agent(&self, agent: &QLearningAgent, path: &Path) -> Result<()> {
        agent.save_q_table(self.repository.as_ref(), path)
    }

    /// Trainer wired to this app's repository.
    pub fn trainer(&self, config: TrainingConfig) -> Trainer<'_> {
        Trainer::new(config, self.repository.as_ref())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// # Examples
///
/// ```
/// use flapq::app::AppBuilder;
/// use flapq::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct AppBuilder {
    repository: Option<Arc<dyn QTableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom Q-table repository.
    pub fn with_repository<R: QTableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all agents created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app; defaults to `MsgPackRepository`.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
