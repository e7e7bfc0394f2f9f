//! Application layer with dependency injection container.
//!
//! The container owns the Q-table repository and turns an [`AgentConfig`]
//! into a ready-to-use agent. The agent variant is picked from
//! [`AgentKind`] in configuration, never by inspecting types at runtime.
//!
//! # Usage
//!
//! ```
//! use flapq::app::{App, AgentConfig, AgentKind};
//! use flapq::types::Observation;
//!
//! let app = App::new();
//! let mut policy = app.create_policy(&AgentConfig::new(AgentKind::Tabular).with_seed(42))?;
//! let _action = policy.act(&Observation::default())?;
//! # Ok::<(), flapq::Error>(())
//! ```
//!
//! ## Testing
//!
//! ```
//! use flapq::app::App;
//! use flapq::adapters::InMemoryRepository;
//!
//! let app = App::for_testing()
//!     .with_repository(InMemoryRepository::new())
//!     .with_default_seed(42)
//!     .build();
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, AgentKind};
pub use container::{App, AppBuilder};
