//! Tabular Q-learning for a side-scrolling obstacle-avoidance game
//!
//! This crate provides:
//! - A state discretizer mapping continuous game observations to bucket tuples
//! - A lazily defaulting Q-table with crash-safe MessagePack persistence
//! - An ε-greedy Q-learning agent with per-episode exploration decay
//! - A network-backed policy sharing the same discretizer
//! - A training loop with checkpoints, observers and CSV export

pub mod adapters;
pub mod app;
pub mod error;
pub mod export;
pub mod network;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{DiscreteState, Discretizer, QLearningAgent, QLearningParams, QTable};
pub use types::{Action, ActionSet, Observation};
