//! Tabular Q-learning
//!
//! Continuous observations are bucketed into [`DiscreteState`] keys, each key
//! owns one Q-value per action, and an ε-greedy policy picks actions while
//! the one-step Q-learning rule updates the table:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! Terminal transitions use `r` as the target without bootstrapping.
//!
//! ## Usage Example
//!
//! ```
//! use flapq::q_learning::{QLearningAgent, QLearningParams};
//! use flapq::types::Observation;
//!
//! let params = QLearningParams::default()
//!     .with_learning_rate(0.2)
//!     .with_discount_factor(0.95)
//!     .with_exploration(1.0, 0.999762, 0.05);
//! let mut agent = QLearningAgent::new(params)?.with_seed(42);
//!
//! let state = Observation::new(250.0, -4.0, 120.0, 180.0, 280.0);
//! let action = agent.act(&state);
//! let next_state = Observation::new(244.0, -3.0, 116.0, 180.0, 280.0);
//! agent.update(&state, action, 1.0, &next_state, false)?;
//! agent.decay_epsilon();
//! # assert!(agent.q_table().len() >= 1);
//! # Ok::<(), flapq::Error>(())
//! ```

pub mod agent;
pub mod discretizer;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{QLearningAgent, QLearningParams};
pub use discretizer::{BinEdges, DiscreteState, Discretizer};
pub use q_table::QTable;
pub use serialization::SavedQTable;
