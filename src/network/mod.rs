//! Network-backed policy
//!
//! A pre-trained dense network approximates the Q-table. It consumes the
//! same discrete state tuple as the tabular agent (normalised bucket
//! indices) and picks the action with the highest predicted value. Training
//! the network happens outside this crate; only inference lives here.

pub mod agent;
pub mod dense;

pub use agent::{NetworkAgent, Normalization, SavedNetwork};
pub use dense::{Activation, DenseLayer, DenseNetwork};
