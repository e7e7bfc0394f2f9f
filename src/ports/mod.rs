//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and its
//! collaborators. The core owns these traits; the game, storage backends and
//! training observers implement them.

pub mod environment;
pub mod observer;
pub mod policy;
pub mod repository;

pub use environment::{Environment, StepOutcome};
pub use observer::Observer;
pub use policy::Policy;
pub use repository::QTableRepository;
