//! Training pipeline
//!
//! This module provides:
//! - The episode loop driving a [`crate::q_learning::QLearningAgent`]
//!   against an [`crate::ports::Environment`]
//! - Periodic and final Q-table checkpoints
//! - Observers for progress bars, log lines and in-memory metrics

pub mod observers;
pub mod training;

pub use observers::{LoggingObserver, MetricsObserver, ProgressObserver};
pub use training::{EpisodeRecord, Trainer, TrainingConfig, TrainingSummary};

pub use crate::ports::{Environment, Observer};
