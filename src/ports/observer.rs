//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training loop
//! to specific output formats or metrics.

use std::path::Path;

use crate::{
    Result,
    pipeline::{EpisodeRecord, TrainingSummary},
    types::{Action, Observation},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different kinds of data:
/// - Progress bars for user feedback
/// - Structured log lines
/// - In-memory metrics for tests and exports
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - for every environment step
///    - `on_episode_end(record)`
///    - `on_checkpoint(episode, path)` - when the table was saved
/// 3. `on_training_end(summary)` - once
///
/// # Examples
///
/// ```
/// use flapq::{pipeline::EpisodeRecord, ports::Observer};
///
/// struct BestReward {
///     best: f64,
/// }
///
/// impl Observer for BestReward {
///     fn on_episode_end(&mut self, record: &EpisodeRecord) -> flapq::Result<()> {
///         self.best = self.best.max(record.reward);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (1-based episode number).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each environment step, before the next action is chosen.
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _observation: &Observation,
        _action: Action,
        _reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, after epsilon decay.
    fn on_episode_end(&mut self, _record: &EpisodeRecord) -> Result<()> {
        Ok(())
    }

    /// Called after a periodic checkpoint was written.
    fn on_checkpoint(&mut self, _episode: usize, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        Ok(())
    }
}
