//! Observer implementations for training runs
//!
//! Observers allow composable data collection during training without
//! coupling the training loop to specific output formats.

use std::{collections::VecDeque, path::Path};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{
    Result,
    pipeline::training::{EpisodeRecord, TrainingSummary},
    ports::Observer,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(record.episode as u64);
            pb.set_message(format!(
                "reward {:.1}, ε {:.3}, states {}",
                record.reward, record.epsilon, record.q_table_size
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self, summary: &TrainingSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "mean reward {:.2}, states {}",
                summary.mean_reward, summary.q_table_size
            ));
        }
        Ok(())
    }
}

/// Logs the rolling average reward every `window` episodes
pub struct LoggingObserver {
    window: usize,
    recent: VecDeque<f64>,
    total_episodes: usize,
}

impl LoggingObserver {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            recent: VecDeque::with_capacity(window),
            total_episodes: 0,
        }
    }

    /// Average reward over the last `window` episodes
    pub fn rolling_average(&self) -> f64 {
        if self.recent.is_empty() {
            0.0
        } else {
            self.recent.iter().sum::<f64>() / self.recent.len() as f64
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Observer for LoggingObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.total_episodes = total_episodes;
        self.recent.clear();
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(record.reward);

        if record.episode.is_multiple_of(self.window) {
            info!(
                episode = record.episode,
                total = self.total_episodes,
                avg_reward = self.rolling_average(),
                epsilon = record.epsilon,
                states = record.q_table_size,
                "Training progress"
            );
        }
        Ok(())
    }

    fn on_checkpoint(&mut self, episode: usize, path: &Path) -> Result<()> {
        info!(episode, path = %path.display(), "Checkpoint saved");
        Ok(())
    }
}

/// Metrics observer - Keeps every episode record in memory
#[derive(Default)]
pub struct MetricsObserver {
    records: Vec<EpisodeRecord>,
    checkpoints: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    /// Episodes after which a checkpoint was written
    pub fn checkpoints(&self) -> &[usize] {
        &self.checkpoints
    }

    /// Average reward over all recorded episodes
    pub fn mean_reward(&self) -> f64 {
        if self.records.is_empty() {
            0.0
        } else {
            self.records.iter().map(|r| r.reward).sum::<f64>() / self.records.len() as f64
        }
    }

    /// Average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.records.is_empty() {
            0.0
        } else {
            self.records.iter().map(|r| r.steps).sum::<usize>() as f64 / self.records.len() as f64
        }
    }
}

impl Observer for MetricsObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.records = Vec::with_capacity(total_episodes);
        self.checkpoints.clear();
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn on_checkpoint(&mut self, episode: usize, _path: &Path) -> Result<()> {
        self.checkpoints.push(episode);
        Ok(())
    }
}
