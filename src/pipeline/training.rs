//! Episode-driven training loop for the Q-learning agent

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    ports::{Environment, Observer, QTableRepository},
    q_learning::QLearningAgent,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Step cap per episode
    pub max_steps_per_episode: usize,

    /// Save a checkpoint every this many episodes (0 disables)
    pub checkpoint_every: usize,

    /// Where periodic checkpoints are written
    pub checkpoint_path: Option<PathBuf>,

    /// Where the final table is written
    pub final_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 15_000,
            max_steps_per_episode: 20_000,
            checkpoint_every: 100,
            checkpoint_path: None,
            final_path: None,
        }
    }
}

impl TrainingConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_steps(mut self, max_steps_per_episode: usize) -> Self {
        self.max_steps_per_episode = max_steps_per_episode;
        self
    }

    pub fn with_checkpoints(mut self, every: usize, path: impl Into<PathBuf>) -> Self {
        self.checkpoint_every = every;
        self.checkpoint_path = Some(path.into());
        self
    }

    pub fn with_final_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.final_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_steps_per_episode == 0 {
            return Err(Error::invalid_config(
                "max_steps_per_episode must be positive",
            ));
        }
        Ok(())
    }
}

/// One row of the training log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// 1-based episode number
    pub episode: usize,
    /// Sum of step rewards
    pub reward: f64,
    /// Steps taken
    pub steps: usize,
    /// Exploration rate after the end-of-episode decay
    pub epsilon: f64,
    /// States in the Q-table at episode end
    pub q_table_size: usize,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub total_steps: usize,
    pub mean_reward: f64,
    pub best_reward: f64,
    pub final_epsilon: f64,
    pub q_table_size: usize,
    pub records: Vec<EpisodeRecord>,
}

impl TrainingSummary {
    fn from_records(records: Vec<EpisodeRecord>, final_epsilon: f64, q_table_size: usize) -> Self {
        let total_steps = records.iter().map(|r| r.steps).sum();
        let mean_reward = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.reward).sum::<f64>() / records.len() as f64
        };
        let best_reward = records
            .iter()
            .map(|r| r.reward)
            .fold(f64::NEG_INFINITY, f64::max);
        Self {
            episodes: records.len(),
            total_steps,
            mean_reward,
            best_reward: if records.is_empty() { 0.0 } else { best_reward },
            final_epsilon,
            q_table_size,
            records,
        }
    }
}

/// Drives act → step → update over episodes
pub struct Trainer<'a> {
    config: TrainingConfig,
    repository: &'a dyn QTableRepository,
}

impl<'a> Trainer<'a> {
    pub fn new(config: TrainingConfig, repository: &'a dyn QTableRepository) -> Self {
        Self { config, repository }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run the configured number of episodes.
    ///
    /// Epsilon decays once per finished episode. Checkpoints are written
    /// every `checkpoint_every` episodes when a checkpoint path is set, and
    /// the final table is written when a final path is set.
    pub fn run<E: Environment + ?Sized>(
        &self,
        agent: &mut QLearningAgent,
        env: &mut E,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<TrainingSummary> {
        self.config.validate()?;
        info!(
            episodes = self.config.episodes,
            max_steps = self.config.max_steps_per_episode,
            epsilon = agent.epsilon(),
            "Training started"
        );

        for observer in observers.iter_mut() {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut records = Vec::with_capacity(self.config.episodes);
        for episode in 1..=self.config.episodes {
            let record = self.run_episode(episode, agent, env, observers)?;
            for observer in observers.iter_mut() {
                observer.on_episode_end(&record)?;
            }
            records.push(record);

            if let Some(path) = self.checkpoint_due(episode) {
                agent.save_q_table(self.repository, path)?;
                debug!(episode, path = %path.display(), "Checkpoint written");
                for observer in observers.iter_mut() {
                    observer.on_checkpoint(episode, path)?;
                }
            }
        }

        if let Some(path) = &self.config.final_path {
            agent.save_q_table(self.repository, path)?;
        }

        let summary =
            TrainingSummary::from_records(records, agent.epsilon(), agent.q_table().len());
        info!(
            episodes = summary.episodes,
            total_steps = summary.total_steps,
            mean_reward = summary.mean_reward,
            best_reward = summary.best_reward,
            states = summary.q_table_size,
            "Training finished"
        );

        for observer in observers.iter_mut() {
            observer.on_training_end(&summary)?;
        }
        Ok(summary)
    }

    fn run_episode<E: Environment + ?Sized>(
        &self,
        episode: usize,
        agent: &mut QLearningAgent,
        env: &mut E,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<EpisodeRecord> {
        for observer in observers.iter_mut() {
            observer.on_episode_start(episode)?;
        }

        env.reset()?;
        let mut state = env.observe();
        let mut total_reward = 0.0;
        let mut steps = 0;

        while steps < self.config.max_steps_per_episode {
            let action = agent.act(&state);
            let outcome = env.step(action)?;
            let next_state = env.observe();

            agent.update(&state, action, outcome.reward, &next_state, outcome.done)?;
            for observer in observers.iter_mut() {
                observer.on_step(episode, steps, &state, action, outcome.reward)?;
            }

            state = next_state;
            total_reward += outcome.reward;
            steps += 1;

            if outcome.done {
                break;
            }
        }

        agent.decay_epsilon();

        Ok(EpisodeRecord {
            episode,
            reward: total_reward,
            steps,
            epsilon: agent.epsilon(),
            q_table_size: agent.q_table().len(),
        })
    }

    fn checkpoint_due(&self, episode: usize) -> Option<&Path> {
        let every = self.config.checkpoint_every;
        if every == 0 || !episode.is_multiple_of(every) {
            return None;
        }
        self.config.checkpoint_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::InMemoryRepository,
        ports::StepOutcome,
        q_learning::QLearningParams,
        types::{Action, Observation},
    };

    /// Ends after `length` steps, rewarding every step with 1.
    struct FixedLength {
        length: usize,
        t: usize,
    }

    impl Environment for FixedLength {
        fn reset(&mut self) -> Result<()> {
            self.t = 0;
            Ok(())
        }

        fn observe(&self) -> Observation {
            Observation::new(0.0, 0.0, self.t as f64 * 20.0, -50.0, 50.0)
        }

        fn step(&mut self, _action: Action) -> Result<StepOutcome> {
            self.t += 1;
            Ok(StepOutcome::new(1.0, self.t >= self.length))
        }
    }

    fn agent() -> QLearningAgent {
        let params = QLearningParams::default().with_exploration(1.0, 0.5, 0.1);
        QLearningAgent::new(params).unwrap().with_seed(1)
    }

    #[test]
    fn test_episode_records_and_decay() {
        let repo = InMemoryRepository::new();
        let trainer = Trainer::new(TrainingConfig::default().with_episodes(3), &repo);
        let mut agent = agent();
        let mut env = FixedLength { length: 4, t: 0 };

        let summary = trainer.run(&mut agent, &mut env, &mut []).unwrap();

        assert_eq!(summary.episodes, 3);
        assert_eq!(summary.total_steps, 12);
        assert_eq!(summary.mean_reward, 4.0);
        let epsilons: Vec<f64> = summary.records.iter().map(|r| r.epsilon).collect();
        assert_eq!(epsilons, vec![0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_step_cap_ends_episode() {
        let repo = InMemoryRepository::new();
        let config = TrainingConfig::default().with_episodes(1).with_max_steps(5);
        let trainer = Trainer::new(config, &repo);
        let mut env = FixedLength { length: 100, t: 0 };

        let summary = trainer.run(&mut agent(), &mut env, &mut []).unwrap();
        assert_eq!(summary.records[0].steps, 5);
    }

    #[test]
    fn test_checkpoints_and_final_save() {
        let repo = InMemoryRepository::new();
        let config = TrainingConfig::default()
            .with_episodes(4)
            .with_checkpoints(2, "checkpoint")
            .with_final_path("final");
        let trainer = Trainer::new(config, &repo);
        let mut env = FixedLength { length: 3, t: 0 };

        trainer.run(&mut agent(), &mut env, &mut []).unwrap();
        assert!(repo.contains(Path::new("checkpoint")));
        assert!(repo.contains(Path::new("final")));
    }

    #[test]
    fn test_zero_step_cap_rejected() {
        let repo = InMemoryRepository::new();
        let trainer = Trainer::new(TrainingConfig::default().with_max_steps(0), &repo);
        let mut env = FixedLength { length: 3, t: 0 };
        assert!(trainer.run(&mut agent(), &mut env, &mut []).is_err());
    }
}
