//! End-to-end training runs against a small deterministic environment.

mod common;

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use common::GapEnvironment;
use flapq::{
    Action, Observation, QLearningAgent, QLearningParams, Result,
    adapters::{InMemoryRepository, MsgPackRepository},
    export::{write_episode_csv, write_q_table_csv},
    pipeline::{
        EpisodeRecord, LoggingObserver, MetricsObserver, ProgressObserver, Trainer,
        TrainingConfig, TrainingSummary,
    },
    ports::{Environment, Observer, Policy},
};
use tempfile::TempDir;

#[derive(Debug, Default)]
struct Tally {
    started: usize,
    episodes_started: usize,
    steps: usize,
    episodes_ended: usize,
    checkpoints: Vec<usize>,
    finished: usize,
}

/// Counts callbacks into a shared tally readable after the run.
struct TallyObserver(Arc<Mutex<Tally>>);

impl TallyObserver {
    fn tally(&self) -> MutexGuard<'_, Tally> {
        self.0.lock().unwrap()
    }
}

impl Observer for TallyObserver {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        self.tally().started += 1;
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.tally().episodes_started += 1;
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _observation: &Observation,
        _action: Action,
        _reward: f64,
    ) -> Result<()> {
        self.tally().steps += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, _record: &EpisodeRecord) -> Result<()> {
        self.tally().episodes_ended += 1;
        Ok(())
    }

    fn on_checkpoint(&mut self, episode: usize, _path: &Path) -> Result<()> {
        self.tally().checkpoints.push(episode);
        Ok(())
    }

    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        self.tally().finished += 1;
        Ok(())
    }
}

fn exploring_agent(seed: u64) -> QLearningAgent {
    let params = QLearningParams::default().with_exploration(1.0, 0.9, 0.05);
    QLearningAgent::new(params).unwrap().with_seed(seed)
}

#[test]
fn test_observers_see_every_episode_and_step() {
    let repo = InMemoryRepository::new();
    let config = TrainingConfig::default().with_episodes(30).with_max_steps(300);
    let trainer = Trainer::new(config, &repo);

    let tally = Arc::new(Mutex::new(Tally::default()));
    let mut observers: Vec<Box<dyn Observer>> = vec![
        Box::new(TallyObserver(Arc::clone(&tally))),
        Box::new(MetricsObserver::new()),
        Box::new(LoggingObserver::new(10)),
        Box::new(ProgressObserver::new()),
    ];

    let mut agent = exploring_agent(5);
    let summary = trainer
        .run(&mut agent, &mut GapEnvironment::new(), &mut observers)
        .unwrap();

    let tally = tally.lock().unwrap();
    assert_eq!(tally.started, 1);
    assert_eq!(tally.episodes_started, 30);
    assert_eq!(tally.episodes_ended, 30);
    assert_eq!(tally.finished, 1);
    assert_eq!(tally.steps, summary.total_steps);
    assert!(tally.checkpoints.is_empty());

    assert_eq!(summary.episodes, 30);
    assert!(summary.records.iter().all(|r| (1..=300).contains(&r.steps)));
    assert!(summary.q_table_size > 0);
    assert_eq!(summary.q_table_size, agent.q_table().len());
}

#[test]
fn test_epsilon_decays_once_per_episode() {
    let repo = InMemoryRepository::new();
    let trainer = Trainer::new(
        TrainingConfig::default().with_episodes(40).with_max_steps(200),
        &repo,
    );
    let mut agent = exploring_agent(11);
    let summary = trainer
        .run(&mut agent, &mut GapEnvironment::new(), &mut [])
        .unwrap();

    assert!((summary.records[0].epsilon - 0.9).abs() < 1e-12);
    assert!((summary.records[1].epsilon - 0.81).abs() < 1e-12);
    for pair in summary.records.windows(2) {
        assert!(pair[1].epsilon <= pair[0].epsilon);
    }
    assert_eq!(summary.final_epsilon, 0.05);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let repo = InMemoryRepository::new();
    let config = TrainingConfig::default().with_episodes(20).with_max_steps(250);

    let mut first = exploring_agent(21);
    let mut second = exploring_agent(21);
    let a = Trainer::new(config.clone(), &repo)
        .run(&mut first, &mut GapEnvironment::new(), &mut [])
        .unwrap();
    let b = Trainer::new(config, &repo)
        .run(&mut second, &mut GapEnvironment::new(), &mut [])
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(first.q_table(), second.q_table());
}

#[test]
fn test_checkpoints_and_final_table_on_disk() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let checkpoint = dir.path().join("checkpoint.msgpack");
    let final_path = dir.path().join("final.msgpack");
    let repo = MsgPackRepository::new();

    let config = TrainingConfig::default()
        .with_episodes(25)
        .with_max_steps(200)
        .with_checkpoints(10, &checkpoint)
        .with_final_path(&final_path);

    let tally = Arc::new(Mutex::new(Tally::default()));
    let mut observers: Vec<Box<dyn Observer>> = vec![Box::new(TallyObserver(Arc::clone(&tally)))];

    let mut agent = exploring_agent(8);
    Trainer::new(config, &repo).run(&mut agent, &mut GapEnvironment::new(), &mut observers)?;

    assert_eq!(tally.lock().unwrap().checkpoints, vec![10, 20]);
    assert!(checkpoint.exists());

    let mut restored = QLearningAgent::new(QLearningParams::default())?;
    restored.load_q_table(&repo, &final_path)?;
    assert_eq!(restored.q_table(), agent.q_table());

    let mut from_checkpoint = QLearningAgent::new(QLearningParams::default())?;
    from_checkpoint.load_q_table(&repo, &checkpoint)?;
    assert!(from_checkpoint.q_table().len() <= agent.q_table().len());
    Ok(())
}

#[test]
fn test_training_log_and_table_export() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = InMemoryRepository::new();
    let trainer = Trainer::new(
        TrainingConfig::default().with_episodes(12).with_max_steps(150),
        &repo,
    );
    let mut agent = exploring_agent(2);
    let summary = trainer.run(&mut agent, &mut GapEnvironment::new(), &mut [])?;

    let log_path = dir.path().join("training_log.csv");
    write_episode_csv(&log_path, &summary.records)?;
    let mut reader = csv::Reader::from_path(&log_path)?;
    assert_eq!(
        reader.headers()?,
        vec!["episode", "reward", "steps", "epsilon", "q_table_size"]
    );
    let logged: Vec<EpisodeRecord> = reader.deserialize().collect::<csv::Result<_>>()?;
    assert_eq!(logged.len(), 12);
    assert_eq!(logged[11].episode, 12);
    assert_eq!(logged[11].q_table_size, agent.q_table().len());

    let table_path = dir.path().join("q_table.csv");
    write_q_table_csv(&table_path, agent.q_table(), agent.actions())?;
    let mut reader = csv::Reader::from_path(&table_path)?;
    assert_eq!(
        reader.headers()?,
        vec!["x", "y", "v", "gap", "q_noop", "q_flap"]
    );
    assert_eq!(reader.records().count(), agent.q_table().len());
    Ok(())
}

#[test]
fn test_trained_agent_plays_greedily_as_policy() -> anyhow::Result<()> {
    let repo = InMemoryRepository::new();
    let trainer = Trainer::new(
        TrainingConfig::default()
            .with_episodes(50)
            .with_max_steps(300)
            .with_final_path("trained"),
        &repo,
    );
    let mut agent = exploring_agent(13);
    trainer.run(&mut agent, &mut GapEnvironment::new(), &mut [])?;

    // Reopen the trained table with exploration off
    let greedy = QLearningParams::default().with_exploration(0.0, 1.0, 0.0);
    let player = QLearningAgent::open(greedy, &repo, Path::new("trained"))?;
    assert_eq!(player.q_table(), agent.q_table());
    assert_eq!(player.epsilon(), 0.0);

    let mut policy: Box<dyn Policy> = Box::new(player);
    let mut env = GapEnvironment::new();
    env.reset()?;
    let obs = env.observe();
    let first = policy.act(&obs)?;
    for _ in 0..10 {
        assert_eq!(policy.act(&obs)?, first);
    }
    Ok(())
}
