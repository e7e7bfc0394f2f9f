//! CSV export of training logs and Q-tables
//!
//! The training log is one row per episode; the Q-table dump is one row per
//! discrete state and is the dataset used to fit a network offline.

mod episode_csv;

pub use episode_csv::{write_episode_csv, write_q_table_csv};
