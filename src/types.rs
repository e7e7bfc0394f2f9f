//! Domain types shared by the agents: actions, action sets and observations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A legal game action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Let gravity act for one step.
    Noop,
    /// Flap upwards.
    Flap,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Noop => write!(f, "noop"),
            Action::Flap => write!(f, "flap"),
        }
    }
}

/// Ordered, immutable set of legal actions.
///
/// The position of an action in the set is its index in every Q-value
/// vector, so the ordering is fixed for the lifetime of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Action>", into = "Vec<Action>")]
pub struct ActionSet(Vec<Action>);

impl ActionSet {
    /// Create an action set, rejecting empty or duplicated sequences.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `actions` is empty or
    /// contains the same action twice.
    pub fn new(actions: Vec<Action>) -> Result<Self> {
        if actions.is_empty() {
            return Err(Error::invalid_config("action set must not be empty"));
        }
        for (i, action) in actions.iter().enumerate() {
            if actions[..i].contains(action) {
                return Err(Error::invalid_config(format!(
                    "action {action} appears more than once in the action set"
                )));
            }
        }
        Ok(Self(actions))
    }

    /// Index of `action` within the set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if the action is not in the set.
    pub fn index_of(&self, action: Action) -> Result<usize> {
        self.0
            .iter()
            .position(|&candidate| candidate == action)
            .ok_or(Error::InvalidAction { action })
    }

    /// Action at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidActionIndex`] if `index` is out of range.
    pub fn get(&self, index: usize) -> Result<Action> {
        self.0
            .get(index)
            .copied()
            .ok_or(Error::InvalidActionIndex {
                index,
                action_count: self.0.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed set; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        Self(vec![Action::Noop, Action::Flap])
    }
}

impl TryFrom<Vec<Action>> for ActionSet {
    type Error = Error;

    fn try_from(actions: Vec<Action>) -> Result<Self> {
        Self::new(actions)
    }
}

impl From<ActionSet> for Vec<Action> {
    fn from(set: ActionSet) -> Self {
        set.0
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, action) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{action}")?;
        }
        write!(f, "]")
    }
}

/// Continuous game state observed at one simulation step.
///
/// Field names follow the keys of the game's state dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    /// Vertical position of the player
    pub player_y: f64,
    /// Vertical velocity of the player
    pub player_vel: f64,
    /// Horizontal distance from the player to the next obstacle
    pub next_pipe_dist_to_player: f64,
    /// Top extent of the next obstacle's gap
    pub next_pipe_top_y: f64,
    /// Bottom extent of the next obstacle's gap
    pub next_pipe_bottom_y: f64,
}

impl Observation {
    pub fn new(
        player_y: f64,
        player_vel: f64,
        next_pipe_dist_to_player: f64,
        next_pipe_top_y: f64,
        next_pipe_bottom_y: f64,
    ) -> Self {
        Self {
            player_y,
            player_vel,
            next_pipe_dist_to_player,
            next_pipe_top_y,
            next_pipe_bottom_y,
        }
    }

    /// Player position minus the midpoint of the gap extents.
    pub fn vertical_offset(&self) -> f64 {
        let gap_center = (self.next_pipe_top_y + self.next_pipe_bottom_y) / 2.0;
        self.player_y - gap_center
    }

    /// Bottom extent minus top extent of the gap.
    pub fn gap_size(&self) -> f64 {
        self.next_pipe_bottom_y - self.next_pipe_top_y
    }
}
