//! Q-table implementation for tabular Q-learning

use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    q_learning::discretizer::DiscreteState,
};

/// Q-table mapping discrete states to one value per action
///
/// Absent states behave as all-zero vectors. Reading an absent state through
/// [`QTable::values_mut`] inserts that zero vector, so the table only grows.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    /// Q-values: discrete_state -> [Q(s, a_0), Q(s, a_1), ...]
    q_values: HashMap<DiscreteState, Vec<f64>>,
    /// Length of every value vector
    action_count: usize,
}

impl QTable {
    /// Create an empty Q-table for `action_count` actions
    pub fn new(action_count: usize) -> Self {
        Self {
            q_values: HashMap::new(),
            action_count,
        }
    }

    /// Wrap an already validated plain mapping.
    pub(crate) fn from_entries(
        action_count: usize,
        q_values: HashMap<DiscreteState, Vec<f64>>,
    ) -> Self {
        debug_assert!(q_values.values().all(|v| v.len() == action_count));
        Self {
            q_values,
            action_count,
        }
    }

    /// Get-or-insert the value vector for a state
    pub fn values_mut(&mut self, state: DiscreteState) -> &mut [f64] {
        let action_count = self.action_count;
        self.q_values
            .entry(state)
            .or_insert_with(|| vec![0.0; action_count])
    }

    /// Value vector for a state without inserting
    pub fn get(&self, state: &DiscreteState) -> Option<&[f64]> {
        self.q_values.get(state).map(Vec::as_slice)
    }

    /// Q-value for a state-action pair, zero when the state is unseen
    pub fn value(&self, state: &DiscreteState, action_index: usize) -> f64 {
        self.get(state)
            .and_then(|values| values.get(action_index).copied())
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: DiscreteState, action_index: usize, value: f64) -> Result<()> {
        if action_index >= self.action_count {
            return Err(Error::InvalidActionIndex {
                index: action_index,
                action_count: self.action_count,
            });
        }
        self.values_mut(state)[action_index] = value;
        Ok(())
    }

    /// Maximum Q-value in a state (get-or-insert)
    pub fn max_q(&mut self, state: DiscreteState) -> f64 {
        self.values_mut(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the highest Q-value in a state (get-or-insert), lowest index on ties
    pub fn greedy_index(&mut self, state: DiscreteState) -> usize {
        argmax_first(self.values_mut(state))
    }

    /// Reset all Q-values (fresh training run)
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Number of states stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Entries sorted by state
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&DiscreteState, &[f64])> {
        let mut entries: Vec<_> = self
            .q_values
            .iter()
            .map(|(state, values)| (state, values.as_slice()))
            .collect();
        entries.sort_unstable_by_key(|(state, _)| **state);
        entries.into_iter()
    }

    /// Plain mapping, as persisted
    pub fn entries(&self) -> &HashMap<DiscreteState, Vec<f64>> {
        &self.q_values
    }
}

/// Index of the first maximum; NaN entries never win.
pub fn argmax_first(values: &[f64]) -> usize {
    let mut best_index = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (index, &value) in values.iter().enumerate() {
        if value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    best_index
}
