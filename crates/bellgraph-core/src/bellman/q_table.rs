use std::collections::BTreeMap;

use crate::graph::{ids::StateId, store::GraphStore};

/// Q-values per state and action label.
/// Rows iterate in state creation order, actions in label order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: BTreeMap<StateId, BTreeMap<String, f64>>,
}

impl QTable {
    /// Create an empty table with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the all-zero table for `graph`: one row per state, one zero entry
    /// per distinct outgoing action.
    pub fn initialized(graph: &GraphStore) -> Self {
        let mut table = QTable::new();
        for state in graph.states() {
            table.ensure_row(graph, state.id());
        }
        table
    }

    /// Create the zero row for `state` if it has none yet.
    pub fn ensure_row(&mut self, graph: &GraphStore, state: StateId) {
        self.rows.entry(state).or_insert_with(|| {
            graph
                .actions_of(state)
                .into_iter()
                .map(|action| (action.to_string(), 0.0))
                .collect()
        });
    }

    pub fn get(&self, state: StateId, action: &str) -> Option<f64> {
        self.rows.get(&state)?.get(action).copied()
    }

    /// Write one entry, creating the row if needed.
    pub fn set(&mut self, state: StateId, action: impl Into<String>, value: f64) {
        self.rows
            .entry(state)
            .or_default()
            .insert(action.into(), value);
    }

    pub fn row(&self, state: StateId) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(&state)
    }

    pub fn rows(&self) -> impl Iterator<Item = (StateId, &BTreeMap<String, f64>)> + '_ {
        self.rows.iter().map(|(state, row)| (*state, row))
    }

    /// Number of `(state, action)` entries.
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `max(0, max_a Q[state][a])`. A state without a row or without actions
    /// counts as an absorbing state worth 0.
    pub fn max_next_q(&self, state: StateId) -> f64 {
        self.rows
            .get(&state)
            .map(|row| row.values().copied().fold(0.0, f64::max))
            .unwrap_or(0.0)
    }

    /// Highest Q-value of `state` without the zero floor.
    pub fn state_value(&self, state: StateId) -> Option<f64> {
        self.best_action(state).map(|(_, value)| value)
    }

    /// Greedy action for `state`. Ties go to the first action label in order.
    pub fn best_action(&self, state: StateId) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (action, value) in self.rows.get(&state)? {
            best = match best {
                Some((_, best_value)) if best_value >= *value => best,
                _ => Some((action.as_str(), *value)),
            };
        }
        best
    }

    /// Largest absolute change between two tables. Entries missing on one side count as 0.
    pub fn max_delta(&self, other: &QTable) -> f64 {
        let mut delta = 0.0_f64;
        for (state, row) in &self.rows {
            for (action, value) in row {
                let previous = other.get(*state, action).unwrap_or(0.0);
                delta = delta.max((value - previous).abs());
            }
        }
        for (state, row) in &other.rows {
            for (action, value) in row {
                if self.get(*state, action).is_none() {
                    delta = delta.max(value.abs());
                }
            }
        }
        delta
    }
}
