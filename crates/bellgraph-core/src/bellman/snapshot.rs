use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::bellman::{engine::EnginePhase, q_table::QTable};
use crate::graph::{ids::StateId, store::GraphStore};

const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Copy of the Q-table handed to the presentation layer after an iteration.
pub struct QTableSnapshot {
    pub schema_version: u32,
    pub iteration: usize,
    pub phase: EnginePhase,
    pub gamma: f64,
    pub rows: Vec<QRowSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QRowSnapshot {
    pub state_id: StateId,
    pub label: String,
    pub values: BTreeMap<String, f64>,
    pub max_value: Option<f64>,
    pub best_action: Option<String>,
}

impl QTableSnapshot {
    pub(crate) fn capture(
        graph: &GraphStore,
        table: &QTable,
        iteration: usize,
        phase: EnginePhase,
        gamma: f64,
    ) -> Self {
        let rows = table
            .rows()
            .map(|(state_id, values)| {
                let label = graph
                    .state(state_id)
                    .map(|state| state.label().to_string())
                    .unwrap_or_else(|| state_id.label());
                let best = table.best_action(state_id);
                QRowSnapshot {
                    state_id,
                    label,
                    values: values.clone(),
                    max_value: best.map(|(_, value)| value),
                    best_action: best.map(|(action, _)| action.to_string()),
                }
            })
            .collect();

        QTableSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            iteration,
            phase,
            gamma,
            rows,
        }
    }

    pub fn row(&self, label: &str) -> Option<&QRowSnapshot> {
        self.rows.iter().find(|row| row.label == label)
    }

    /// Q-value for a state label and action, if the table has that entry.
    pub fn value(&self, label: &str, action: &str) -> Option<f64> {
        self.row(label)?.values.get(action).copied()
    }

    /// Every action label present in any row, sorted. These are the table columns.
    pub fn actions(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.values.keys().map(String::as_str))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
