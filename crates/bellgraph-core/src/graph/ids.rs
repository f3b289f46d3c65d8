use serde::{Deserialize, Serialize};

/// Dense index of a state in the graph store.
/// Indices follow creation order and are never reused.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    /// Return the creation-order index of this state.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Return the display label assigned to this state (`S1`, `S2`, ...).
    pub fn label(&self) -> String {
        format!("S{}", self.0 + 1)
    }
}

impl From<usize> for StateId {
    fn from(value: usize) -> Self {
        StateId(value)
    }
}

/// Dense index of a transition in insertion order.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TransitionId(usize);

impl TransitionId {
    /// Return the insertion-order index of this transition.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for TransitionId {
    fn from(value: usize) -> Self {
        TransitionId(value)
    }
}
