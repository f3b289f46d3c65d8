use serde::Serialize;

use crate::geometry::point::Point;
use crate::graph::ids::{StateId, TransitionId};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A state drawn on the canvas.
/// The position is only a layout hint, the engine never reads it.
pub struct StateNode {
    id: StateId,
    label: String,
    position: Point,
}

impl StateNode {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One directed, labeled edge `(from, to, action, reward, probability)`.
/// `probability` is `P(to | from, action)`.
pub struct Transition {
    id: TransitionId,
    from: StateId,
    to: StateId,
    action: String,
    reward: f64,
    probability: f64,
}

impl Transition {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Whether this transition starts and ends in the same state.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, PartialEq)]
/// All transitions sharing one `(state, action)` pair and their probability mass.
pub struct ProbabilityGroup {
    pub state: StateId,
    pub action: String,
    pub sum: f64,
    pub transitions: Vec<TransitionId>,
}

#[derive(Debug, Clone, Default)]
/// Owns every state and transition of the MDP being authored.
/// Append-only: nothing is removed or edited in place.
pub struct GraphStore {
    states: Vec<StateNode>,
    transitions: Vec<Transition>,
    revision: u64,
    transition_revision: u64,
}

impl GraphStore {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state at `position` and return its sequential id.
    pub fn add_state(&mut self, position: Point) -> StateId {
        let id = StateId::from(self.states.len());
        self.states.push(StateNode {
            id,
            label: id.label(),
            position,
        });
        self.revision += 1;
        id
    }

    /// Append a transition. No validation happens here, the caller owns
    /// probability ranges and action consistency.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        reward: f64,
        action: impl Into<String>,
        probability: f64,
    ) -> TransitionId {
        let id = TransitionId::from(self.transitions.len());
        self.transitions.push(Transition {
            id,
            from,
            to,
            action: action.into(),
            reward,
            probability,
        });
        self.revision += 1;
        self.transition_revision += 1;
        id
    }

    /// Counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Counter bumped only when a transition is added. Adding a state leaves it alone.
    pub fn transition_revision(&self) -> u64 {
        self.transition_revision
    }

    pub fn state(&self, id: StateId) -> Option<&StateNode> {
        self.states.get(id.index())
    }

    pub fn state_by_label(&self, label: &str) -> Option<&StateNode> {
        self.states.iter().find(|state| state.label == label)
    }

    pub fn contains_state(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id.index())
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// All transitions leaving `state`, in insertion order.
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(move |t| t.from == state)
    }

    /// Transitions leaving `state` under `action`: the stochastic outcomes of one decision.
    pub fn transitions_by_action<'a>(
        &'a self,
        state: StateId,
        action: &'a str,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions_from(state).filter(move |t| t.action == action)
    }

    /// Distinct actions leaving `state`, in first-seen order.
    pub fn actions_of(&self, state: StateId) -> Vec<&str> {
        let mut actions: Vec<&str> = Vec::new();
        for transition in self.transitions_from(state) {
            if !actions.contains(&transition.action()) {
                actions.push(transition.action());
            }
        }
        actions
    }

    /// Whether `state` has no outgoing transitions.
    pub fn is_terminal(&self, state: StateId) -> bool {
        self.transitions_from(state).next().is_none()
    }

    /// Probability mass of every `(state, action)` group, in state then action order.
    pub fn probability_groups(&self) -> Vec<ProbabilityGroup> {
        let mut groups = Vec::new();
        for state in &self.states {
            for action in self.actions_of(state.id) {
                let mut sum = 0.0_f64;
                let mut transitions = Vec::new();
                for transition in self.transitions_by_action(state.id, action) {
                    sum += transition.probability;
                    transitions.push(transition.id);
                }
                groups.push(ProbabilityGroup {
                    state: state.id,
                    action: action.to_string(),
                    sum,
                    transitions,
                });
            }
        }
        groups
    }

    /// Sum of probabilities for `(state, action)`, `0.0` when the pair has no transitions.
    pub fn probability_sum(&self, state: StateId, action: &str) -> f64 {
        self.transitions_by_action(state, action)
            .map(Transition::probability)
            .sum()
    }
}
