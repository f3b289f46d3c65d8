use serde::Serialize;

use crate::graph::{
    ids::{StateId, TransitionId},
    store::Transition,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One term `p * (r + gamma * maxNextQ)` of a Bellman backup.
pub struct Contribution {
    pub state: StateId,
    pub action: String,
    pub next_state: StateId,
    pub transition: TransitionId,
    pub reward: f64,
    pub probability: f64,
    pub gamma: f64,
    pub max_next_q: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
/// Something a sweep touched, in the order it was touched.
pub enum TraceEvent {
    VisitingState {
        state: StateId,
    },
    VisitingTransition {
        transition: TransitionId,
        from: StateId,
        to: StateId,
    },
    ComputedContribution(Contribution),
}

/// Hooks called during a sweep. They see the computation, they cannot change it.
pub trait SweepObserver {
    fn visiting_state(&mut self, _state: StateId) {}

    fn visiting_transition(&mut self, _transition: &Transition) {}

    fn computed_contribution(&mut self, _contribution: &Contribution) {}
}

impl SweepObserver for () {}

/// Observer that keeps every event for later replay.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    events: Vec<TraceEvent>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

impl SweepObserver for TraceRecorder {
    fn visiting_state(&mut self, state: StateId) {
        self.events.push(TraceEvent::VisitingState { state });
    }

    fn visiting_transition(&mut self, transition: &Transition) {
        self.events.push(TraceEvent::VisitingTransition {
            transition: transition.id(),
            from: transition.from(),
            to: transition.to(),
        });
    }

    fn computed_contribution(&mut self, contribution: &Contribution) {
        self.events.push(TraceEvent::ComputedContribution(contribution.clone()));
    }
}
