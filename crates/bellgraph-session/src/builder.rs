use bellgraph_core::{GraphStore, Point, StateId};

use crate::{Session, SessionConfig, SessionError};

#[derive(Debug, Clone, Default)]
/// Build a graph by state label instead of by id.
/// Labels follow creation order: the first state is `S1`.
pub struct GraphBuilder {
    graph: GraphStore,
}

impl GraphBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state at `position`; it gets the next label.
    pub fn add_state(&mut self, position: Point) -> &mut Self {
        self.graph.add_state(position);
        self
    }

    /// Add `count` states laid out on a horizontal line.
    pub fn add_states_in_row(&mut self, count: usize, spacing: f64) -> &mut Self {
        let first = self.graph.state_count();
        for i in 0..count {
            let x = (first + i + 1) as f64 * spacing;
            self.graph.add_state(Point::new(x, spacing));
        }
        self
    }

    /// Add a transition between two labeled states.
    /// Action can be stochastic so several transitions may share `(from, action)`.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        reward: f64,
        action: impl Into<String>,
        probability: f64,
    ) -> Result<&mut Self, SessionError> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.graph.add_transition(from, to, reward, action, probability);
        Ok(self)
    }

    pub fn build(self) -> GraphStore {
        self.graph
    }

    pub fn into_session(self, config: SessionConfig) -> Result<Session, SessionError> {
        Session::with_graph(self.graph, config)
    }

    fn resolve(&self, label: &str) -> Result<StateId, SessionError> {
        self.graph
            .state_by_label(label)
            .map(|state| state.id())
            .ok_or_else(|| SessionError::BuilderUnknownState {
                label: label.to_string(),
            })
    }
}
