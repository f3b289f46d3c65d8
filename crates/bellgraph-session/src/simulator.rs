use bellgraph_core::{GraphStore, QTable, StateId};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone)]
/// Sampling form of a graph: actions grouped per state with precomputed CDFs.
pub struct CompiledGraph {
    states: Vec<Vec<ActionRec>>,
}

#[derive(Debug, Clone)]
struct ActionRec {
    action: String,
    outcomes: Vec<OutcomeRec>,
    cdf: Vec<f64>,
}

#[derive(Debug, Clone)]
struct OutcomeRec {
    next: StateId,
    reward: f64,
}

impl CompiledGraph {
    /// Group transitions by `(state, action)`. Each group's CDF is normalized to
    /// end at 1; a group whose probabilities sum to 0 is sampled uniformly.
    pub fn from_graph(graph: &GraphStore) -> Self {
        let mut states = Vec::with_capacity(graph.state_count());

        for state in graph.states() {
            let mut actions = Vec::new();
            for action in graph.actions_of(state.id()) {
                let transitions: Vec<_> = graph.transitions_by_action(state.id(), action).collect();
                let total: f64 = transitions.iter().map(|t| t.probability().max(0.0)).sum();
                let uniform = 1.0 / transitions.len() as f64;

                let mut outcomes = Vec::with_capacity(transitions.len());
                let mut cdf = Vec::with_capacity(transitions.len());
                let mut cumulative = 0.0_f64;
                for transition in transitions {
                    cumulative += if total > 0.0 {
                        transition.probability().max(0.0) / total
                    } else {
                        uniform
                    };
                    cdf.push(cumulative);
                    outcomes.push(OutcomeRec {
                        next: transition.to(),
                        reward: transition.reward(),
                    });
                }

                actions.push(ActionRec {
                    action: action.to_string(),
                    outcomes,
                    cdf,
                });
            }
            states.push(actions);
        }

        Self { states }
    }

    /// Return the number of actions available from a state.
    pub fn num_actions(&self, state: StateId) -> usize {
        self.states.get(state.index()).map_or(0, Vec::len)
    }

    /// Return the label of the `action_id`-th action of a state.
    pub fn action_label(&self, state: StateId, action_id: usize) -> Option<&str> {
        self.states
            .get(state.index())?
            .get(action_id)
            .map(|action| action.action.as_str())
    }

    /// A state is terminal when nothing leaves it.
    pub fn is_terminal(&self, state: StateId) -> bool {
        self.num_actions(state) == 0
    }

    /// Sample one transition for `(state, action_id)` using a uniform sample in `[0, 1)`.
    pub(crate) fn sample_transition(
        &self,
        state: StateId,
        action_id: usize,
        sample: f64,
    ) -> Option<(StateId, f64, bool)> {
        let action = self.states.get(state.index())?.get(action_id)?;
        if action.outcomes.is_empty() {
            return None;
        }

        let mut chosen_idx = action.cdf.partition_point(|p| *p < sample);
        if chosen_idx >= action.outcomes.len() {
            chosen_idx = action.outcomes.len() - 1;
        }

        let outcome = &action.outcomes[chosen_idx];
        Some((outcome.next, outcome.reward, self.is_terminal(outcome.next)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeStep {
    pub state: StateId,
    pub action: String,
    pub next_state: StateId,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One sampled walk through the graph.
pub struct Episode {
    pub steps: Vec<EpisodeStep>,
    /// Discounted sum of rewards.
    pub total_return: f64,
    /// Whether the walk ended in a state with no outgoing transitions.
    pub terminated: bool,
}

#[derive(Debug, Clone)]
/// Seeded simulator over a compiled graph.
pub struct GraphSimulator {
    model: CompiledGraph,
    rng: ChaCha8Rng,
}

impl GraphSimulator {
    /// Create a simulator with deterministic RNG seed.
    pub fn new(graph: &GraphStore, seed: u64) -> Self {
        Self {
            model: CompiledGraph::from_graph(graph),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn model(&self) -> &CompiledGraph {
        &self.model
    }

    pub fn num_actions(&self, state: StateId) -> usize {
        self.model.num_actions(state)
    }

    /// Sample one `(next_state, reward, terminal)` transition.
    /// Invalid state/action inputs are treated as a no-op terminal transition.
    pub fn step(&mut self, state: StateId, action_id: usize) -> (StateId, f64, bool) {
        let sample = self.uniform();
        self.model
            .sample_transition(state, action_id, sample)
            .unwrap_or((state, 0.0, true))
    }

    /// Uniform sample in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        (self.rng.next_u64() as f64) / ((u64::MAX as f64) + 1.0)
    }

    /// Uniformly random action index for a state, `None` for terminal states.
    pub fn random_action(&mut self, state: StateId) -> Option<usize> {
        let n = self.num_actions(state);
        (n > 0).then(|| self.rng.gen_range(0..n))
    }

    /// Index of the highest-valued action of `state` in `table`.
    /// Missing entries count as 0; ties go to the earliest action.
    pub fn greedy_action(&self, table: &QTable, state: StateId) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for action_id in 0..self.num_actions(state) {
            let value = self
                .model
                .action_label(state, action_id)
                .and_then(|label| table.get(state, label))
                .unwrap_or(0.0);
            best = match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((action_id, value)),
            };
        }
        best.map(|(action_id, _)| action_id)
    }

    /// Follow the greedy policy of `table` from `start` for at most `max_steps` steps.
    pub fn greedy_episode(
        &mut self,
        table: &QTable,
        start: StateId,
        gamma: f64,
        max_steps: usize,
    ) -> Episode {
        let mut steps = Vec::new();
        let mut state = start;
        let mut total_return = 0.0;
        let mut discount = 1.0;
        let mut terminated = self.model.is_terminal(start);

        while !terminated && steps.len() < max_steps {
            let Some(action_id) = self.greedy_action(table, state) else {
                terminated = true;
                break;
            };
            let (next_state, reward, next_terminal) = self.step(state, action_id);
            let action = self
                .model
                .action_label(state, action_id)
                .unwrap_or_default()
                .to_string();

            total_return += discount * reward;
            discount *= gamma;
            steps.push(EpisodeStep {
                state,
                action,
                next_state,
                reward,
            });

            state = next_state;
            terminated = next_terminal;
        }

        Episode {
            steps,
            total_return,
            terminated,
        }
    }
}
