use crate::bellman::{
    config::{ProbabilityPolicy, SolveConfig},
    q_table::QTable,
    trace::{Contribution, SweepObserver},
};
use crate::graph::store::GraphStore;

/// Run one synchronous Bellman optimality sweep and return the new table.
///
/// For each state `s` (creation order) and each distinct action `a` leaving it
/// (first-seen order):
///
/// `Q'[s][a] = sum over (s, a, s', r, p) of p * (r + gamma * max(0, max_a' Q[s'][a']))`
///
/// Every term reads `previous`; nothing written during the sweep is visible to
/// later terms of the same sweep. A successor without a row reads as an all-zero
/// row. Entries not touched by the sweep are carried over from `previous`.
pub fn sweep(
    graph: &GraphStore,
    previous: &QTable,
    config: &SolveConfig,
    observer: &mut dyn SweepObserver,
) -> QTable {
    let mut next = previous.clone();

    for state in graph.states() {
        let state_id = state.id();
        observer.visiting_state(state_id);
        next.ensure_row(graph, state_id);

        for action in graph.actions_of(state_id) {
            let scale = match config.probability_policy {
                ProbabilityPolicy::Normalize => {
                    let sum = graph.probability_sum(state_id, action);
                    if sum > 0.0 { 1.0 / sum } else { 0.0 }
                }
                ProbabilityPolicy::Strict | ProbabilityPolicy::Lenient => 1.0,
            };

            let mut q_value = 0.0_f64;
            for transition in graph.transitions_by_action(state_id, action) {
                observer.visiting_transition(transition);

                let max_next_q = previous.max_next_q(transition.to());
                let probability = transition.probability() * scale;
                let contribution = probability * (transition.reward() + config.gamma * max_next_q);

                observer.computed_contribution(&Contribution {
                    state: state_id,
                    action: action.to_string(),
                    next_state: transition.to(),
                    transition: transition.id(),
                    reward: transition.reward(),
                    probability,
                    gamma: config.gamma,
                    max_next_q,
                    contribution,
                });

                q_value += contribution;
            }

            next.set(state_id, action, q_value);
        }
    }

    next
}
