use proptest::prelude::*;

use crate::{GraphStore, Point, QTable, SolveConfig, StateId, sweep};

const ACTIONS: [&str; 3] = ["a", "b", "c"];

/// Random graph over `states` states from `(from, to, action, reward, probability)` tuples.
fn build_graph(states: usize, edges: &[(usize, usize, usize, f64, f64)]) -> GraphStore {
    let mut graph = GraphStore::new();
    for i in 0..states {
        graph.add_state(Point::new(i as f64 * 80.0, 0.0));
    }
    for &(from, to, action, reward, probability) in edges {
        graph.add_transition(
            StateId::from(from % states),
            StateId::from(to % states),
            reward,
            ACTIONS[action % ACTIONS.len()],
            probability,
        );
    }
    graph
}

fn edges() -> impl Strategy<Value = Vec<(usize, usize, usize, f64, f64)>> {
    proptest::collection::vec(
        (0usize..6, 0usize..6, 0usize..3, -10.0f64..10.0, 0.0f64..=1.0),
        0..24,
    )
}

proptest! {
    #[test]
    fn sweep_is_deterministic(states in 1usize..6, edges in edges(), gamma in 0.0f64..1.0) {
        let graph = build_graph(states, &edges);
        let config = SolveConfig { gamma, ..SolveConfig::default() };
        let previous = QTable::initialized(&graph);

        let first = sweep(&graph, &previous, &config, &mut ());
        let second = sweep(&graph, &previous, &config, &mut ());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn initialization_is_idempotent_and_zero(states in 1usize..6, edges in edges()) {
        let graph = build_graph(states, &edges);
        let first = QTable::initialized(&graph);
        let second = QTable::initialized(&graph);

        prop_assert_eq!(&first, &second);
        prop_assert!(first.rows().all(|(_, row)| row.values().all(|v| *v == 0.0)));
        for transition in graph.transitions() {
            prop_assert_eq!(first.get(transition.from(), transition.action()), Some(0.0));
        }
    }

    #[test]
    fn zero_rewards_stay_at_zero(states in 1usize..6, edges in edges(), gamma in 0.0f64..1.0) {
        let zeroed: Vec<_> = edges.iter().map(|&(f, t, a, _, p)| (f, t, a, 0.0, p)).collect();
        let graph = build_graph(states, &zeroed);
        let config = SolveConfig { gamma, ..SolveConfig::default() };

        let next = sweep(&graph, &QTable::initialized(&graph), &config, &mut ());
        prop_assert!(next.rows().all(|(_, row)| row.values().all(|v| *v == 0.0)));
    }

    #[test]
    fn sweep_never_mutates_its_input(states in 1usize..6, edges in edges(), gamma in 0.0f64..1.0) {
        let graph = build_graph(states, &edges);
        let config = SolveConfig { gamma, ..SolveConfig::default() };
        let first = sweep(&graph, &QTable::initialized(&graph), &config, &mut ());
        let frozen = first.clone();

        let _ = sweep(&graph, &first, &config, &mut ());
        prop_assert_eq!(first, frozen);
    }
}
