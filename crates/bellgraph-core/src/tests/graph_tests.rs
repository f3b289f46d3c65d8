use crate::{GraphStore, Point, StateId};

#[test]
fn states_get_sequential_labels_in_creation_order() {
    let mut graph = GraphStore::new();
    let s1 = graph.add_state(Point::new(10.0, 10.0));
    let s2 = graph.add_state(Point::new(50.0, 10.0));
    let s3 = graph.add_state(Point::new(90.0, 10.0));

    assert_eq!(s1.index(), 0);
    assert_eq!(s3.index(), 2);
    assert_eq!(graph.state(s1).map(|s| s.label()), Some("S1"));
    assert_eq!(graph.state(s2).map(|s| s.label()), Some("S2"));
    assert_eq!(graph.state_by_label("S3").map(|s| s.id()), Some(s3));
    assert!(graph.state_by_label("S4").is_none());
}

#[test]
fn transition_queries_preserve_insertion_order() {
    let mut graph = GraphStore::new();
    let s1 = graph.add_state(Point::default());
    let s2 = graph.add_state(Point::default());
    let s3 = graph.add_state(Point::default());

    let t0 = graph.add_transition(s1, s2, 1.0, "b", 0.5);
    let t1 = graph.add_transition(s1, s3, 0.0, "a", 1.0);
    let t2 = graph.add_transition(s2, s1, 2.0, "a", 1.0);
    let t3 = graph.add_transition(s1, s3, 4.0, "b", 0.5);

    let from_s1: Vec<_> = graph.transitions_from(s1).map(|t| t.id()).collect();
    assert_eq!(from_s1, vec![t0, t1, t3]);

    let s1_b: Vec<_> = graph.transitions_by_action(s1, "b").map(|t| t.id()).collect();
    assert_eq!(s1_b, vec![t0, t3]);

    assert_eq!(graph.actions_of(s1), vec!["b", "a"]);
    assert_eq!(graph.actions_of(s2), vec!["a"]);
    assert!(graph.actions_of(s3).is_empty());
    assert!(graph.is_terminal(s3));
    assert_eq!(graph.transition(t2).map(|t| t.reward()), Some(2.0));
}

#[test]
fn probability_groups_sum_per_state_action() {
    let mut graph = GraphStore::new();
    let s1 = graph.add_state(Point::default());
    let s2 = graph.add_state(Point::default());

    graph.add_transition(s1, s2, 0.0, "a", 0.25);
    graph.add_transition(s1, s1, 0.0, "a", 0.5);
    graph.add_transition(s1, s2, 0.0, "b", 1.0);

    let groups = graph.probability_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].action, "a");
    assert!((groups[0].sum - 0.75).abs() < 1e-12);
    assert_eq!(groups[0].transitions.len(), 2);
    assert_eq!(groups[1].action, "b");
    assert_eq!(graph.probability_sum(s2, "a"), 0.0);
}

#[test]
fn revision_tracks_every_mutation() {
    let mut graph = GraphStore::new();
    assert_eq!(graph.revision(), 0);
    let s1 = graph.add_state(Point::default());
    assert_eq!(graph.revision(), 1);
    graph.add_transition(s1, s1, 0.0, "stay", 1.0);
    assert_eq!(graph.revision(), 2);
}

#[test]
fn transition_revision_ignores_new_states() {
    let mut graph = GraphStore::new();
    let s1 = graph.add_state(Point::default());
    assert_eq!(graph.transition_revision(), 0);
    graph.add_transition(s1, s1, 0.0, "stay", 1.0);
    assert_eq!(graph.transition_revision(), 1);
    graph.add_state(Point::default());
    assert_eq!(graph.transition_revision(), 1);
}

#[test]
fn unknown_state_ids_degrade_to_empty_queries() {
    let mut graph = GraphStore::new();
    graph.add_state(Point::default());
    let missing = StateId::from(9);

    assert!(!graph.contains_state(missing));
    assert!(graph.state(missing).is_none());
    assert_eq!(graph.transitions_from(missing).count(), 0);
}
