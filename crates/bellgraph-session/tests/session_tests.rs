use bellgraph_core::{EnginePhase, Point, ProbabilityPolicy, StateId, TraceEvent};
use bellgraph_session::{
    ClickOutcome, EditMode, GraphBuilder, Session, SessionConfig, SessionError,
};

fn session() -> Session {
    Session::from_default_config().expect("default config should load")
}

#[test]
fn default_session_yaml_parses() {
    let config = SessionConfig::from_default_yaml().expect("default yaml should parse");
    assert_eq!(config.solve.max_iterations, 1000);
    assert_eq!(config.solve.probability_policy, ProbabilityPolicy::Strict);
    assert_eq!(config.replay.contribution_delay_ms, 2000);
}

#[test]
fn two_state_chain_steps_to_fixed_point() {
    let mut session = session();
    let s1 = session.on_add_state(Point::new(100.0, 100.0));
    let s2 = session.on_add_state(Point::new(300.0, 100.0));
    session
        .on_add_transition(s1, s2, 1.0, "a", 1.0)
        .expect("valid transition");
    session
        .on_set_discount_factor(0.9)
        .expect("valid discount factor");

    let first = session.on_step().expect("step should succeed");
    assert_eq!(first.sweep.iteration, 1);
    assert_eq!(first.snapshot.value("S1", "a"), Some(1.0));
    assert!(!first.restarted);
    assert!(matches!(first.trace[0], TraceEvent::VisitingState { state } if state == s1));

    let second = session.on_step().expect("step should succeed");
    assert_eq!(second.snapshot.value("S1", "a"), Some(1.0));
    assert_eq!(second.sweep.phase, EnginePhase::Converged);
}

#[test]
fn stochastic_group_is_aggregated() {
    let mut builder = GraphBuilder::new();
    builder.add_states_in_row(3, 120.0);
    builder
        .add_transition("S1", "S2", 10.0, "a", 0.5)
        .expect("S1 and S2 exist")
        .add_transition("S1", "S3", 0.0, "a", 0.5)
        .expect("S1 and S3 exist");
    let mut session = builder
        .into_session(SessionConfig::default())
        .expect("default config is valid");

    let report = session.on_step().expect("step should succeed");
    assert_eq!(report.snapshot.value("S1", "a"), Some(5.0));
}

#[test]
fn builder_rejects_unknown_labels() {
    let mut builder = GraphBuilder::new();
    builder.add_state(Point::default());
    let err = builder
        .add_transition("S1", "S9", 0.0, "a", 1.0)
        .expect_err("S9 does not exist");
    assert!(matches!(err, SessionError::BuilderUnknownState { label } if label == "S9"));
}

#[test]
fn transition_input_is_validated() {
    let mut session = session();
    let s1 = session.on_add_state(Point::default());

    let err = session
        .on_add_transition(s1, StateId::from(5), 0.0, "a", 1.0)
        .expect_err("unknown target");
    assert!(matches!(err, SessionError::UnknownState { index: 5 }));

    let err = session
        .on_add_transition(s1, s1, 0.0, "a", 1.5)
        .expect_err("probability above 1");
    assert!(matches!(err, SessionError::InvalidProbability { .. }));

    let err = session
        .on_add_transition(s1, s1, f64::NAN, "a", 1.0)
        .expect_err("NaN reward");
    assert!(matches!(err, SessionError::InvalidReward { .. }));

    let err = session
        .on_add_transition(s1, s1, 0.0, "  ", 1.0)
        .expect_err("blank action");
    assert!(matches!(err, SessionError::EmptyAction { .. }));

    assert_eq!(session.graph().transition_count(), 0);
}

#[test]
fn discount_factor_outside_unit_interval_is_rejected() {
    let mut session = session();
    let err = session
        .on_set_discount_factor(1.2)
        .expect_err("gamma above 1");
    assert!(matches!(err, SessionError::InvalidDiscount { .. }));
    assert_eq!(session.engine().gamma(), 0.9);
}

#[test]
fn changing_discount_resets_iteration() {
    let mut session = session();
    let s1 = session.on_add_state(Point::default());
    session
        .on_add_transition(s1, s1, 1.0, "stay", 1.0)
        .expect("valid transition");

    session.on_step().expect("first step");
    session.on_step().expect("second step");
    assert_eq!(session.engine().iteration(), 2);

    let snapshot = session
        .on_set_discount_factor(0.5)
        .expect("valid discount factor");
    assert_eq!(snapshot.iteration, 0);
    assert_eq!(snapshot.value("S1", "stay"), Some(0.0));
}

#[test]
fn strict_policy_rejects_incomplete_probability_groups() {
    let mut session = session();
    let s1 = session.on_add_state(Point::default());
    let s2 = session.on_add_state(Point::default());
    session
        .on_add_transition(s1, s2, 10.0, "a", 0.5)
        .expect("valid transition");

    let err = session.on_step().expect_err("group sums to 0.5");
    assert!(matches!(err, SessionError::ProbabilitySum { ref action, .. } if action == "a"));

    session.set_probability_policy(ProbabilityPolicy::Normalize);
    let report = session.on_step().expect("normalized step");
    assert_eq!(report.snapshot.value("S1", "a"), Some(10.0));
}

#[test]
fn editing_the_graph_restarts_the_table() {
    let mut session = session();
    let s1 = session.on_add_state(Point::default());
    let s2 = session.on_add_state(Point::default());
    session
        .on_add_transition(s1, s2, 1.0, "a", 1.0)
        .expect("valid transition");
    session.on_step().expect("first step");
    session.on_step().expect("second step");

    session
        .on_add_transition(s2, s1, 2.0, "b", 1.0)
        .expect("valid transition");
    let report = session.on_step().expect("step after edit");

    assert!(report.restarted);
    assert_eq!(report.sweep.iteration, 1);
    assert_eq!(report.snapshot.value("S2", "b"), Some(2.0));
}

#[test]
fn adding_an_isolated_state_keeps_sweep_progress() {
    let mut session = session();
    let s1 = session.on_add_state(Point::default());
    let s2 = session.on_add_state(Point::default());
    session
        .on_add_transition(s1, s2, 1.0, "a", 1.0)
        .expect("valid transition");
    session.on_step().expect("first step");
    session.on_step().expect("second step");

    session.on_add_state(Point::new(400.0, 100.0));
    let report = session.on_step().expect("step after adding a state");

    assert!(!report.restarted);
    assert_eq!(report.sweep.iteration, 3);
    assert_eq!(report.snapshot.value("S1", "a"), Some(1.0));
    assert!(report.snapshot.row("S3").is_some());
}

#[test]
fn iteration_budget_is_enforced() {
    let mut config = SessionConfig::default();
    config.solve.max_iterations = 3;
    config.solve.tolerance = None;
    let mut session = Session::new(config).expect("valid config");
    let s1 = session.on_add_state(Point::default());
    session
        .on_add_transition(s1, s1, 1.0, "stay", 1.0)
        .expect("valid transition");

    for _ in 0..3 {
        session.on_step().expect("within budget");
    }
    let err = session.on_step().expect_err("budget used up");
    assert!(matches!(err, SessionError::IterationBudgetExhausted { budget: 3 }));
    assert!(session.on_solve().is_err());
}

#[test]
fn solve_converges_self_loop() {
    let mut session = session();
    let s1 = session.on_add_state(Point::default());
    session
        .on_add_transition(s1, s1, 1.0, "stay", 1.0)
        .expect("valid transition");
    session
        .on_set_discount_factor(0.5)
        .expect("valid discount factor");

    let output = session.on_solve().expect("solve should succeed");
    assert_eq!(output.report.phase, EnginePhase::Converged);
    let value = output.snapshot.value("S1", "stay").expect("entry exists");
    assert!((value - 2.0).abs() < 1e-8);
}

#[test]
fn edit_modes_toggle_as_booleans() {
    let mut session = session();
    assert_eq!(session.mode(), EditMode::Idle);
    assert_eq!(session.toggle_add_state(), EditMode::AddingStates);
    assert_eq!(session.toggle_add_state(), EditMode::Idle);
    assert_eq!(session.toggle_add_state(), EditMode::AddingStates);
    assert_eq!(session.toggle_add_transition(), EditMode::AddingTransitions);
    assert_eq!(session.toggle_add_transition(), EditMode::Idle);
}

#[test]
fn clicks_add_states_then_select_transition_endpoints() {
    let mut session = session();
    assert_eq!(
        session.on_canvas_click(Point::new(10.0, 10.0)),
        ClickOutcome::Ignored
    );

    session.toggle_add_state();
    let ClickOutcome::StateAdded(s1) = session.on_canvas_click(Point::new(100.0, 100.0)) else {
        panic!("expected a state to be added");
    };
    let ClickOutcome::StateAdded(s2) = session.on_canvas_click(Point::new(300.0, 100.0)) else {
        panic!("expected a state to be added");
    };

    session.toggle_add_transition();
    assert_eq!(
        session.on_canvas_click(Point::new(200.0, 100.0)),
        ClickOutcome::Ignored
    );
    assert_eq!(
        session.on_canvas_click(Point::new(105.0, 95.0)),
        ClickOutcome::SourceSelected(s1)
    );
    assert_eq!(
        session.on_canvas_click(Point::new(298.0, 102.0)),
        ClickOutcome::TransitionReady { from: s1, to: s2 }
    );
    assert_eq!(session.selection(), None);
}

#[test]
fn layouts_curve_bidirectional_pairs() {
    let mut session = session();
    let s1 = session.on_add_state(Point::new(100.0, 100.0));
    let s2 = session.on_add_state(Point::new(300.0, 100.0));
    let s3 = session.on_add_state(Point::new(100.0, 300.0));
    let forward = session
        .on_add_transition(s1, s2, 0.0, "a", 1.0)
        .expect("valid transition");
    let backward = session
        .on_add_transition(s2, s1, 0.0, "a", 1.0)
        .expect("valid transition");
    let down = session
        .on_add_transition(s1, s3, 0.0, "b", 1.0)
        .expect("valid transition");

    let layouts = session.layouts();
    let curved = |id| {
        layouts
            .iter()
            .find(|(transition, _)| *transition == id)
            .map(|(_, layout)| layout.is_curved())
    };
    assert_eq!(curved(forward), Some(true));
    assert_eq!(curved(backward), Some(true));
    assert_eq!(curved(down), Some(false));
}

#[test]
fn builder_graph_with_nan_probability_is_rejected_before_a_sweep() {
    let mut builder = GraphBuilder::new();
    builder.add_states_in_row(2, 120.0);
    builder
        .add_transition("S1", "S2", 1.0, "a", f64::NAN)
        .expect("S1 and S2 exist");
    let mut session = builder
        .into_session(SessionConfig::default())
        .expect("default config is valid");

    let err = session.on_step().expect_err("NaN probability");
    assert!(matches!(err, SessionError::InvalidProbability { .. }));
    assert_eq!(session.engine().iteration(), 0);
}

#[test]
fn builder_graph_with_out_of_range_probabilities_is_rejected() {
    let mut builder = GraphBuilder::new();
    builder.add_states_in_row(3, 120.0);
    builder
        .add_transition("S1", "S2", 10.0, "a", 1.5)
        .expect("S1 and S2 exist")
        .add_transition("S1", "S3", 0.0, "a", -0.5)
        .expect("S1 and S3 exist");
    let mut session = builder
        .into_session(SessionConfig::default())
        .expect("default config is valid");

    let err = session.on_step().expect_err("probabilities outside [0, 1]");
    assert!(matches!(err, SessionError::InvalidProbability { value, .. } if value == 1.5));
    assert!(session.on_solve().is_err());
}

#[test]
fn action_labels_are_stored_as_entered() {
    let mut session = session();
    let s1 = session.on_add_state(Point::default());
    let id = session
        .on_add_transition(s1, s1, 1.0, " left ", 1.0)
        .expect("label has visible characters");

    let transition = session.graph().transition(id).expect("transition exists");
    assert_eq!(transition.action(), " left ");
    let report = session.on_step().expect("step should succeed");
    assert_eq!(report.snapshot.value("S1", " left "), Some(1.0));
}

#[test]
fn q_learning_config_follows_the_discount_factor() {
    let mut session = session();
    assert_eq!(session.q_learning_config().gamma, 0.9);

    session
        .on_set_discount_factor(0.5)
        .expect("valid discount factor");
    let config = session.q_learning_config();
    assert_eq!(config.gamma, 0.5);

    let learner = session.q_learner(config).expect("valid learning config");
    assert_eq!(learner.config().gamma, 0.5);
}
