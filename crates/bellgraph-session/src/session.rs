use bellgraph_core::{
    BellmanEngine, EdgeLayout, EnginePhase, GeometryResolver, GraphStore, Point,
    ProbabilityPolicy, QTableSnapshot, SolveConfig, SolveReport, StateId, SweepReport,
    TraceEvent, TransitionId,
};
use tracing::{debug, info, warn};

use crate::{
    QLearner, QLearningConfig, SessionConfig, SessionError,
    edit::{ClickOutcome, EditMode},
    replay::{CancelToken, Pause, ReplayOutcome, replay},
    simulator::{Episode, GraphSimulator},
};

/// What the presentation layer gets back from one `on_step`.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub sweep: SweepReport,
    pub snapshot: QTableSnapshot,
    /// Visited states, transitions and computed terms, in sweep order.
    pub trace: Vec<TraceEvent>,
    /// The table was rebuilt first because the graph changed since it was initialized.
    pub restarted: bool,
}

/// What the presentation layer gets back from `on_solve`.
#[derive(Debug, Clone)]
pub struct SolveOutput {
    pub report: SolveReport,
    pub snapshot: QTableSnapshot,
    pub restarted: bool,
}

#[derive(Debug, Clone)]
/// The object a UI holds on to: graph authoring, discount control and iteration.
/// Every user event goes through one of the `on_*` methods.
pub struct Session {
    engine: BellmanEngine,
    config: SessionConfig,
    mode: EditMode,
    selection: Option<StateId>,
}

impl Session {
    /// Start a session over an empty graph.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_graph(GraphStore::new(), config)
    }

    /// Start a session over an existing graph.
    pub fn with_graph(graph: GraphStore, config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Session {
            engine: BellmanEngine::with_graph(graph, config.solve.clone()),
            config,
            mode: EditMode::Idle,
            selection: None,
        })
    }

    /// Start a session with the bundled default config.
    pub fn from_default_config() -> Result<Self, SessionError> {
        Self::new(SessionConfig::from_default_yaml()?)
    }

    pub fn engine(&self) -> &BellmanEngine {
        &self.engine
    }

    pub fn graph(&self) -> &GraphStore {
        self.engine.graph()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// First endpoint of a transition being drawn, if any.
    pub fn selection(&self) -> Option<StateId> {
        self.selection
    }

    /// Toggle state-adding mode. Leaves transition mode.
    pub fn toggle_add_state(&mut self) -> EditMode {
        self.mode = self.mode.toggled(EditMode::AddingStates);
        self.selection = None;
        self.mode
    }

    /// Toggle transition-drawing mode. Clears any half-made selection.
    pub fn toggle_add_transition(&mut self) -> EditMode {
        self.mode = self.mode.toggled(EditMode::AddingTransitions);
        self.selection = None;
        self.mode
    }

    /// Route a canvas click according to the current edit mode.
    pub fn on_canvas_click(&mut self, point: Point) -> ClickOutcome {
        match self.mode {
            EditMode::Idle => ClickOutcome::Ignored,
            EditMode::AddingStates => ClickOutcome::StateAdded(self.on_add_state(point)),
            EditMode::AddingTransitions => {
                let Some(clicked) = self.geometry().state_at(point) else {
                    return ClickOutcome::Ignored;
                };
                match self.selection.take() {
                    None => {
                        self.selection = Some(clicked);
                        ClickOutcome::SourceSelected(clicked)
                    }
                    Some(from) => ClickOutcome::TransitionReady { from, to: clicked },
                }
            }
        }
    }

    pub fn on_add_state(&mut self, position: Point) -> StateId {
        let id = self.engine.add_state(position);
        debug!(state = %id.label(), x = position.x, y = position.y, "added state");
        id
    }

    /// Add a transition after checking its endpoints and numbers.
    pub fn on_add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        reward: f64,
        action: &str,
        probability: f64,
    ) -> Result<TransitionId, SessionError> {
        for state in [from, to] {
            if !self.graph().contains_state(state) {
                return Err(SessionError::UnknownState {
                    index: state.index(),
                });
            }
        }

        check_transition(from, to, reward, action, probability)?;

        let id = self.engine.add_transition(from, to, reward, action, probability);
        debug!(
            transition = id.index(),
            from = %from.label(),
            to = %to.label(),
            action,
            reward,
            probability,
            "added transition"
        );
        Ok(id)
    }

    /// Set the discount factor, then reset and reinitialize the table.
    pub fn on_set_discount_factor(&mut self, gamma: f64) -> Result<QTableSnapshot, SessionError> {
        if !gamma.is_finite() || !(0.0..=1.0).contains(&gamma) {
            return Err(SessionError::InvalidDiscount { value: gamma });
        }

        self.config.solve.gamma = gamma;
        self.engine.set_gamma(gamma);
        info!(gamma, "discount factor set, Q-table reset");
        Ok(self.engine.snapshot())
    }

    /// Change the probability policy. The table is reset.
    pub fn set_probability_policy(&mut self, policy: ProbabilityPolicy) {
        self.config.solve.probability_policy = policy;
        self.engine.set_config(self.config.solve.clone());
    }

    /// Run one Bellman sweep and return the new table with its visitation trace.
    pub fn on_step(&mut self) -> Result<StepReport, SessionError> {
        self.validate_graph()?;
        let restarted = self.refresh_table();
        self.ensure_budget_left()?;

        let (sweep, trace) = self.engine.step_traced();
        Ok(StepReport {
            sweep,
            snapshot: self.engine.snapshot(),
            trace,
            restarted,
        })
    }

    /// Sweep until convergence or until the iteration budget is used up.
    pub fn on_solve(&mut self) -> Result<SolveOutput, SessionError> {
        self.validate_graph()?;
        let restarted = self.refresh_table();
        self.ensure_budget_left()?;

        let report = self.engine.solve();
        Ok(SolveOutput {
            report,
            snapshot: self.engine.snapshot(),
            restarted,
        })
    }

    pub fn snapshot(&self) -> QTableSnapshot {
        self.engine.snapshot()
    }

    pub fn geometry(&self) -> GeometryResolver<'_> {
        self.engine.geometry(self.config.geometry)
    }

    /// Layout of every drawable transition, in insertion order.
    pub fn layouts(&self) -> Vec<(TransitionId, EdgeLayout)> {
        self.geometry()
            .layouts()
            .into_iter()
            .map(|(transition, layout)| (transition.id(), layout))
            .collect()
    }

    /// Replay a step's trace with this session's pacing.
    pub fn replay<P, F>(
        &self,
        trace: &[TraceEvent],
        pause: &mut P,
        cancel: &CancelToken,
        on_event: F,
    ) -> ReplayOutcome
    where
        P: Pause + ?Sized,
        F: FnMut(&TraceEvent),
    {
        replay(trace, &self.config.replay, pause, cancel, on_event)
    }

    /// Sample one walk that follows the current greedy policy.
    pub fn greedy_episode(
        &self,
        start: StateId,
        seed: u64,
        max_steps: usize,
    ) -> Result<Episode, SessionError> {
        if !self.graph().contains_state(start) {
            return Err(SessionError::UnknownState {
                index: start.index(),
            });
        }
        let mut simulator = GraphSimulator::new(self.graph(), seed);
        Ok(simulator.greedy_episode(self.engine.table(), start, self.engine.gamma(), max_steps))
    }

    /// Default Q-learning settings, discounting with the session's current factor.
    pub fn q_learning_config(&self) -> QLearningConfig {
        QLearningConfig {
            gamma: self.config.solve.gamma,
            ..QLearningConfig::default()
        }
    }

    /// Build a sampled Q-learner over the current graph.
    /// `config.gamma` is used as given; start from `q_learning_config` to follow the session.
    pub fn q_learner(&self, config: QLearningConfig) -> Result<QLearner, SessionError> {
        config.validate()?;
        Ok(QLearner::new(self.graph(), config))
    }

    /// Check references and transition numbers, and probability sums when the policy is strict.
    pub fn validate_graph(&self) -> Result<(), SessionError> {
        let graph = self.graph();
        for transition in graph.transitions() {
            for state in [transition.from(), transition.to()] {
                if !graph.contains_state(state) {
                    return Err(SessionError::DanglingReference {
                        transition: transition.id().index(),
                        state: state.index(),
                    });
                }
            }
            check_transition(
                transition.from(),
                transition.to(),
                transition.reward(),
                transition.action(),
                transition.probability(),
            )?;
        }

        if self.config.solve.probability_policy != ProbabilityPolicy::Strict {
            return Ok(());
        }

        let tolerance = SolveConfig::PROBABILITY_TOLERANCE;
        for group in graph.probability_groups() {
            if group.sum.is_nan() || (group.sum - 1.0).abs() > tolerance {
                return Err(SessionError::ProbabilitySum {
                    state: group.state.label(),
                    action: group.action,
                    sum: group.sum,
                    tolerance,
                });
            }
        }
        Ok(())
    }

    /// Rebuild the table if it was never built or the graph changed since.
    fn refresh_table(&mut self) -> bool {
        if self.engine.phase() == EnginePhase::Uninitialized {
            self.engine.initialize();
            return false;
        }
        if self.engine.is_stale() {
            warn!(
                iteration = self.engine.iteration(),
                "graph changed since the Q-table was built, restarting from zero"
            );
            self.engine.initialize();
            return true;
        }
        false
    }

    fn ensure_budget_left(&self) -> Result<(), SessionError> {
        let budget = self.engine.config().max_iterations;
        if self.engine.iteration() >= budget {
            return Err(SessionError::IterationBudgetExhausted { budget });
        }
        Ok(())
    }
}

/// Numbers and label of a single transition. The action is stored as entered,
/// it only has to contain something besides whitespace.
fn check_transition(
    from: StateId,
    to: StateId,
    reward: f64,
    action: &str,
    probability: f64,
) -> Result<(), SessionError> {
    if action.trim().is_empty() {
        return Err(SessionError::EmptyAction {
            from: from.label(),
            to: to.label(),
        });
    }
    if !reward.is_finite() {
        return Err(SessionError::InvalidReward {
            from: from.label(),
            to: to.label(),
            value: reward,
        });
    }
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(SessionError::InvalidProbability {
            from: from.label(),
            to: to.label(),
            value: probability,
        });
    }
    Ok(())
}
