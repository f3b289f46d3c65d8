use serde::Serialize;
use tracing::{debug, info};

use crate::bellman::{
    config::SolveConfig,
    q_table::QTable,
    snapshot::QTableSnapshot,
    sweep::sweep,
    trace::{SweepObserver, TraceEvent, TraceRecorder},
};
use crate::geometry::{config::GeometryConfig, layout::GeometryResolver, point::Point};
use crate::graph::{
    ids::{StateId, TransitionId},
    store::GraphStore,
};

/// Where the engine is in its iteration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    /// No table has been built yet.
    Uninitialized,
    /// A table exists and more sweeps may change it.
    Ready,
    /// The last sweep moved no value by more than the tolerance.
    Converged,
    /// The iteration budget is used up without convergence.
    Stopped,
}

/// Result of one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepReport {
    pub iteration: usize,
    pub max_delta: f64,
    pub phase: EnginePhase,
}

/// Aggregate result of a `solve` run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub max_iterations: usize,
    pub iterations_run: usize,
    pub iteration: usize,
    pub final_delta: f64,
    pub phase: EnginePhase,
}

#[derive(Debug, Clone)]
/// Owns the MDP graph and the Q-table computed over it.
/// The table only changes by whole-sweep replacement or reinitialization.
pub struct BellmanEngine {
    graph: GraphStore,
    table: QTable,
    config: SolveConfig,
    iteration: usize,
    phase: EnginePhase,
    table_revision: Option<u64>,
}

impl BellmanEngine {
    /// Create an engine over an empty graph.
    pub fn new(config: SolveConfig) -> Self {
        Self::with_graph(GraphStore::new(), config)
    }

    /// Create an engine over an existing graph. The table starts uninitialized.
    pub fn with_graph(graph: GraphStore, config: SolveConfig) -> Self {
        BellmanEngine {
            graph,
            table: QTable::new(),
            config,
            iteration: 0,
            phase: EnginePhase::Uninitialized,
            table_revision: None,
        }
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    pub fn gamma(&self) -> f64 {
        self.config.gamma
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Whether a transition was added since the table was last initialized.
    /// New states alone do not stale the table; their rows appear on the next sweep.
    pub fn is_stale(&self) -> bool {
        self.table_revision != Some(self.graph.transition_revision())
    }

    pub fn add_state(&mut self, position: Point) -> StateId {
        self.graph.add_state(position)
    }

    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        reward: f64,
        action: impl Into<String>,
        probability: f64,
    ) -> TransitionId {
        self.graph.add_transition(from, to, reward, action, probability)
    }

    /// Reset the table to zeros for the current graph and the iteration count to 0.
    pub fn initialize(&mut self) {
        self.table = QTable::initialized(&self.graph);
        self.iteration = 0;
        self.phase = EnginePhase::Ready;
        self.table_revision = Some(self.graph.transition_revision());
        debug!(
            states = self.graph.state_count(),
            entries = self.table.len(),
            "initialized Q-table"
        );
    }

    /// Change the discount factor. The table is reset since old values are meaningless.
    pub fn set_gamma(&mut self, gamma: f64) {
        self.config.gamma = gamma;
        self.initialize();
    }

    /// Replace the whole solve config and reset the table.
    pub fn set_config(&mut self, config: SolveConfig) {
        self.config = config;
        self.initialize();
    }

    /// Run one sweep and return it together with the recorded visitation trace.
    pub fn step_traced(&mut self) -> (SweepReport, Vec<TraceEvent>) {
        let mut recorder = TraceRecorder::new();
        let report = self.step_with_observer(&mut recorder);
        (report, recorder.into_events())
    }

    /// Run one sweep without recording anything.
    pub fn step(&mut self) -> SweepReport {
        self.step_with_observer(&mut ())
    }

    /// Run one sweep, reporting each visited state and transition to `observer`.
    pub fn step_with_observer(&mut self, observer: &mut dyn SweepObserver) -> SweepReport {
        if self.phase == EnginePhase::Uninitialized {
            self.initialize();
        }

        let next = sweep(&self.graph, &self.table, &self.config, observer);
        let max_delta = next.max_delta(&self.table);
        self.table = next;
        self.iteration += 1;
        self.phase = self.phase_after(max_delta);

        debug!(
            iteration = self.iteration,
            max_delta,
            phase = ?self.phase,
            "completed Bellman sweep"
        );

        SweepReport {
            iteration: self.iteration,
            max_delta,
            phase: self.phase,
        }
    }

    /// Sweep until convergence or until the iteration budget is spent.
    pub fn solve(&mut self) -> SolveReport {
        self.solve_with_hook(|_| {})
    }

    /// Solve and invoke a callback after each completed sweep.
    pub fn solve_with_hook<FHook>(&mut self, mut on_iteration: FHook) -> SolveReport
    where
        FHook: FnMut(&SweepReport),
    {
        if self.phase == EnginePhase::Uninitialized {
            self.initialize();
        }

        let mut iterations_run = 0;
        let mut final_delta = 0.0;

        while self.iteration < self.config.max_iterations {
            let report = self.step();
            iterations_run += 1;
            final_delta = report.max_delta;
            on_iteration(&report);

            if report.phase == EnginePhase::Converged {
                break;
            }
        }

        if self.phase != EnginePhase::Converged {
            self.phase = EnginePhase::Stopped;
        }

        info!(
            iterations_run,
            iteration = self.iteration,
            final_delta,
            phase = ?self.phase,
            "value iteration finished"
        );

        SolveReport {
            max_iterations: self.config.max_iterations,
            iterations_run,
            iteration: self.iteration,
            final_delta,
            phase: self.phase,
        }
    }

    /// Copy the current table for display.
    pub fn snapshot(&self) -> QTableSnapshot {
        QTableSnapshot::capture(
            &self.graph,
            &self.table,
            self.iteration,
            self.phase,
            self.config.gamma,
        )
    }

    /// Geometry view over the current graph.
    pub fn geometry(&self, config: GeometryConfig) -> GeometryResolver<'_> {
        GeometryResolver::new(&self.graph, config)
    }

    fn phase_after(&self, max_delta: f64) -> EnginePhase {
        if self
            .config
            .tolerance
            .is_some_and(|tolerance| max_delta <= tolerance)
        {
            EnginePhase::Converged
        } else if self.iteration >= self.config.max_iterations {
            EnginePhase::Stopped
        } else {
            EnginePhase::Ready
        }
    }
}
