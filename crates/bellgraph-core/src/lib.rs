mod bellman;
mod config;
mod geometry;
mod graph;

pub use bellman::config::{ProbabilityPolicy, SolveConfig};
pub use bellman::engine::{BellmanEngine, EnginePhase, SolveReport, SweepReport};
pub use bellman::q_table::QTable;
pub use bellman::snapshot::{QRowSnapshot, QTableSnapshot};
pub use bellman::sweep::sweep;
pub use bellman::trace::{Contribution, SweepObserver, TraceEvent, TraceRecorder};
pub use config::ConfigError;
pub use geometry::config::GeometryConfig;
pub use geometry::layout::{Arrowhead, EdgeLayout, GeometryResolver};
pub use geometry::point::Point;
pub use graph::ids::{StateId, TransitionId};
pub use graph::store::{GraphStore, ProbabilityGroup, StateNode, Transition};

#[cfg(test)]
mod tests;
