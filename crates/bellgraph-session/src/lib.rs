mod builder;
mod config;
mod edit;
mod error;
mod q_learning;
mod replay;
mod session;
mod simulator;

pub use builder::GraphBuilder;
pub use config::SessionConfig;
pub use edit::{ClickOutcome, EditMode};
pub use error::SessionError;
pub use q_learning::{QLearner, QLearningConfig};
pub use replay::{CancelToken, Pause, ReplayConfig, ReplayOutcome, ThreadPause, replay};
pub use session::{Session, SolveOutput, StepReport};
pub use simulator::{CompiledGraph, Episode, EpisodeStep, GraphSimulator};
