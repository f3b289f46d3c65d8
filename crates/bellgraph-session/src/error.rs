use bellgraph_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for session input, validation and iteration control.
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("state {index} does not exist")]
    UnknownState { index: usize },

    #[error("builder referenced unknown state '{label}'")]
    BuilderUnknownState { label: String },

    #[error("transition {transition} references missing state {state}")]
    DanglingReference { transition: usize, state: usize },

    #[error("invalid probability for transition {from} -> {to}: {value} (expected a value in [0, 1])")]
    InvalidProbability { from: String, to: String, value: f64 },

    #[error("invalid reward for transition {from} -> {to}: {value}")]
    InvalidReward { from: String, to: String, value: f64 },

    #[error("transition {from} -> {to} needs a non-empty action label")]
    EmptyAction { from: String, to: String },

    #[error("discount factor must be within [0, 1], got {value}")]
    InvalidDiscount { value: f64 },

    #[error(
        "probability sum for state '{state}', action '{action}' must be within {tolerance} of 1.0, got {sum}"
    )]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },

    #[error("all {budget} iterations completed")]
    IterationBudgetExhausted { budget: usize },
}
