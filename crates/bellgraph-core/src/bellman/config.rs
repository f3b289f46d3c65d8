use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, parse_yaml, read_yaml};

const DEFAULT_SOLVE_CONFIG_YAML: &str = include_str!("../../config/solve.default.yaml");

/// How a sweep treats `(state, action)` groups whose probabilities do not sum to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityPolicy {
    /// Refuse to sweep until every group sums to 1 within `PROBABILITY_TOLERANCE`.
    /// The engine itself computes like `Lenient`; callers enforce the check.
    #[default]
    Strict,
    /// Divide each probability by its group's sum (groups summing to 0 contribute 0).
    Normalize,
    /// Use probabilities exactly as entered.
    Lenient,
}

/// Discount factor, iteration budget and convergence settings for value iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    pub gamma: f64,
    pub max_iterations: usize,
    /// Stop early once no Q-value moves by more than this. `None` runs the full budget.
    pub tolerance: Option<f64>,
    pub probability_policy: ProbabilityPolicy,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            gamma: 0.9,
            max_iterations: 1000,
            tolerance: Some(1e-9),
            probability_policy: ProbabilityPolicy::Strict,
        }
    }
}

impl SolveConfig {
    /// Tolerance used when checking that a probability group sums to 1.
    pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

    /// Parse a solve config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SolveConfig = parse_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solve config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: SolveConfig = read_yaml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVE_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gamma.is_finite() || !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::Invalid(
                "gamma must be within [0, 1]".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(ConfigError::Invalid(
                    "tolerance must be finite and >= 0".to_string(),
                ));
            }
        }
        Ok(())
    }
}
