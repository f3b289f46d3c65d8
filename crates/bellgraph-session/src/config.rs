use std::{fs, path::Path};

use bellgraph_core::{ConfigError, GeometryConfig, SolveConfig};
use serde::{Deserialize, Serialize};

use crate::{SessionError, replay::ReplayConfig};

const DEFAULT_SESSION_CONFIG_YAML: &str = include_str!("../config/session.default.yaml");

/// Everything a session needs: solver settings, layout distances and replay pacing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub solve: SolveConfig,
    pub geometry: GeometryConfig,
    pub replay: ReplayConfig,
}

impl SessionConfig {
    /// Parse a session config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SessionError> {
        let config: SessionConfig = serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a session config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let yaml = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SESSION_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SessionError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        self.solve.validate()?;
        self.geometry.validate()?;
        Ok(())
    }
}
