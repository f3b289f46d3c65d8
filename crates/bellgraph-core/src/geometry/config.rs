use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, parse_yaml, read_yaml};

const DEFAULT_GEOMETRY_CONFIG_YAML: &str = include_str!("../../config/geometry.default.yaml");

/// Fixed distances used to lay out states, edges and label boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub state_radius: f64,
    pub curve_offset: f64,
    pub self_loop_radius: f64,
    pub arrowhead_length: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            state_radius: 30.0,
            curve_offset: 30.0,
            self_loop_radius: 40.0,
            arrowhead_length: 10.0,
        }
    }
}

impl GeometryConfig {
    /// Parse a geometry config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: GeometryConfig = parse_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a geometry config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: GeometryConfig = read_yaml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_GEOMETRY_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("state_radius", self.state_radius),
            ("curve_offset", self.curve_offset),
            ("self_loop_radius", self.self_loop_radius),
            ("arrowhead_length", self.arrowhead_length),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}
