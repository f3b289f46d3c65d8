use std::{fmt, fs, path::Path};

use serde::de::DeserializeOwned;

/// Error type for loading and validating the YAML configs of this crate.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            ConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            ConfigError::Invalid(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Yaml(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Parse YAML text into a config type.
pub(crate) fn parse_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)
}

/// Read a YAML file from disk and parse it into a config type.
pub(crate) fn read_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let yaml = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_yaml(&yaml)
}
