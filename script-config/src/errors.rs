use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bad argument given to a public entry point.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Can not access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Can not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config file {0} does not hold a JSON object")]
    NotAnObject(PathBuf),
    #[error("No value for key: {0}")]
    MissingKey(String),
    #[error("Value of key {key} is {found}, can not read it as {expected}")]
    Type {
        key: String,
        found: &'static str,
        expected: String,
    },
    #[error("Settings do not fit {expected}: {source}")]
    Shape {
        expected: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Can not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Preset already exists: {0}")]
    DuplicatePreset(String),
    #[error("No preset with the given name: {0}")]
    UnknownPreset(String),
    #[error("Action already registered: {0}")]
    DuplicateAction(String),
    #[error("No action with the given name: {0}")]
    UnknownAction(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(
        path: impl Into<PathBuf>,
        source: serde_json::Error,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// True for argument validation failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
