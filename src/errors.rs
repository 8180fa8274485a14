// Error types for the note store and config persistence

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A required path argument was empty.
    #[error("MISSING_PATH: {0} requires a non-empty path")]
    MissingPath(&'static str),
    /// An operation needing a project root was called without one.
    #[error("NO_PROJECT_ROOT: {0} requires a project root")]
    NoProjectRoot(&'static str),
    #[error("Invalid name: {0:?} is empty after removing reserved characters")]
    InvalidName(String),
    #[error("{0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
