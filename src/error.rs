//! Structured error types for configuration loading.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Filesystem errors
    PathNotFound,
    MissingPath,

    // Loader errors
    LoadFailed,

    // Schema errors
    ValidationFailed,
}

/// A single schema violation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    /// Option name that failed validation.
    pub key: String,
    /// Shape the schema expects.
    pub expected: String,
    /// Shape actually found in the repository.
    pub actual: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\": expected {}, found {}",
            self.key, self.expected, self.actual
        )
    }
}

/// Schema validation failure. Lists every offending key, in repository order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Names of the keys that failed.
    pub fn keys(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.key.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "invalid configuration: {}", details.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while resolving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid path \"{}\"", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Path table has no entry for \"{name}\"")]
    MissingPath { name: String },

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {origin}: {source}")]
    ParseYaml {
        origin: String,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON in {origin}: {source}")]
    ParseJson {
        origin: String,
        source: serde_json::Error,
    },

    #[error("Configuration in {origin} must be a mapping at the top level")]
    NotAMapping { origin: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    pub fn missing_path(name: &str) -> Self {
        Self::MissingPath {
            name: name.to_string(),
        }
    }

    /// Coarse error kind, stable for callers that match on codes.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::PathNotFound { .. } => ErrorCode::PathNotFound,
            ConfigError::MissingPath { .. } => ErrorCode::MissingPath,
            ConfigError::Read { .. }
            | ConfigError::ParseYaml { .. }
            | ConfigError::ParseJson { .. }
            | ConfigError::NotAMapping { .. } => ErrorCode::LoadFailed,
            ConfigError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    /// True for failures of the loading capability (read or parse).
    pub fn is_load_error(&self) -> bool {
        self.code() == ErrorCode::LoadFailed
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
