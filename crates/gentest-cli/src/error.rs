//! CLI error types

use gentest_scenario::{PlanError, RegistryError};
use std::path::PathBuf;

/// Errors raised while loading step files or running commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Step file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Step file extension is neither YAML nor JSON
    #[error("unsupported step file format: {} (expected .yaml, .yml or .json)", path.display())]
    UnsupportedFormat {
        /// File path
        path: PathBuf,
    },

    /// Invalid YAML step file
    #[error("invalid yaml step file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid JSON step file, or JSON output failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A flag expected exactly two comma-separated steps
    #[error("--{flag} expects two steps separated by a comma, got '{value}'")]
    InvalidPair {
        /// Flag name
        flag: &'static str,
        /// Offending value
        value: String,
    },

    /// Steps could not be registered
    #[error("invalid steps: {0}")]
    Registry(#[from] RegistryError),

    /// Scenarios could not be planned
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
}

/// Result alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
