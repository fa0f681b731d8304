//! Error types for sorting, configuration and generation.

use thiserror::Error;

/// Failures while ordering generators by their declared dependencies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("Missing dependency: '{item}' requires '{dependency}'")]
    MissingDependency { item: String, dependency: String },
    #[error("Dependency cycle among: {}", remaining.join(", "))]
    Cycle { remaining: Vec<String> },
    #[error("Duplicate generator name '{0}'")]
    DuplicateName(String),
}

/// Failures loading a JSON configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value {field} = {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Failures of a whole generation run. Any of these means no world is published.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error(transparent)]
    Sort(#[from] SortError),
    #[error("Property '{0}' failed its initialise check")]
    PropertyInitialise(String),
    #[error("Feature '{0}' was not generated")]
    FeatureNotGenerated(String),
    #[error("Unknown generator '{0}'")]
    UnknownGenerator(String),
}
