//! Error types for shadow-core.

use std::path::PathBuf;

use thiserror::Error;

/// A violated [`Policy`](crate::Policy) constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("min_replicas must be greater than 0, got {0}")]
    MinReplicas(u32),

    #[error("max_replicas ({max}) must be greater than or equal to min_replicas ({min})")]
    MaxBelowMin { min: u32, max: u32 },

    #[error("target_utilization must be between 1 and 100, got {0}")]
    TargetUtilization(f64),

    #[error("tolerance must be between 0 and 1, got {0}")]
    Tolerance(f64),

    #[error("scale_down_stabilization_window is too large: {0}s")]
    Window(u64),
}

/// Errors building a canonical sample sequence from raw columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("timestamps ({timestamps}) and counts ({counts}) differ in length")]
    LengthMismatch { timestamps: usize, counts: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration '{0}': expected <n>s, <n>m, <n>h or <n>d")]
    Invalid(String),

    #[error("duration '{0}' is out of range")]
    OutOfRange(String),
}

/// Errors loading `shadow.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid duration for {field}: {source}")]
    Duration {
        field: &'static str,
        source: DurationParseError,
    },
}
