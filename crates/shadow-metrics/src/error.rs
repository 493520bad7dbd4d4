//! Error types for metric sources.

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading a metrics CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("metrics file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read metrics file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("metrics file {0} is empty")]
    Empty(PathBuf),

    #[error("missing required columns in CSV: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("failed to parse timestamp '{value}' on line {line}")]
    Timestamp { line: usize, value: String },

    #[error("invalid {column} '{value}' on line {line}")]
    Value {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line} has {found} fields, expected at least {expected}")]
    Width {
        line: usize,
        found: usize,
        expected: usize,
    },
}

/// Errors querying Prometheus.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("prometheus query failed: {0}")]
    Query(String),

    #[error("unexpected sample {value:?} at {timestamp}")]
    Sample { timestamp: f64, value: String },
}
