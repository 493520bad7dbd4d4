//! Sample types that flow through a replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// One utilization observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    /// Utilization percentage (non-negative, may exceed 100).
    pub utilization: f64,
}

impl MetricSample {
    pub fn new(timestamp: DateTime<Utc>, utilization: f64) -> Self {
        Self {
            timestamp,
            utilization,
        }
    }
}

/// A replica count at a point in time.
///
/// Used both for the simulated decision sequence and for externally
/// observed replica counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSample {
    pub timestamp: DateTime<Utc>,
    pub replicas: u32,
}

impl ReplicaSample {
    pub fn new(timestamp: DateTime<Utc>, replicas: u32) -> Self {
        Self {
            timestamp,
            replicas,
        }
    }

    /// Pair up parallel timestamp and count columns.
    pub fn zip(
        timestamps: &[DateTime<Utc>],
        counts: &[u32],
    ) -> Result<Vec<ReplicaSample>, SeriesError> {
        if timestamps.len() != counts.len() {
            return Err(SeriesError::LengthMismatch {
                timestamps: timestamps.len(),
                counts: counts.len(),
            });
        }
        Ok(timestamps
            .iter()
            .zip(counts)
            .map(|(&timestamp, &replicas)| ReplicaSample::new(timestamp, replicas))
            .collect())
    }
}

/// Elapsed time between two instants as fractional minutes.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
