//! Scale-down stabilization memory.
//!
//! An append-only log of raw recommendations answering "what is the
//! highest recommendation in the trailing window ending now?".

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

/// One raw (clamped, pre-stabilization) recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Recommendation {
    timestamp: DateTime<Utc>,
    replicas: u32,
}

/// Time-ordered history of raw recommendations for a single replay.
///
/// Callers must record in non-decreasing timestamp order; this is not
/// checked.
#[derive(Debug, Default)]
pub struct StabilizationWindow {
    history: VecDeque<Recommendation>,
}

impl StabilizationWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw recommendation.
    pub fn record(&mut self, timestamp: DateTime<Utc>, replicas: u32) {
        self.history.push_back(Recommendation {
            timestamp,
            replicas,
        });
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Highest recommendation with `now - window <= timestamp <= now`.
    ///
    /// If nothing falls inside the window the most recent recommendation is
    /// returned instead. Returns `None` only when nothing was ever recorded.
    pub fn stabilized_value(&self, now: DateTime<Utc>, window: Duration) -> Option<u32> {
        let latest = self.history.back()?;
        let cutoff = now - window;

        // History is time-ordered: scan newest first and stop at the cutoff.
        let in_window = self
            .history
            .iter()
            .rev()
            .take_while(|r| r.timestamp >= cutoff)
            .filter(|r| r.timestamp <= now)
            .map(|r| r.replicas)
            .max();

        Some(in_window.unwrap_or(latest.replicas))
    }
}
