//! Regret metrics over a completed replay.
//!
//! Every function here is stateless and expects its inputs sorted by
//! timestamp ascending, which is how the engine emits decisions and how the
//! loaders return samples.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use shadow_core::{minutes_between, MetricSample, ReplicaSample};

/// How long after a scale-down the risk metric keeps watching.
pub const DEFAULT_RISK_LOOKAHEAD: Duration = Duration::from_secs(300);

/// Total compute consumed by a decision sequence, in replica-hours.
///
/// Each decision holds until the next one; the last decision is not
/// extended past its own timestamp.
pub fn integrated_replica_hours(decisions: &[ReplicaSample]) -> f64 {
    step_integral_minutes(decisions, |d| d.timestamp, |d| f64::from(d.replicas)) / 60.0
}

/// Replica-minutes the observed deployment ran above what the simulated
/// policy would have needed.
///
/// Each simulated point is paired with the nearest observed point in time
/// (ties go to the earlier observation). The excess `actual - simulated`,
/// floored at zero, is integrated over the simulated timeline with the same
/// step rule as [`integrated_replica_hours`]. An empty `actual` sequence
/// yields zero.
pub fn wasted_replica_minutes(actual: &[ReplicaSample], simulated: &[ReplicaSample]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }

    step_integral_minutes(
        simulated,
        |s| s.timestamp,
        |s| {
            let observed = nearest(actual, s.timestamp).map_or(0, |a| a.replicas);
            f64::from(observed.saturating_sub(s.replicas))
        },
    )
}

/// Minutes spent above `target_utilization` shortly after each scale-down.
///
/// A scale-down is any decision strictly lower than the one before it. For
/// each, the raw metric samples in `(t, t + lookahead]` are step-integrated
/// using only the diffs inside that slice, and the time attributed to
/// samples over target is summed. The last sample of a slice contributes
/// nothing since nothing in the slice confirms how long it held.
///
/// Overlapping lookaheads from closely spaced scale-downs are counted once
/// per event; the total is an upper bound, not a deduplicated duration.
pub fn under_provisioning_risk_minutes(
    decisions: &[ReplicaSample],
    metrics: &[MetricSample],
    target_utilization: f64,
    lookahead: Duration,
) -> f64 {
    scale_down_events(decisions)
        .into_iter()
        .map(|at| {
            let slice = lookahead_slice(metrics, at, lookahead);
            let minutes = step_integral_minutes(
                slice,
                |m| m.timestamp,
                |m| if m.utilization > target_utilization { 1.0 } else { 0.0 },
            );
            if minutes > 0.0 {
                debug!(%at, minutes, samples = slice.len(), "over target after scale-down");
            }
            minutes
        })
        .sum()
}

/// Timestamps where the decided count strictly decreased.
pub fn scale_down_events(decisions: &[ReplicaSample]) -> Vec<DateTime<Utc>> {
    decisions
        .windows(2)
        .filter(|w| w[1].replicas < w[0].replicas)
        .map(|w| w[1].timestamp)
        .collect()
}

/// Samples with `at < timestamp <= at + lookahead`.
fn lookahead_slice(metrics: &[MetricSample], at: DateTime<Utc>, lookahead: Duration) -> &[MetricSample] {
    let start = metrics.partition_point(|m| m.timestamp <= at);
    let end = chrono::Duration::from_std(lookahead)
        .ok()
        .and_then(|d| at.checked_add_signed(d))
        .map_or(metrics.len(), |end| metrics.partition_point(|m| m.timestamp <= end));

    &metrics[start..end.max(start)]
}

/// Observation closest in time to `at`; the earlier one wins a tie.
fn nearest(samples: &[ReplicaSample], at: DateTime<Utc>) -> Option<&ReplicaSample> {
    let idx = samples.partition_point(|s| s.timestamp <= at);
    let before = idx.checked_sub(1).map(|i| &samples[i]);
    let after = samples.get(idx);

    match (before, after) {
        (Some(b), Some(a)) if a.timestamp - at < at - b.timestamp => Some(a),
        (Some(b), _) => Some(b),
        (None, a) => a,
    }
}

/// Σ value(p[i]) · minutes(p[i] → p[i+1]) over consecutive points.
fn step_integral_minutes<T>(
    points: &[T],
    time: impl Fn(&T) -> DateTime<Utc>,
    value: impl Fn(&T) -> f64,
) -> f64 {
    points
        .windows(2)
        .map(|w| value(&w[0]) * minutes_between(time(&w[0]), time(&w[1])))
        .sum()
}
