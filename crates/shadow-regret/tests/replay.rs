//! End-to-end replays: metric samples → decisions → regret.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use shadow_autoscale::simulate;
use shadow_core::{MetricSample, Policy, ReplicaSample};
use shadow_regret::{
    format_report, integrated_replica_hours, under_provisioning_risk_minutes,
    wasted_replica_minutes, RegretReport, DEFAULT_RISK_LOOKAHEAD,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

fn minute(m: i64, utilization: f64) -> MetricSample {
    MetricSample::new(t0() + chrono::Duration::minutes(m), utilization)
}

#[test]
fn steady_load_costs_min_replicas() {
    let policy = Policy::new(2, 10, 50.0).unwrap();
    let metrics: Vec<_> = (0..=60).map(|m| minute(m, 50.0)).collect();

    let decisions = simulate(&policy, &metrics);
    assert!(decisions.iter().all(|d| d.replicas == 2));

    // 2 replicas for one hour.
    assert_eq!(integrated_replica_hours(&decisions), 2.0);
    assert_eq!(
        under_provisioning_risk_minutes(&decisions, &metrics, 50.0, DEFAULT_RISK_LOOKAHEAD),
        0.0
    );
}

#[test]
fn spike_then_idle_scales_down_once_window_passes() {
    let policy = Policy::new(1, 10, 50.0).unwrap();
    let mut metrics = vec![minute(0, 50.0), minute(1, 200.0)];
    metrics.extend((2..=10).map(|m| minute(m, 10.0)));

    let decisions = simulate(&policy, &metrics);
    let counts: Vec<u32> = decisions.iter().map(|d| d.replicas).collect();
    // Raw recommendation after the spike is ceil(4 × 0.2) = 1, held at 4
    // through minute 6, released at minute 7.
    assert_eq!(counts, vec![1, 4, 4, 4, 4, 4, 4, 1, 1, 1, 1]);

    let report = RegretReport::compute(&decisions, &metrics, None, 50.0, DEFAULT_RISK_LOOKAHEAD);
    assert_eq!(report.scale_down_events, 1);
    assert_eq!(report.under_provisioning_minutes, 0.0);
    // 1 × 1 min + 4 × 6 min + 1 × 3 min = 28 replica-minutes.
    assert!((report.replica_hours - 28.0 / 60.0).abs() < 1e-12);
}

#[test]
fn brief_spike_after_scale_down_is_risk() {
    let policy = Policy::builder(1, 10, 50.0)
        .scale_down_window(Duration::from_secs(60))
        .build()
        .unwrap();
    // The decision stream only sees minutes 0-3; the raw stream also has a
    // short burst between decisions.
    let decisions_input = vec![minute(0, 100.0), minute(2, 10.0), minute(4, 10.0)];
    let decisions = simulate(&policy, &decisions_input);
    assert_eq!(
        decisions.iter().map(|d| d.replicas).collect::<Vec<_>>(),
        vec![2, 1, 1]
    );

    let raw = vec![
        minute(0, 100.0),
        minute(2, 10.0),
        minute(3, 95.0),
        minute(4, 10.0),
        minute(5, 10.0),
    ];
    let risk = under_provisioning_risk_minutes(&decisions, &raw, 50.0, DEFAULT_RISK_LOOKAHEAD);
    assert_eq!(risk, 1.0);
}

#[test]
fn historical_over_provisioning_is_waste() {
    let policy = Policy::new(1, 10, 50.0).unwrap();
    let metrics: Vec<_> = (0..=30).map(|m| minute(m, 50.0)).collect();
    let decisions = simulate(&policy, &metrics);

    let stamps: Vec<_> = metrics.iter().map(|m| m.timestamp).collect();
    let observed = ReplicaSample::zip(&stamps, &vec![4; stamps.len()]).unwrap();

    // Ran 4 where 1 would do, for 30 minutes.
    assert_eq!(wasted_replica_minutes(&observed, &decisions), 90.0);
    assert_eq!(wasted_replica_minutes(&decisions, &observed), 0.0);

    let report = RegretReport::compute(
        &decisions,
        &metrics,
        Some(&observed),
        policy.target_utilization(),
        DEFAULT_RISK_LOOKAHEAD,
    );
    assert!(format_report(&report).contains("90.00 replica-minutes"));
}
