//! Regret summary and its human-readable rendering.

use std::time::Duration;

use serde::Serialize;

use shadow_core::{MetricSample, ReplicaSample};

use crate::analyzer::{
    integrated_replica_hours, scale_down_events, under_provisioning_risk_minutes,
    wasted_replica_minutes,
};

/// The three regret metrics for one replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegretReport {
    /// Compute consumed by the simulated trajectory.
    pub replica_hours: f64,
    /// Minutes over target shortly after scale-downs.
    pub under_provisioning_minutes: f64,
    /// `None` when no observed replica counts were supplied.
    pub wasted_replica_minutes: Option<f64>,
    pub scale_down_events: usize,
}

impl RegretReport {
    pub fn compute(
        decisions: &[ReplicaSample],
        metrics: &[MetricSample],
        actual: Option<&[ReplicaSample]>,
        target_utilization: f64,
        risk_lookahead: Duration,
    ) -> Self {
        RegretReport {
            replica_hours: integrated_replica_hours(decisions),
            under_provisioning_minutes: under_provisioning_risk_minutes(
                decisions,
                metrics,
                target_utilization,
                risk_lookahead,
            ),
            wasted_replica_minutes: actual.map(|a| wasted_replica_minutes(a, decisions)),
            scale_down_events: scale_down_events(decisions).len(),
        }
    }
}

pub fn format_report(report: &RegretReport) -> String {
    let waste = match report.wasted_replica_minutes {
        Some(w) => format!("{w:.2} replica-minutes"),
        None => "N/A".to_string(),
    };

    let mut out = String::new();
    out.push_str("\n=== Shadow HPA Simulation Results ===\n");
    out.push_str(&format!(
        "Total CPU Cost:            {:.4} CPU-hours\n",
        report.replica_hours
    ));
    out.push_str(&format!(
        "Under-Provisioning Risk:   {:.2} minutes\n",
        report.under_provisioning_minutes
    ));
    out.push_str(&format!("Scale-Up Regret (Waste):   {waste}\n"));
    out.push_str(&format!(
        "Scale-Down Events:         {}\n",
        report.scale_down_events
    ));
    out.push_str("=====================================\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, m, 0).unwrap()
    }

    fn sample_report(waste: Option<f64>) -> RegretReport {
        RegretReport {
            replica_hours: 4.0,
            under_provisioning_minutes: 1.5,
            wasted_replica_minutes: waste,
            scale_down_events: 2,
        }
    }

    #[test]
    fn compute_without_actual_has_no_waste() {
        let decisions = vec![ReplicaSample::new(ts(0), 5), ReplicaSample::new(ts(1), 2)];
        let metrics = vec![MetricSample::new(ts(2), 80.0), MetricSample::new(ts(3), 80.0)];

        let report = RegretReport::compute(&decisions, &metrics, None, 50.0, Duration::from_secs(300));
        assert_eq!(report.wasted_replica_minutes, None);
        assert_eq!(report.scale_down_events, 1);
        assert_eq!(report.under_provisioning_minutes, 1.0);
        assert!((report.replica_hours - 5.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn compute_with_actual_reports_waste() {
        let decisions = vec![ReplicaSample::new(ts(0), 2), ReplicaSample::new(ts(10), 2)];
        let actual = vec![ReplicaSample::new(ts(0), 3), ReplicaSample::new(ts(10), 3)];

        let report = RegretReport::compute(&decisions, &[], Some(&actual), 50.0, Duration::from_secs(300));
        assert_eq!(report.wasted_replica_minutes, Some(10.0));
        assert_eq!(report.under_provisioning_minutes, 0.0);
    }

    #[test]
    fn format_shows_na_without_waste() {
        let text = format_report(&sample_report(None));
        assert!(text.contains("4.0000 CPU-hours"));
        assert!(text.contains("1.50 minutes"));
        assert!(text.contains("Scale-Up Regret (Waste):   N/A"));
    }

    #[test]
    fn format_shows_waste() {
        let text = format_report(&sample_report(Some(25.0)));
        assert!(text.contains("25.00 replica-minutes"));
    }

    #[test]
    fn serializes_missing_waste_as_null() {
        let json = serde_json::to_value(sample_report(None)).unwrap();
        assert!(json["wasted_replica_minutes"].is_null());
        assert_eq!(json["replica_hours"], 4.0);
    }
}
