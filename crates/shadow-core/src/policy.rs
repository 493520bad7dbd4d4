//! The autoscaling policy under evaluation.
//!
//! A [`Policy`] is validated once at construction and is read-only
//! afterwards: fields are private and there are no setters.

use std::time::Duration;

use serde::Serialize;

use crate::error::PolicyError;

/// Validated autoscaling configuration for one replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Policy {
    min_replicas: u32,
    max_replicas: u32,
    target_utilization: f64,
    tolerance: f64,
    #[serde(rename = "scale_down_window_secs", serialize_with = "serialize_secs")]
    scale_down_window: chrono::Duration,
}

impl Policy {
    /// Dead-zone around a utilization ratio of 1.0.
    pub const DEFAULT_TOLERANCE: f64 = 0.1;
    /// Scale-down stabilization window.
    pub const DEFAULT_SCALE_DOWN_WINDOW: Duration = Duration::from_secs(300);

    /// Build a policy with the default tolerance and stabilization window.
    pub fn new(
        min_replicas: u32,
        max_replicas: u32,
        target_utilization: f64,
    ) -> Result<Self, PolicyError> {
        Self::builder(min_replicas, max_replicas, target_utilization).build()
    }

    pub fn builder(
        min_replicas: u32,
        max_replicas: u32,
        target_utilization: f64,
    ) -> PolicyBuilder {
        PolicyBuilder {
            min_replicas,
            max_replicas,
            target_utilization,
            tolerance: Self::DEFAULT_TOLERANCE,
            scale_down_window: Self::DEFAULT_SCALE_DOWN_WINDOW,
        }
    }

    pub fn min_replicas(&self) -> u32 {
        self.min_replicas
    }

    pub fn max_replicas(&self) -> u32 {
        self.max_replicas
    }

    /// Target utilization percentage, in `[1, 100]`.
    pub fn target_utilization(&self) -> f64 {
        self.target_utilization
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// How far back the scale-down stabilization memory reaches.
    pub fn scale_down_window(&self) -> chrono::Duration {
        self.scale_down_window
    }

    /// Clamp a replica count into `[min_replicas, max_replicas]`.
    pub fn clamp(&self, replicas: u32) -> u32 {
        replicas.clamp(self.min_replicas, self.max_replicas)
    }
}

/// Collects policy fields; [`PolicyBuilder::build`] validates them all at once.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    min_replicas: u32,
    max_replicas: u32,
    target_utilization: f64,
    tolerance: f64,
    scale_down_window: Duration,
}

impl PolicyBuilder {
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn scale_down_window(mut self, window: Duration) -> Self {
        self.scale_down_window = window;
        self
    }

    /// Validate and freeze the policy.
    ///
    /// Constraints are checked in declaration order and the first violation
    /// is returned; no partially-valid policy is ever produced.
    pub fn build(self) -> Result<Policy, PolicyError> {
        if self.min_replicas == 0 {
            return Err(PolicyError::MinReplicas(self.min_replicas));
        }
        if self.max_replicas < self.min_replicas {
            return Err(PolicyError::MaxBelowMin {
                min: self.min_replicas,
                max: self.max_replicas,
            });
        }
        // Written as a negated range check so NaN is rejected too.
        if !(1.0..=100.0).contains(&self.target_utilization) {
            return Err(PolicyError::TargetUtilization(self.target_utilization));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(PolicyError::Tolerance(self.tolerance));
        }
        let scale_down_window = chrono::Duration::from_std(self.scale_down_window)
            .map_err(|_| PolicyError::Window(self.scale_down_window.as_secs()))?;

        Ok(Policy {
            min_replicas: self.min_replicas,
            max_replicas: self.max_replicas,
            target_utilization: self.target_utilization,
            tolerance: self.tolerance,
            scale_down_window,
        })
    }
}

fn serialize_secs<S: serde::Serializer>(d: &chrono::Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_policy_keeps_fields() {
        let policy = Policy::builder(2, 10, 70.0)
            .scale_down_window(Duration::from_secs(600))
            .tolerance(0.05)
            .build()
            .unwrap();

        assert_eq!(policy.min_replicas(), 2);
        assert_eq!(policy.max_replicas(), 10);
        assert_eq!(policy.target_utilization(), 70.0);
        assert_eq!(policy.tolerance(), 0.05);
        assert_eq!(policy.scale_down_window(), chrono::Duration::seconds(600));
    }

    #[test]
    fn defaults() {
        let policy = Policy::new(1, 5, 50.0).unwrap();
        assert_eq!(policy.tolerance(), 0.1);
        assert_eq!(policy.scale_down_window(), chrono::Duration::seconds(300));
    }

    #[test]
    fn rejects_zero_min_replicas() {
        let err = Policy::new(0, 10, 70.0).unwrap_err();
        assert_eq!(err, PolicyError::MinReplicas(0));
        assert!(err.to_string().contains("min_replicas must be greater than 0"));
    }

    #[test]
    fn rejects_max_below_min() {
        let err = Policy::new(5, 2, 70.0).unwrap_err();
        assert_eq!(err, PolicyError::MaxBelowMin { min: 5, max: 2 });
        assert_eq!(
            err.to_string(),
            "max_replicas (2) must be greater than or equal to min_replicas (5)"
        );
    }

    #[test]
    fn min_equal_max_is_valid() {
        assert!(Policy::new(3, 3, 50.0).is_ok());
    }

    #[test]
    fn rejects_target_out_of_range() {
        assert_eq!(
            Policy::new(1, 10, 0.0).unwrap_err(),
            PolicyError::TargetUtilization(0.0)
        );
        assert_eq!(
            Policy::new(1, 10, 101.0).unwrap_err(),
            PolicyError::TargetUtilization(101.0)
        );
        assert!(matches!(
            Policy::new(1, 10, f64::NAN),
            Err(PolicyError::TargetUtilization(_))
        ));
        assert!(Policy::new(1, 10, 1.0).is_ok());
        assert!(Policy::new(1, 10, 100.0).is_ok());
    }

    #[test]
    fn rejects_tolerance_out_of_range() {
        let low = Policy::builder(1, 10, 70.0).tolerance(-0.1).build();
        assert_eq!(low.unwrap_err(), PolicyError::Tolerance(-0.1));

        let high = Policy::builder(1, 10, 70.0).tolerance(1.1).build();
        assert_eq!(high.unwrap_err(), PolicyError::Tolerance(1.1));

        assert!(Policy::builder(1, 10, 70.0).tolerance(0.0).build().is_ok());
        assert!(Policy::builder(1, 10, 70.0).tolerance(1.0).build().is_ok());
    }

    #[test]
    fn first_violation_wins() {
        let err = Policy::builder(0, 0, 500.0).tolerance(5.0).build().unwrap_err();
        assert_eq!(err, PolicyError::MinReplicas(0));
    }

    #[test]
    fn rejects_unrepresentable_window() {
        let err = Policy::builder(1, 10, 50.0)
            .scale_down_window(Duration::from_secs(u64::MAX))
            .build()
            .unwrap_err();
        assert!(matches!(err, PolicyError::Window(_)));
    }

    #[test]
    fn clamp_respects_bounds() {
        let policy = Policy::new(2, 5, 50.0).unwrap();
        assert_eq!(policy.clamp(0), 2);
        assert_eq!(policy.clamp(4), 4);
        assert_eq!(policy.clamp(100), 5);
    }

    #[test]
    fn serializes_window_as_seconds() {
        let policy = Policy::new(1, 5, 50.0).unwrap();
        let json = serde_json::to_value(policy).unwrap();
        assert_eq!(json["scale_down_window_secs"], 300);
        assert_eq!(json["min_replicas"], 1);
    }
}
