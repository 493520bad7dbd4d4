//! Simulation engine — the per-tick scaling decision.
//!
//! Each run owns its own [`StabilizationWindow`] and running replica count,
//! so independent runs never share state.

use tracing::debug;

use shadow_core::{MetricSample, Policy, ReplicaSample};

use crate::stabilization::StabilizationWindow;

/// Replays utilization samples through one policy.
#[derive(Debug)]
pub struct SimulationEngine {
    policy: Policy,
    current_replicas: u32,
    window: StabilizationWindow,
}

impl SimulationEngine {
    /// Start a run at `policy.min_replicas()` with an empty window.
    pub fn new(policy: Policy) -> Self {
        Self {
            current_replicas: policy.min_replicas(),
            policy,
            window: StabilizationWindow::new(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The count decided on the last tick.
    pub fn current_replicas(&self) -> u32 {
        self.current_replicas
    }

    /// The clamped, pre-stabilization recommendation for `utilization`.
    pub fn recommend(&self, utilization: f64) -> u32 {
        let ratio = utilization / self.policy.target_utilization();

        let desired = if (1.0 - ratio).abs() <= self.policy.tolerance() {
            self.current_replicas
        } else {
            // Float-to-int `as` saturates, so absurd ratios land on u32::MAX
            // and are then clamped to max_replicas.
            (f64::from(self.current_replicas) * ratio).ceil() as u32
        };

        self.policy.clamp(desired)
    }

    /// Process one sample. Samples must arrive in chronological order.
    pub fn step(&mut self, sample: &MetricSample) -> ReplicaSample {
        let current = self.current_replicas;
        let raw = self.recommend(sample.utilization);

        // The window always sees the raw value; that is what the rolling
        // maximum is taken over.
        self.window.record(sample.timestamp, raw);

        let decided = if raw > current {
            debug!(
                at = %sample.timestamp,
                from = current,
                to = raw,
                utilization = sample.utilization,
                "scaling up"
            );
            raw
        } else {
            let stabilized = self
                .window
                .stabilized_value(sample.timestamp, self.policy.scale_down_window())
                .unwrap_or(raw);
            let decided = current.min(stabilized);

            if decided < current {
                debug!(
                    at = %sample.timestamp,
                    from = current,
                    to = decided,
                    utilization = sample.utilization,
                    "scaling down"
                );
            } else if raw < current {
                debug!(
                    at = %sample.timestamp,
                    current,
                    raw,
                    stabilized,
                    "scale-down held by stabilization window"
                );
            }
            decided
        };

        self.current_replicas = decided;
        ReplicaSample::new(sample.timestamp, decided)
    }

    /// Process every sample in order, consuming the engine.
    pub fn run<'a, I>(mut self, samples: I) -> Vec<ReplicaSample>
    where
        I: IntoIterator<Item = &'a MetricSample>,
    {
        samples.into_iter().map(|s| self.step(s)).collect()
    }
}

/// Replay `samples` through a fresh engine for `policy`.
///
/// Returns one decision per input sample, in the same order.
pub fn simulate(policy: &Policy, samples: &[MetricSample]) -> Vec<ReplicaSample> {
    let decisions = SimulationEngine::new(*policy).run(samples);
    debug!(
        samples = samples.len(),
        final_replicas = decisions.last().map(|d| d.replicas),
        "simulation complete"
    );
    decisions
}
