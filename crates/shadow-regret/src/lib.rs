//! shadow-regret — what a replayed scaling trajectory would have cost.
//!
//! Three independent metrics over completed sequences:
//!
//! ```text
//! integrated_replica_hours       Σ replicas[i] · (t[i+1] - t[i])            hours
//! wasted_replica_minutes         Σ max(0, actual - simulated) · Δt          minutes
//! under_provisioning_risk_minutes  time above target within the lookahead
//!                                  after every scale-down                   minutes
//! ```
//!
//! All integrals are step functions that stop at the last sample: the final
//! point contributes nothing.

pub mod analyzer;
pub mod report;

pub use analyzer::{
    integrated_replica_hours, scale_down_events, under_provisioning_risk_minutes,
    wasted_replica_minutes, DEFAULT_RISK_LOOKAHEAD,
};
pub use report::{format_report, RegretReport};
