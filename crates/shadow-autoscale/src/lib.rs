//! shadow-autoscale — offline replay of an HPA-style control loop.
//!
//! Turns a time-ordered stream of utilization samples into the replica
//! counts the control loop would have chosen.
//!
//! # Scaling Algorithm
//!
//! ```text
//! ratio = utilization / target_utilization
//!
//! if |1 - ratio| <= tolerance:
//!     raw = current                      // dead-zone
//! else:
//!     raw = ceil(current * ratio)
//! raw = clamp(raw, min_replicas, max_replicas)
//! window.record(now, raw)
//!
//! if raw > current:
//!     decided = raw                      // scale up immediately
//! else:
//!     decided = min(current, window.max(now - scale_down_window ..= now))
//! ```
//!
//! The stabilization window keeps scale-down conservative: the count only
//! shrinks to the highest recommendation still inside the window.

pub mod engine;
pub mod stabilization;

pub use engine::{simulate, SimulationEngine};
pub use stabilization::StabilizationWindow;
