//! shadow-core — types shared by every Shadow HPA crate.
//!
//! Holds the validated autoscaling [`Policy`], the sample types that flow
//! through a replay, duration parsing, and the `shadow.toml` config file.

pub mod config;
pub mod duration;
pub mod error;
pub mod policy;
pub mod types;

pub use config::ShadowConfig;
pub use duration::parse_duration;
pub use error::{ConfigError, DurationParseError, PolicyError, SeriesError};
pub use policy::{Policy, PolicyBuilder};
pub use types::*;
