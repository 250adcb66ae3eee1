//! Core library for the `perfmon` CLI.
//!
//! The statistics core lives in [`stats`]: the running-statistics primitive,
//! per-stage component records, the cumulative [`stats::TimeBucket`] and the
//! [`stats::SlaClassifier`] with its Latency Performance Index. The remaining
//! modules drive it from the binary: CLI and config types, the periodic
//! reporter, the synthetic packet pipeline and report sinks.
pub mod args;
pub mod config;
pub mod error;
pub mod reporter;
pub mod shutdown;
pub mod simulate;
pub mod sinks;
pub mod stats;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
