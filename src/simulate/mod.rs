//! Synthetic packet pipeline used to drive the monitor.
mod pipeline;
mod workers;


pub use pipeline::{Pipeline, Stage};
pub use workers::{SimulationConfig, spawn_workers};
