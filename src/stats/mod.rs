//! Online latency statistics: running-stats primitive, per-stage component
//! records, the cumulative time bucket and the SLA classifier.
mod bucket;
mod cell;
mod component;
mod running;
mod sla;
mod types;


pub use bucket::TimeBucket;
pub use component::{ComponentId, ComponentRecord};
pub use running::RunningStats;
pub use sla::{DEFAULT_SATISFIED_THRESHOLD_NS, SlaClassifier, SlaThresholds, lp_index};
pub use types::{BucketSnapshot, ComponentSnapshot, IntervalSnapshot, LatencyBand, StatsSnapshot};
