use serde::Serialize;

/// Point-in-time view of one statistics cell.
///
/// `min_ns`/`max_ns` are `None` until the first sample. `stddev_ns` is the
/// value from the last `compute_averages`/`compute_stddev` call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSnapshot {
    pub count: u64,
    pub sum_ns: u64,
    pub mean_ns: f64,
    pub min_ns: Option<u64>,
    pub max_ns: Option<u64>,
    pub stddev_ns: f64,
    pub p50_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentSnapshot {
    pub id: String,
    #[serde(flatten)]
    pub stats: StatsSnapshot,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BucketSnapshot {
    /// RFC 3339 wall-clock time of bucket creation or last reset.
    pub started_at: String,
    pub elapsed_ms: u64,
    pub aggregate: StatsSnapshot,
    /// Base64 V2 HDR histogram of the aggregate, if recording is healthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_histogram_b64: Option<String>,
    /// Registration order.
    pub components: Vec<ComponentSnapshot>,
}

impl BucketSnapshot {
    #[must_use]
    pub fn component(&self, id: &str) -> Option<&ComponentSnapshot> {
        self.components.iter().find(|component| component.id == id)
    }
}

/// Latency band of one classified packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyBand {
    Satisfied,
    Tolerated,
    Unsatisfied,
}

/// Counters of one closed reporting interval plus the values derived from
/// them at the moment it closed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IntervalSnapshot {
    /// Sequence number, starting at 1 for the first closed interval.
    pub interval: u64,
    pub total_count: u64,
    pub satisfied_count: u64,
    pub tolerated_count: u64,
    pub unsatisfied_count: u64,
    pub lp_index: f64,
    pub mean_per_interval_ns: f64,
}
