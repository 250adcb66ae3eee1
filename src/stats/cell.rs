use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use hdrhistogram::Histogram;
use hdrhistogram::serialization::{Serializer, V2Serializer};

use super::running::RunningStats;
use super::types::StatsSnapshot;

const HISTOGRAM_SIGFIG: u8 = 3;

/// Running statistics plus an HDR histogram for percentiles.
///
/// A histogram error disables percentile tracking for the rest of the
/// cell's life; the running statistics keep going.
#[derive(Debug)]
pub(crate) struct StatsCell {
    scope: String,
    stats: RunningStats,
    histogram: Option<Histogram<u64>>,
}

impl StatsCell {
    pub(crate) fn new(scope: &str) -> Self {
        let histogram = match Histogram::<u64>::new(HISTOGRAM_SIGFIG) {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                tracing::warn!("Failed to initialize histogram for '{}': {}", scope, err);
                None
            }
        };
        Self {
            scope: scope.to_owned(),
            stats: RunningStats::new(),
            histogram,
        }
    }

    pub(crate) fn record(&mut self, duration_ns: u64) {
        self.stats.record(duration_ns);
        if let Some(histogram) = self.histogram.as_mut()
            && let Err(err) = histogram.record(duration_ns)
        {
            tracing::warn!(
                "Disabling histogram for '{}' after error: {}",
                self.scope,
                err
            );
            self.histogram = None;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.stats.reset();
        if let Some(histogram) = self.histogram.as_mut() {
            histogram.reset();
        }
    }

    pub(crate) fn compute_stddev(&mut self) -> f64 {
        self.stats.compute_stddev()
    }

    pub(crate) const fn stats(&self) -> &RunningStats {
        &self.stats
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        let mut snapshot = self.stats.snapshot();
        if let Some(histogram) = self.histogram.as_ref()
            && !histogram.is_empty()
        {
            snapshot.p50_ns = histogram.value_at_quantile(0.5);
            snapshot.p90_ns = histogram.value_at_quantile(0.9);
            snapshot.p99_ns = histogram.value_at_quantile(0.99);
        }
        snapshot
    }

    pub(crate) fn encode_histogram(&self) -> Option<String> {
        let histogram = self.histogram.as_ref()?;
        let mut buffer = Vec::new();
        match V2Serializer::new().serialize(histogram, &mut buffer) {
            Ok(_) => Some(B64.encode(buffer)),
            Err(err) => {
                tracing::warn!("Failed to serialize histogram for '{}': {}", self.scope, err);
                None
            }
        }
    }
}
