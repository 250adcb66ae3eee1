use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::types::{IntervalSnapshot, LatencyBand};

/// Default satisfied threshold `T` in nanoseconds.
pub const DEFAULT_SATISFIED_THRESHOLD_NS: u64 = 25_000;
const TOLERATED_MULTIPLIER: u64 = 4;

/// Band edges: `d <= T` satisfied, `T < d <= 4T` tolerated, `d > 4T`
/// unsatisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaThresholds {
    satisfied_ns: u64,
    tolerated_ns: u64,
}

impl Default for SlaThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_SATISFIED_THRESHOLD_NS)
    }
}

impl SlaThresholds {
    #[must_use]
    pub const fn new(satisfied_ns: u64) -> Self {
        Self {
            satisfied_ns,
            tolerated_ns: satisfied_ns.saturating_mul(TOLERATED_MULTIPLIER),
        }
    }

    #[must_use]
    pub const fn satisfied_ns(&self) -> u64 {
        self.satisfied_ns
    }

    #[must_use]
    pub const fn tolerated_ns(&self) -> u64 {
        self.tolerated_ns
    }

    #[must_use]
    pub const fn band(&self, duration_ns: u64) -> LatencyBand {
        if duration_ns <= self.satisfied_ns {
            LatencyBand::Satisfied
        } else if duration_ns <= self.tolerated_ns {
            LatencyBand::Tolerated
        } else {
            LatencyBand::Unsatisfied
        }
    }
}

/// Process-wide latency classifier and Latency Performance Index.
///
/// Created once in the composition root and shared by `Arc` with every
/// recording site. Counters accumulate until [`SlaClassifier::reset_interval`]
/// drains them; the last LPIndex and mean are kept for readers between
/// intervals.
///
/// The total is not a counter of its own: it is the sum of the three band
/// counters, so every snapshot satisfies
/// `satisfied + tolerated + unsatisfied == total`. Each counter is drained
/// with its own atomic swap, so no classification is lost or counted twice.
/// A classification that races the reset can have its band and its duration
/// land in adjacent intervals, which only shifts the mean.
#[derive(Debug)]
pub struct SlaClassifier {
    thresholds: SlaThresholds,
    satisfied: AtomicU64,
    tolerated: AtomicU64,
    unsatisfied: AtomicU64,
    sum_ns: AtomicU64,
    lp_index_bits: AtomicU64,
    mean_bits: AtomicU64,
    intervals: AtomicU64,
    last_snapshot: Mutex<Option<IntervalSnapshot>>,
}

impl Default for SlaClassifier {
    fn default() -> Self {
        Self::new(SlaThresholds::default())
    }
}

impl SlaClassifier {
    #[must_use]
    pub fn new(thresholds: SlaThresholds) -> Self {
        Self {
            thresholds,
            satisfied: AtomicU64::new(0),
            tolerated: AtomicU64::new(0),
            unsatisfied: AtomicU64::new(0),
            sum_ns: AtomicU64::new(0),
            lp_index_bits: AtomicU64::new(1.0_f64.to_bits()),
            mean_bits: AtomicU64::new(0.0_f64.to_bits()),
            intervals: AtomicU64::new(0),
            last_snapshot: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn thresholds(&self) -> SlaThresholds {
        self.thresholds
    }

    /// Classifies one packet by its end-to-end processing time.
    pub fn classify(&self, total_ns: u64) -> LatencyBand {
        let band = self.thresholds.band(total_ns);
        let counter = match band {
            LatencyBand::Satisfied => &self.satisfied,
            LatencyBand::Tolerated => &self.tolerated,
            LatencyBand::Unsatisfied => &self.unsatisfied,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        // The closure never returns `None`, so the update cannot fail.
        drop(
            self.sum_ns
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |sum| {
                    Some(sum.saturating_add(total_ns))
                }),
        );
        band
    }

    /// Recomputes LPIndex from the running interval counters and retains it.
    ///
    /// An interval without traffic scores `1.0`.
    pub fn compute_lp_index(&self) -> f64 {
        let value = lp_index(
            self.satisfied.load(Ordering::Relaxed),
            self.tolerated.load(Ordering::Relaxed),
            self.total_count(),
        );
        self.lp_index_bits.store(value.to_bits(), Ordering::Relaxed);
        value
    }

    /// Recomputes the mean packet time of the running interval and retains it.
    pub fn compute_mean_per_interval(&self) -> f64 {
        let value = mean_per_interval(
            self.sum_ns.load(Ordering::Relaxed),
            self.total_count(),
        );
        self.mean_bits.store(value.to_bits(), Ordering::Relaxed);
        value
    }

    /// Closes the running interval: drains the counters, derives LPIndex and
    /// mean from the drained values, retains both and returns the snapshot.
    pub fn reset_interval(&self) -> IntervalSnapshot {
        let satisfied_count = self.satisfied.swap(0, Ordering::AcqRel);
        let tolerated_count = self.tolerated.swap(0, Ordering::AcqRel);
        let unsatisfied_count = self.unsatisfied.swap(0, Ordering::AcqRel);
        let sum_ns = self.sum_ns.swap(0, Ordering::AcqRel);
        let total_count = band_total(satisfied_count, tolerated_count, unsatisfied_count);

        let lp = lp_index(satisfied_count, tolerated_count, total_count);
        let mean = mean_per_interval(sum_ns, total_count);
        self.lp_index_bits.store(lp.to_bits(), Ordering::Relaxed);
        self.mean_bits.store(mean.to_bits(), Ordering::Relaxed);

        let interval = self
            .intervals
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1);
        let snapshot = IntervalSnapshot {
            interval,
            total_count,
            satisfied_count,
            tolerated_count,
            unsatisfied_count,
            lp_index: lp,
            mean_per_interval_ns: mean,
        };
        *self
            .last_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        snapshot
    }

    /// Last snapshot returned by [`SlaClassifier::reset_interval`].
    #[must_use]
    pub fn last_snapshot(&self) -> Option<IntervalSnapshot> {
        self.last_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last computed LPIndex (retained across interval resets).
    #[must_use]
    pub fn lp_index(&self) -> f64 {
        f64::from_bits(self.lp_index_bits.load(Ordering::Relaxed))
    }

    /// Last computed mean packet time (retained across interval resets).
    #[must_use]
    pub fn mean_per_interval(&self) -> f64 {
        f64::from_bits(self.mean_bits.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn satisfied_count(&self) -> u64 {
        self.satisfied.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn tolerated_count(&self) -> u64 {
        self.tolerated.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn unsatisfied_count(&self) -> u64 {
        self.unsatisfied.load(Ordering::Relaxed)
    }

    /// Sum of the three band counters of the running interval.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        band_total(
            self.satisfied.load(Ordering::Relaxed),
            self.tolerated.load(Ordering::Relaxed),
            self.unsatisfied.load(Ordering::Relaxed),
        )
    }
}

const fn band_total(satisfied: u64, tolerated: u64, unsatisfied: u64) -> u64 {
    satisfied.saturating_add(tolerated).saturating_add(unsatisfied)
}

/// `(satisfied + tolerated / 2) / total`, clamped to `[0, 1]`; `1.0` when
/// `total` is zero.
#[expect(
    clippy::float_arithmetic,
    reason = "LPIndex is a weighted ratio in [0, 1]"
)]
#[must_use]
pub fn lp_index(satisfied: u64, tolerated: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    let score = (satisfied as f64 + 0.5 * tolerated as f64) / total as f64;
    score.clamp(0.0, 1.0)
}

#[expect(
    clippy::float_arithmetic,
    reason = "mean is reported as a fractional nanosecond value"
)]
fn mean_per_interval(sum_ns: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    sum_ns as f64 / total as f64
}
