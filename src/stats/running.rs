use super::types::StatsSnapshot;

/// Online count/sum/sum-of-squares accumulator over nanosecond durations.
///
/// `min` and `max` start at sentinels (`u64::MAX` / `u64::MIN`) so the first
/// sample always replaces both; the accessors hide the sentinels behind
/// `Option` until at least one sample has been recorded.
#[derive(Debug, Clone)]
pub struct RunningStats {
    count: u64,
    sum_ns: u64,
    sum_squared_ns: u128,
    min_ns: u64,
    max_ns: u64,
    mean_ns: f64,
    stddev_ns: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            sum_ns: 0,
            sum_squared_ns: 0,
            min_ns: u64::MAX,
            max_ns: u64::MIN,
            mean_ns: 0.0,
            stddev_ns: 0.0,
        }
    }

    pub fn record(&mut self, duration_ns: u64) {
        self.count = self.count.saturating_add(1);
        self.sum_ns = self.sum_ns.saturating_add(duration_ns);
        let wide = u128::from(duration_ns);
        self.sum_squared_ns = self
            .sum_squared_ns
            .saturating_add(wide.saturating_mul(wide));
        self.mean_ns = mean(self.sum_ns, self.count);
        if duration_ns < self.min_ns {
            self.min_ns = duration_ns;
        }
        if duration_ns > self.max_ns {
            self.max_ns = duration_ns;
        }
    }

    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Recomputes the population standard deviation from the running sums.
    ///
    /// Returns `0.0` when no samples have been recorded.
    pub fn compute_stddev(&mut self) -> f64 {
        self.stddev_ns = stddev(self.sum_ns, self.sum_squared_ns, self.count);
        self.stddev_ns
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn sum_ns(&self) -> u64 {
        self.sum_ns
    }

    #[must_use]
    pub const fn sum_squared_ns(&self) -> u128 {
        self.sum_squared_ns
    }

    #[must_use]
    pub const fn mean_ns(&self) -> f64 {
        self.mean_ns
    }

    /// Last value produced by [`RunningStats::compute_stddev`].
    #[must_use]
    pub const fn stddev_ns(&self) -> f64 {
        self.stddev_ns
    }

    #[must_use]
    pub const fn min_ns(&self) -> Option<u64> {
        if self.count == 0 {
            None
        } else {
            Some(self.min_ns)
        }
    }

    #[must_use]
    pub const fn max_ns(&self) -> Option<u64> {
        if self.count == 0 {
            None
        } else {
            Some(self.max_ns)
        }
    }

    #[must_use]
    pub const fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            count: self.count,
            sum_ns: self.sum_ns,
            mean_ns: self.mean_ns,
            min_ns: self.min_ns(),
            max_ns: self.max_ns(),
            stddev_ns: self.stddev_ns,
            p50_ns: 0,
            p90_ns: 0,
            p99_ns: 0,
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "mean is reported as a fractional nanosecond value"
)]
fn mean(sum_ns: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum_ns as f64 / count as f64
}

#[expect(
    clippy::float_arithmetic,
    reason = "variance needs fractional intermediate values"
)]
pub(crate) fn stddev(sum_ns: u64, sum_squared_ns: u128, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    // n * sum_sq - sum^2 is exact in integers while it fits in u128.
    let exact_numerator = u128::from(count)
        .checked_mul(sum_squared_ns)
        .zip(u128::from(sum_ns).checked_mul(u128::from(sum_ns)))
        .map(|(scaled, squared_sum)| scaled.saturating_sub(squared_sum));
    let variance = match exact_numerator {
        Some(0) => return 0.0,
        Some(numerator) => numerator as f64 / n / n,
        None => {
            let sum = sum_ns as f64;
            (sum_squared_ns as f64 - sum * sum / n) / n
        }
    };
    // Cancellation in the wide fallback can push a zero variance negative.
    if variance.is_finite() && variance > 0.0 {
        variance.sqrt()
    } else {
        0.0
    }
}
