use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::BucketError;

use super::cell::StatsCell;
use super::component::{ComponentId, ComponentRecord};
use super::types::{BucketSnapshot, ComponentSnapshot, StatsSnapshot};

const AGGREGATE_SCOPE: &str = "aggregate";

#[derive(Debug, Clone, Copy)]
struct WindowClock {
    started: Instant,
    started_at: DateTime<Utc>,
}

impl WindowClock {
    fn now() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

/// Cumulative per-window statistics for every registered pipeline stage.
///
/// Component membership is fixed at construction. Writers hold the window
/// lock shared while they update a component and the aggregate, so
/// [`TimeBucket::reset`], [`TimeBucket::compute_averages`] and
/// [`TimeBucket::snapshot`] (which hold it exclusively) always observe both
/// halves of a measurement or neither.
///
/// Every per-component measurement also counts toward the aggregate. The
/// aggregate count equals the number of packets only when the driver records
/// exactly one stage per packet; keeping that relation is up to the caller.
#[derive(Debug)]
pub struct TimeBucket {
    window: RwLock<WindowClock>,
    aggregate: Mutex<StatsCell>,
    components: Vec<ComponentRecord>,
    index: HashMap<ComponentId, usize>,
}

impl TimeBucket {
    /// Creates a bucket with one record per component id, in order.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::DuplicateComponent`] if an id appears twice.
    pub fn new<I, S>(ids: I) -> Result<Self, BucketError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ComponentId>,
    {
        let mut components = Vec::new();
        let mut index = HashMap::new();
        for id in ids {
            let id = id.into();
            if index.contains_key(&id) {
                return Err(BucketError::DuplicateComponent { id: id.to_string() });
            }
            index.insert(id.clone(), components.len());
            components.push(ComponentRecord::new(id));
        }

        Ok(Self {
            window: RwLock::new(WindowClock::now()),
            aggregate: Mutex::new(StatsCell::new(AGGREGATE_SCOPE)),
            components,
            index,
        })
    }

    /// Records one stage's processing time into its record and the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::UnknownComponent`] if `id` was not registered;
    /// nothing is recorded in that case.
    pub fn record_for_component(&self, id: &str, duration_ns: u64) -> Result<(), BucketError> {
        let record = self.component(id).ok_or_else(|| BucketError::UnknownComponent {
            id: id.to_owned(),
        })?;
        let _window = self.read_window();
        record.record(duration_ns);
        self.lock_aggregate().record(duration_ns);
        Ok(())
    }

    /// Starts a new measurement window: clears every statistic and restarts
    /// the clock.
    pub fn reset(&self) {
        let mut window = self.write_window();
        self.reset_locked(&mut window);
    }

    /// Recomputes the standard deviation of the aggregate and of every
    /// component. Call after the writes of a window and before reporting.
    pub fn compute_averages(&self) {
        let _window = self.write_window();
        self.compute_averages_locked();
    }

    /// Consistent snapshot of the current window.
    #[must_use]
    pub fn snapshot(&self) -> BucketSnapshot {
        let window = self.write_window();
        self.snapshot_locked(&window)
    }

    /// Finalizes, snapshots and resets the window in one exclusive step.
    #[must_use]
    pub fn rollover(&self) -> BucketSnapshot {
        let mut window = self.write_window();
        self.compute_averages_locked();
        let closed = self.snapshot_locked(&window);
        self.reset_locked(&mut window);
        closed
    }

    #[must_use]
    pub fn component(&self, id: &str) -> Option<&ComponentRecord> {
        self.index
            .get(id)
            .and_then(|&position| self.components.get(position))
    }

    /// Per-component statistics in registration order.
    #[must_use]
    pub fn components(&self) -> Vec<ComponentSnapshot> {
        self.components
            .iter()
            .map(ComponentRecord::snapshot)
            .collect()
    }

    pub fn component_ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.iter().map(ComponentRecord::id)
    }

    #[must_use]
    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn aggregate(&self) -> StatsSnapshot {
        self.lock_aggregate().snapshot()
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.lock_aggregate().stats().count()
    }

    #[must_use]
    pub fn mean_ns(&self) -> f64 {
        self.lock_aggregate().stats().mean_ns()
    }

    #[must_use]
    pub fn min_ns(&self) -> Option<u64> {
        self.lock_aggregate().stats().min_ns()
    }

    #[must_use]
    pub fn max_ns(&self) -> Option<u64> {
        self.lock_aggregate().stats().max_ns()
    }

    #[must_use]
    pub fn stddev_ns(&self) -> f64 {
        self.lock_aggregate().stats().stddev_ns()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.read_window().started_at
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.read_window().started.elapsed()
    }

    fn reset_locked(&self, window: &mut WindowClock) {
        self.lock_aggregate().reset();
        for record in &self.components {
            record.reset();
        }
        *window = WindowClock::now();
        tracing::debug!(
            components = self.components.len(),
            "Bucket reset, new window started"
        );
    }

    fn compute_averages_locked(&self) {
        self.lock_aggregate().compute_stddev();
        for record in &self.components {
            record.compute_stddev();
        }
    }

    fn snapshot_locked(&self, window: &WindowClock) -> BucketSnapshot {
        let (aggregate, aggregate_histogram_b64) = {
            let cell = self.lock_aggregate();
            (cell.snapshot(), cell.encode_histogram())
        };
        BucketSnapshot {
            started_at: window.started_at.to_rfc3339(),
            elapsed_ms: u64::try_from(window.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            aggregate,
            aggregate_histogram_b64,
            components: self.components(),
        }
    }

    fn read_window(&self) -> RwLockReadGuard<'_, WindowClock> {
        self.window.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_window(&self) -> RwLockWriteGuard<'_, WindowClock> {
        self.window.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_aggregate(&self) -> MutexGuard<'_, StatsCell> {
        self.aggregate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
