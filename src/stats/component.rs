use std::borrow::Borrow;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::cell::StatsCell;
use super::types::{ComponentSnapshot, StatsSnapshot};

/// Stable identity of a pipeline stage, assigned at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(Arc<str>);

impl ComponentId {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ComponentId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Statistics for a single pipeline stage.
#[derive(Debug)]
pub struct ComponentRecord {
    id: ComponentId,
    cell: Mutex<StatsCell>,
}

impl ComponentRecord {
    #[must_use]
    pub fn new(id: ComponentId) -> Self {
        let cell = Mutex::new(StatsCell::new(id.as_str()));
        Self { id, cell }
    }

    #[must_use]
    pub const fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn record(&self, duration_ns: u64) {
        self.lock().record(duration_ns);
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn compute_stddev(&self) -> f64 {
        self.lock().compute_stddev()
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.lock().stats().count()
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.lock().snapshot()
    }

    #[must_use]
    pub fn snapshot(&self) -> ComponentSnapshot {
        ComponentSnapshot {
            id: self.id.to_string(),
            stats: self.stats(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
