//! Periodic driver: closes SLA intervals and bucket windows on a timer.
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::error::AppResult;
use crate::shutdown::ShutdownSender;
use crate::sinks::ReportSink;
use crate::stats::{BucketSnapshot, IntervalSnapshot, SlaClassifier, TimeBucket};


const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy)]
pub struct ReporterConfig {
    pub report_interval: Duration,
    /// Roll the bucket over at this cadence; `None` keeps one cumulative window.
    pub bucket_window: Option<Duration>,
    /// Snapshots retained per kind; older ones are dropped first.
    pub history_max: usize,
}

/// Snapshots collected by the reporter, oldest first.
#[derive(Debug, Default)]
pub struct ReporterReport {
    pub intervals: Vec<IntervalSnapshot>,
    pub windows: Vec<BucketSnapshot>,
}

struct ReporterState {
    history_max: usize,
    intervals: VecDeque<IntervalSnapshot>,
    windows: VecDeque<BucketSnapshot>,
    sink: Option<ReportSink>,
    last_sink_error: Option<String>,
}

impl ReporterState {
    fn new(history_max: usize, sink: Option<ReportSink>) -> Self {
        Self {
            history_max: history_max.max(1),
            intervals: VecDeque::new(),
            windows: VecDeque::new(),
            sink,
            last_sink_error: None,
        }
    }

    async fn close_interval(&mut self, classifier: &SlaClassifier) {
        let snapshot = classifier.reset_interval();
        tracing::info!(
            "{} interval #{}: {} packets (satisfied {}, tolerated {}, unsatisfied {}) LPIndex {:.4}, mean {:.1} ns",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            snapshot.interval,
            snapshot.total_count,
            snapshot.satisfied_count,
            snapshot.tolerated_count,
            snapshot.unsatisfied_count,
            snapshot.lp_index,
            snapshot.mean_per_interval_ns
        );
        if let Some(sink) = self.sink.as_mut() {
            let result = sink.write_interval(&snapshot).await;
            self.note_sink_result(result);
        }
        push_bounded(&mut self.intervals, snapshot, self.history_max);
    }

    async fn close_window(&mut self, bucket: &TimeBucket) {
        let snapshot = bucket.rollover();
        tracing::info!(
            "{} window since {} closed: {} packets, mean {:.1} ns, stddev {:.1} ns",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            snapshot.started_at,
            snapshot.aggregate.count,
            snapshot.aggregate.mean_ns,
            snapshot.aggregate.stddev_ns
        );
        if let Some(sink) = self.sink.as_mut() {
            let result = sink.write_window(&snapshot).await;
            self.note_sink_result(result);
        }
        push_bounded(&mut self.windows, snapshot, self.history_max);
    }

    fn note_sink_result(&mut self, result: AppResult<()>) {
        match result {
            Ok(()) => self.last_sink_error = None,
            Err(err) => {
                let message = err.to_string();
                if self.last_sink_error.as_deref() != Some(message.as_str()) {
                    tracing::warn!("Report sink write failed: {}", message);
                    self.last_sink_error = Some(message);
                }
            }
        }
    }

    fn into_report(self) -> ReporterReport {
        ReporterReport {
            intervals: self.intervals.into(),
            windows: self.windows.into(),
        }
    }
}

fn push_bounded<T>(history: &mut VecDeque<T>, item: T, max: usize) {
    while history.len() >= max {
        if history.pop_front().is_none() {
            break;
        }
    }
    history.push_back(item);
}

fn periodic(period: Duration) -> Interval {
    let start = Instant::now()
        .checked_add(period)
        .unwrap_or_else(Instant::now);
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn tick_optional(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Spawns the reporter task.
///
/// Every `report_interval` the classifier interval is closed; every
/// `bucket_window` the bucket is rolled over. Both snapshots are logged and
/// written to `sink` when one is given. On shutdown a partial interval that
/// saw traffic is closed once more, and the collected snapshots are returned.
#[must_use]
pub fn spawn_reporter(
    config: ReporterConfig,
    classifier: Arc<SlaClassifier>,
    bucket: Arc<TimeBucket>,
    shutdown_tx: &ShutdownSender,
    sink: Option<ReportSink>,
) -> JoinHandle<ReporterReport> {
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut state = ReporterState::new(config.history_max, sink);
        let mut report_tick = periodic(config.report_interval);
        let mut window_tick = config.bucket_window.map(periodic);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = report_tick.tick() => state.close_interval(&classifier).await,
                () = tick_optional(window_tick.as_mut()) => state.close_window(&bucket).await,
            }
        }

        if classifier.total_count() > 0 {
            state.close_interval(&classifier).await;
        }
        tracing::debug!(
            "Reporter stopped after {} intervals and {} windows",
            state.intervals.len(),
            state.windows.len()
        );
        state.into_report()
    })
}
