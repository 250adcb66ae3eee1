use std::time::Duration;

use serde::Serialize;

use crate::args::OutputFormat;
use crate::error::{AppError, AppResult, SinkError};
use crate::stats::{BucketSnapshot, IntervalSnapshot, SlaThresholds, StatsSnapshot, lp_index};

use super::format::{format_optional_ns, write_line};

/// End-of-run report printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub duration_ms: u64,
    pub satisfied_threshold_ns: u64,
    pub tolerated_threshold_ns: u64,
    /// Packets classified across every retained interval.
    pub classified_packets: u64,
    /// LPIndex over the counters of every retained interval.
    pub overall_lp_index: f64,
    pub intervals_reported: usize,
    pub windows_closed: usize,
    pub last_interval: Option<IntervalSnapshot>,
    pub bucket: BucketSnapshot,
}

impl RunSummary {
    #[must_use]
    pub fn new(
        elapsed: Duration,
        thresholds: SlaThresholds,
        intervals: &[IntervalSnapshot],
        windows_closed: usize,
        bucket: BucketSnapshot,
    ) -> Self {
        let (satisfied, tolerated, total) =
            intervals
                .iter()
                .fold((0_u64, 0_u64, 0_u64), |(satisfied, tolerated, total), item| {
                    (
                        satisfied.saturating_add(item.satisfied_count),
                        tolerated.saturating_add(item.tolerated_count),
                        total.saturating_add(item.total_count),
                    )
                });
        Self {
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            satisfied_threshold_ns: thresholds.satisfied_ns(),
            tolerated_threshold_ns: thresholds.tolerated_ns(),
            classified_packets: total,
            overall_lp_index: lp_index(satisfied, tolerated, total),
            intervals_reported: intervals.len(),
            windows_closed,
            last_interval: intervals.last().cloned(),
            bucket,
        }
    }
}

/// Renders the summary in the requested format.
///
/// # Errors
///
/// Returns an error when JSON serialization or text formatting fails.
pub fn format_summary(summary: &RunSummary, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary).map_err(|err| {
            AppError::sink(SinkError::Serialize {
                context: "run summary",
                source: err,
            })
        }),
        OutputFormat::Text => format_text(summary),
    }
}

fn format_text(summary: &RunSummary) -> AppResult<String> {
    let mut output = String::new();
    write_line(&mut output, "Run summary")?;
    write_line(
        &mut output,
        &format!(
            "  Duration:           {:.2}s",
            Duration::from_millis(summary.duration_ms).as_secs_f64()
        ),
    )?;
    write_line(
        &mut output,
        &format!(
            "  Thresholds:         satisfied <= {} ns, tolerated <= {} ns",
            summary.satisfied_threshold_ns, summary.tolerated_threshold_ns
        ),
    )?;
    write_line(
        &mut output,
        &format!("  Packets classified: {}", summary.classified_packets),
    )?;
    write_line(
        &mut output,
        &format!(
            "  Intervals:          {} (windows closed: {})",
            summary.intervals_reported, summary.windows_closed
        ),
    )?;
    write_line(
        &mut output,
        &format!("  Overall LPIndex:    {:.4}", summary.overall_lp_index),
    )?;
    if let Some(last) = summary.last_interval.as_ref() {
        write_line(
            &mut output,
            &format!(
                "  Last interval #{}:  total {}, satisfied {}, tolerated {}, unsatisfied {}, LPIndex {:.4}, mean {:.1} ns",
                last.interval,
                last.total_count,
                last.satisfied_count,
                last.tolerated_count,
                last.unsatisfied_count,
                last.lp_index,
                last.mean_per_interval_ns
            ),
        )?;
    }

    write_line(&mut output, "")?;
    write_line(
        &mut output,
        &format!(
            "Bucket since {} ({} ms)",
            summary.bucket.started_at, summary.bucket.elapsed_ms
        ),
    )?;
    write_line(
        &mut output,
        &format!(
            "  {:<16} {:>10} {:>12} {:>12} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "stage", "count", "mean_ns", "stddev_ns", "min_ns", "max_ns", "p50_ns", "p90_ns", "p99_ns"
        ),
    )?;
    write_line(&mut output, &stats_row("aggregate", &summary.bucket.aggregate))?;
    for component in &summary.bucket.components {
        write_line(&mut output, &stats_row(&component.id, &component.stats))?;
    }
    Ok(output)
}

fn stats_row(label: &str, stats: &StatsSnapshot) -> String {
    format!(
        "  {:<16} {:>10} {:>12.1} {:>12.1} {:>10} {:>10} {:>10} {:>10} {:>10}",
        label,
        stats.count,
        stats.mean_ns,
        stats.stddev_ns,
        format_optional_ns(stats.min_ns),
        format_optional_ns(stats.max_ns),
        stats.p50_ns,
        stats.p90_ns,
        stats.p99_ns
    )
}
