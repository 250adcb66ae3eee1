use std::path::Path;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::info;

use crate::args::PerfmonArgs;
use crate::error::AppResult;
use crate::reporter::{ReporterConfig, spawn_reporter};
use crate::shutdown::{ShutdownSender, setup_signal_shutdown_handler, shutdown_channel};
use crate::simulate::{Pipeline, SimulationConfig, spawn_workers};
use crate::sinks::{ReportSink, RunSummary};
use crate::stats::{SlaClassifier, SlaThresholds, TimeBucket};

pub(crate) struct RunOutcome {
    pub summary: RunSummary,
    pub runtime_errors: Vec<String>,
}

/// Runs the synthetic pipeline against a fresh bucket and classifier until
/// the target duration elapses or shutdown is signalled.
pub(crate) async fn run_local(args: &PerfmonArgs) -> AppResult<RunOutcome> {
    let (shutdown_tx, _) = shutdown_channel();
    let (reporter_stop_tx, _) = shutdown_channel();
    let pipeline = Arc::new(Pipeline::new(&args.components));
    let bucket = Arc::new(TimeBucket::new(pipeline.component_ids())?);
    let thresholds = SlaThresholds::new(args.threshold_ns.get());
    let classifier = Arc::new(SlaClassifier::new(thresholds));

    let sink = match args.output.as_deref() {
        Some(path) => {
            let sink = ReportSink::open(Path::new(path)).await?;
            info!("Appending interval reports to {}", sink.path().display());
            Some(sink)
        }
        None => None,
    };

    info!(
        "Monitoring {} components with {} workers for {:?} (T = {} ns, 4T = {} ns)",
        bucket.num_components(),
        args.workers.get(),
        args.target_duration,
        thresholds.satisfied_ns(),
        thresholds.tolerated_ns()
    );

    let run_start = Instant::now();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let timer_handle = setup_run_timer(args.target_duration, &shutdown_tx);
    let reporter_handle = spawn_reporter(
        ReporterConfig {
            report_interval: args.report_interval,
            bucket_window: args.bucket_window,
            history_max: args.history_max.get(),
        },
        Arc::clone(&classifier),
        Arc::clone(&bucket),
        &reporter_stop_tx,
        sink,
    );
    let worker_handles = spawn_workers(
        SimulationConfig {
            workers: args.workers.get(),
            packets_per_tick: args.packets_per_tick.get(),
            tick_interval: args.tick_interval,
            seed: None,
        },
        &pipeline,
        &classifier,
        &bucket,
        &shutdown_tx,
    );

    let mut runtime_errors = Vec::new();
    let mut packets = 0_u64;
    for (index, handle) in worker_handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(processed)) => packets = packets.saturating_add(processed),
            Ok(Err(err)) => runtime_errors.push(format!("Worker {} failed: {}", index, err)),
            Err(err) => runtime_errors.push(format!("Worker {} task failed: {}", index, err)),
        }
    }
    // Workers can also stop on their own after an error. The reporter stops
    // last so the final partial interval holds every classified packet.
    drop(shutdown_tx.send(()));
    drop(reporter_stop_tx.send(()));

    let report = match reporter_handle.await {
        Ok(report) => report,
        Err(err) => {
            runtime_errors.push(format!("Reporter task failed: {}", err));
            crate::reporter::ReporterReport::default()
        }
    };
    let (signal_result, timer_result) = tokio::join!(signal_handle, timer_handle);
    if let Err(err) = signal_result {
        runtime_errors.push(format!("Signal handler task failed: {}", err));
    }
    if let Err(err) = timer_result {
        runtime_errors.push(format!("Run timer task failed: {}", err));
    }

    bucket.compute_averages();
    let summary = RunSummary::new(
        run_start.elapsed(),
        thresholds,
        &report.intervals,
        report.windows.len(),
        bucket.snapshot(),
    );
    info!(
        "Run finished: {} packets in {:?}",
        packets,
        run_start.elapsed()
    );

    Ok(RunOutcome {
        summary,
        runtime_errors,
    })
}

fn setup_run_timer(
    duration: std::time::Duration,
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            () = tokio::time::sleep(duration) => {
                tracing::debug!("Target duration reached");
                drop(shutdown_tx.send(()));
            }
            _ = shutdown_rx.recv() => {}
        }
    })
}
