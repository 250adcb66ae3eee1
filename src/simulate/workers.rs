use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::AppResult;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::stats::{SlaClassifier, TimeBucket};

use super::Pipeline;

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub workers: usize,
    pub packets_per_tick: usize,
    pub tick_interval: Duration,
    /// Base seed; worker `n` uses `seed + n`. Entropy-seeded when `None`.
    pub seed: Option<u64>,
}

fn worker_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => {
            let offset = u64::try_from(index).unwrap_or(u64::MAX);
            StdRng::seed_from_u64(seed.wrapping_add(offset))
        }
        None => StdRng::from_entropy(),
    }
}

/// Spawns `config.workers` tasks that each push `packets_per_tick` packets
/// every `tick_interval` until shutdown. Each handle resolves to the number
/// of packets that worker processed. A failing worker signals shutdown so
/// the rest of the run stops with it.
#[must_use]
pub fn spawn_workers(
    config: SimulationConfig,
    pipeline: &Arc<Pipeline>,
    classifier: &Arc<SlaClassifier>,
    bucket: &Arc<TimeBucket>,
    shutdown_tx: &ShutdownSender,
) -> Vec<JoinHandle<AppResult<u64>>> {
    (0..config.workers)
        .map(|index| {
            let pipeline = Arc::clone(pipeline);
            let classifier = Arc::clone(classifier);
            let bucket = Arc::clone(bucket);
            let shutdown_tx = shutdown_tx.clone();
            let shutdown_rx = shutdown_tx.subscribe();
            let rng = worker_rng(config.seed, index);

            tokio::spawn(async move {
                let result = run_worker(
                    config,
                    &pipeline,
                    &classifier,
                    &bucket,
                    shutdown_rx,
                    rng,
                )
                .await;
                match result.as_ref() {
                    Ok(processed) => {
                        tracing::debug!("Worker {} processed {} packets", index, processed);
                    }
                    Err(err) => {
                        tracing::error!("Worker {} failed: {}", index, err);
                        drop(shutdown_tx.send(()));
                    }
                }
                result
            })
        })
        .collect()
}

async fn run_worker(
    config: SimulationConfig,
    pipeline: &Pipeline,
    classifier: &SlaClassifier,
    bucket: &TimeBucket,
    mut shutdown_rx: ShutdownReceiver,
    mut rng: StdRng,
) -> AppResult<u64> {
    let mut tick = tokio::time::interval(config.tick_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut processed = 0_u64;
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = tick.tick() => {
                for _ in 0..config.packets_per_tick {
                    pipeline.process_packet(&mut rng, bucket, classifier)?;
                    processed = processed.saturating_add(1);
                }
            }
        }
    }
    Ok(processed)
}
