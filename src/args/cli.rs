use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_bool_env, parse_component, parse_duration_arg, parse_positive_u64, parse_positive_usize,
};
use super::types::{ComponentSpec, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Packet pipeline performance monitor - per-stage latency buckets, running statistics, and a per-interval Latency Performance Index over a synthetic packet pipeline."
)]
pub struct PerfmonArgs {
    /// Pipeline component, as 'name' or 'name=min_ns-max_ns' (repeatable, registration order)
    #[arg(long = "component", short = 'c', value_parser = parse_component)]
    pub components: Vec<ComponentSpec>,

    /// Satisfied latency threshold T in nanoseconds (tolerated up to 4T)
    #[arg(long = "threshold-ns", default_value = "25000", value_parser = parse_positive_u64)]
    pub threshold_ns: PositiveU64,

    /// SLA reporting interval (supports ms/s/m/h)
    #[arg(long = "interval", short = 'i', default_value = "1s", value_parser = parse_duration_arg)]
    pub report_interval: Duration,

    /// Roll the bucket over into a new measurement window at this cadence (supports ms/s/m/h)
    #[arg(long = "bucket-window", value_parser = parse_duration_arg)]
    pub bucket_window: Option<Duration>,

    /// Run duration (supports ms/s/m/h)
    #[arg(long = "duration", short = 't', default_value = "10s", value_parser = parse_duration_arg)]
    pub target_duration: Duration,

    /// Number of concurrent packet-processing workers
    #[arg(long = "workers", short = 'w', default_value = "4", value_parser = parse_positive_usize)]
    pub workers: PositiveUsize,

    /// Packets each worker pushes through the pipeline per tick
    #[arg(long = "packets-per-tick", default_value = "100", value_parser = parse_positive_usize)]
    pub packets_per_tick: PositiveUsize,

    /// Worker tick interval (supports ms/s/m/h)
    #[arg(long = "tick-interval", default_value = "10ms", value_parser = parse_duration_arg)]
    pub tick_interval: Duration,

    /// Number of interval snapshots kept in memory for the final report
    #[arg(long = "history-max", default_value = "3600", value_parser = parse_positive_usize)]
    pub history_max: PositiveUsize,

    /// Append interval and window snapshots as JSON lines to this file
    #[arg(long = "output", short = 'o')]
    pub output: Option<String>,

    /// Final summary format
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Enable verbose logging (sets log level to debug unless overridden by PERFMON_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./perfmon.toml or ./perfmon.json if present.
    #[arg(long)]
    pub config: Option<String>,
}
