use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::defaults::{DEFAULT_COMPONENT_MAX_NS, DEFAULT_COMPONENT_MIN_NS};
use crate::args::{ComponentSpec, PerfmonArgs, PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ComponentConfig, ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments. Values given on the
/// command line take precedence.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut PerfmonArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "components")
        && let Some(components) = config.components.as_ref()
    {
        args.components = parse_components(components)?;
    }

    if !is_cli(matches, "threshold_ns")
        && let Some(threshold) = config.threshold_ns
    {
        args.threshold_ns = ensure_positive_u64(threshold, "threshold_ns")?;
    }

    if !is_cli(matches, "report_interval")
        && let Some(interval) = config.interval.as_ref()
    {
        args.report_interval = to_duration(interval, "interval")?;
    }

    if !is_cli(matches, "bucket_window")
        && let Some(window) = config.bucket_window.as_ref()
    {
        args.bucket_window = Some(to_duration(window, "bucket_window")?);
    }

    if !is_cli(matches, "target_duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.target_duration = to_duration(duration, "duration")?;
    }

    if !is_cli(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = ensure_positive_usize(workers, "workers")?;
    }

    if !is_cli(matches, "packets_per_tick")
        && let Some(packets) = config.packets_per_tick
    {
        args.packets_per_tick = ensure_positive_usize(packets, "packets_per_tick")?;
    }

    if !is_cli(matches, "tick_interval")
        && let Some(tick) = config.tick_interval.as_ref()
    {
        args.tick_interval = to_duration(tick, "tick_interval")?;
    }

    if !is_cli(matches, "history_max")
        && let Some(history_max) = config.history_max
    {
        args.history_max = ensure_positive_usize(history_max, "history_max")?;
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn parse_components(entries: &[ComponentConfig]) -> AppResult<Vec<ComponentSpec>> {
    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        let spec = match entry {
            ComponentConfig::Name(name) => ComponentSpec::with_default_cost(name),
            ComponentConfig::Detailed {
                name,
                min_ns,
                max_ns,
            } => ComponentSpec::new(
                name,
                min_ns.unwrap_or(DEFAULT_COMPONENT_MIN_NS),
                max_ns.unwrap_or(DEFAULT_COMPONENT_MAX_NS),
            ),
        };
        parsed.push(spec.map_err(|err| AppError::config(ConfigError::InvalidComponent { source: err }))?);
    }
    Ok(parsed)
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
