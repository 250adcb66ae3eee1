use std::path::Path;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{ComponentSpec, PerfmonArgs, PositiveU64, parse_component, parse_duration_value};
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult, ConfigError};
use crate::stats::{BucketSnapshot, IntervalSnapshot, SlaClassifier, SlaThresholds, TimeBucket};

thread_local! {
    static BASE_MATCHES: ArgMatches = PerfmonArgs::command().get_matches_from(["perfmon"]);
}

const FUZZ_COMPONENTS: [&str; 3] = ["parser", "router", "egress"];

/// Parses a duration value (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_value_input(input: &str) -> AppResult<Duration> {
    parse_duration_value(input).map_err(AppError::from)
}

/// Parses a `name` or `name=min-max` component argument.
///
/// # Errors
///
/// Returns an error when the component is malformed.
pub fn parse_component_input(input: &str) -> AppResult<ComponentSpec> {
    parse_component(input).map_err(AppError::from)
}

/// Parses a positive u64 string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_u64_input(input: &str) -> AppResult<u64> {
    let value: PositiveU64 = input.parse()?;
    Ok(value.get())
}

/// Parses TOML config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<PerfmonArgs> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: Path::new("fuzz.toml").to_path_buf(),
            source: err,
        })
    })?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<PerfmonArgs> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

/// Records `(component selector, duration)` pairs into a fixed three-stage
/// bucket and returns the rolled-over window.
///
/// # Errors
///
/// Returns an error when the bucket cannot be built.
pub fn record_bucket_input(samples: &[(u8, u64)]) -> AppResult<BucketSnapshot> {
    let bucket = TimeBucket::new(FUZZ_COMPONENTS)?;
    for &(selector, duration_ns) in samples {
        let id = FUZZ_COMPONENTS
            .get(usize::from(selector & 0b11))
            .copied()
            .unwrap_or("unregistered");
        drop(bucket.record_for_component(id, duration_ns));
    }
    Ok(bucket.rollover())
}

/// Classifies every duration against `threshold_ns` and closes the interval.
#[must_use]
pub fn classify_input(threshold_ns: u64, durations: &[u64]) -> IntervalSnapshot {
    let classifier = SlaClassifier::new(SlaThresholds::new(threshold_ns));
    for &duration_ns in durations {
        classifier.classify(duration_ns);
    }
    classifier.reset_interval()
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<PerfmonArgs> {
    BASE_MATCHES.with(|matches| {
        let mut args = PerfmonArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(args)
    })
}
