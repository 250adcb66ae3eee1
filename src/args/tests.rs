use super::*;
use crate::args::parsers::{parse_bool_env, parse_duration_arg};
use crate::error::{AppError, AppResult, ValidationError};
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> AppResult<PerfmonArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    PerfmonArgs::try_parse_from(args).map_err(AppError::from)
}

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["perfmon"])?;

    let expected_no_color = std::env::var("NO_COLOR")
        .ok()
        .and_then(|value| parse_bool_env(&value).ok())
        .unwrap_or(false);

    let checks = [
        (args.components.is_empty(), "Expected no components"),
        (args.threshold_ns.get() == 25_000, "Unexpected threshold"),
        (
            args.report_interval == Duration::from_secs(1),
            "Unexpected report interval",
        ),
        (args.bucket_window.is_none(), "Expected no bucket window"),
        (
            args.target_duration == Duration::from_secs(10),
            "Unexpected duration",
        ),
        (args.workers.get() == 4, "Unexpected workers"),
        (args.packets_per_tick.get() == 100, "Unexpected packets per tick"),
        (
            args.tick_interval == Duration::from_millis(10),
            "Unexpected tick interval",
        ),
        (args.history_max.get() == 3600, "Unexpected history max"),
        (args.output.is_none(), "Expected no output"),
        (
            args.output_format == OutputFormat::Text,
            "Expected text output",
        ),
        (!args.verbose, "Expected verbose to be false"),
        (args.no_color == expected_no_color, "Unexpected no_color"),
        (args.config.is_none(), "Expected no config"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn parse_args_components_keep_order() -> AppResult<()> {
    let args = parse_test_args([
        "perfmon",
        "-c",
        "parser",
        "--component",
        "router=500-9000",
        "-c",
        "egress",
    ])?;
    let names: Vec<&str> = args
        .components
        .iter()
        .map(|component| component.name.as_str())
        .collect();
    if names != ["parser", "router", "egress"] {
        return Err(AppError::validation(format!("Unexpected order {:?}", names)));
    }
    let router = args
        .components
        .get(1)
        .ok_or_else(|| AppError::validation("Missing router"))?;
    if router.min_ns != 500 || router.max_ns != 9_000 {
        return Err(AppError::validation(format!(
            "Unexpected router range {:?}",
            router
        )));
    }
    Ok(())
}

#[test]
fn parse_args_overrides() -> AppResult<()> {
    let args = parse_test_args([
        "perfmon",
        "--threshold-ns",
        "50000",
        "-i",
        "250ms",
        "--bucket-window",
        "1m",
        "-t",
        "2s",
        "-w",
        "2",
        "--output-format",
        "JSON",
        "-o",
        "report.jsonl",
    ])?;
    if args.threshold_ns.get() != 50_000
        || args.report_interval != Duration::from_millis(250)
        || args.bucket_window != Some(Duration::from_secs(60))
        || args.target_duration != Duration::from_secs(2)
        || args.workers.get() != 2
        || args.output_format != OutputFormat::Json
        || args.output.as_deref() != Some("report.jsonl")
    {
        return Err(AppError::validation(format!("Unexpected args {:?}", args)));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_values() -> AppResult<()> {
    for args in [
        ["perfmon", "--threshold-ns", "0"],
        ["perfmon", "--workers", "0"],
        ["perfmon", "--interval", "0s"],
    ] {
        if parse_test_args(args).is_ok() {
            return Err(AppError::validation(format!(
                "Expected {:?} to be rejected",
                args
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_component_forms() -> AppResult<()> {
    let plain = parse_component("parser")?;
    if plain != ComponentSpec::with_default_cost("parser")? {
        return Err(AppError::validation(format!("Unexpected {:?}", plain)));
    }

    match parse_component("router=9000-500") {
        Err(ValidationError::InvalidCostRange { min_ns, max_ns, .. })
            if min_ns == 9_000 && max_ns == 500 => {}
        other => {
            return Err(AppError::validation(format!(
                "Expected inverted range error, got {:?}",
                other
            )));
        }
    }
    if !matches!(
        parse_component("router=fast"),
        Err(ValidationError::InvalidComponentFormat { .. })
    ) {
        return Err(AppError::validation("Expected format error"));
    }
    if !matches!(
        parse_component("router=1-x"),
        Err(ValidationError::InvalidComponentCost { .. })
    ) {
        return Err(AppError::validation("Expected cost error"));
    }
    if !matches!(
        parse_component("  =1-2"),
        Err(ValidationError::ComponentNameEmpty)
    ) {
        return Err(AppError::validation("Expected empty name error"));
    }
    Ok(())
}

#[test]
fn parse_duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("3", Duration::from_secs(3)),
        ("3s", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "{} parsed as {:?}, expected {:?}",
                input, parsed, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_errors() -> AppResult<()> {
    let checks = [
        matches!(parse_duration_value(""), Err(ValidationError::DurationEmpty)),
        matches!(
            parse_duration_value("ms"),
            Err(ValidationError::InvalidDurationFormat { .. })
        ),
        matches!(
            parse_duration_value("5d"),
            Err(ValidationError::InvalidDurationUnit { .. })
        ),
        matches!(parse_duration_value("0ms"), Err(ValidationError::DurationZero)),
        matches!(
            parse_duration_value("18446744073709551615h"),
            Err(ValidationError::DurationOverflow)
        ),
    ];
    if checks.iter().all(|ok| *ok) {
        Ok(())
    } else {
        Err(AppError::validation(format!("Unexpected results {:?}", checks)))
    }
}

#[test]
fn parse_bool_env_values() -> AppResult<()> {
    for value in ["1", "true", "YES", "on"] {
        if !parse_bool_env(value)? {
            return Err(AppError::validation(format!("Expected {} to be true", value)));
        }
    }
    for value in ["0", "false", "No", "off"] {
        if parse_bool_env(value)? {
            return Err(AppError::validation(format!("Expected {} to be false", value)));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err(AppError::validation("Expected invalid boolean"));
    }
    Ok(())
}
