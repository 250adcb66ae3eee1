use super::{
    apply_config, load_config_file,
    types::{ComponentConfig, ConfigFile, DurationValue},
};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{OutputFormat, PerfmonArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

fn args_from(argv: &[&str]) -> AppResult<(PerfmonArgs, clap::ArgMatches)> {
    let matches = PerfmonArgs::command().try_get_matches_from(argv)?;
    let args = PerfmonArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config_with_components() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("perfmon.toml");
    let content = r#"
threshold_ns = 40000
interval = "500ms"
duration = 3
workers = 2

components = [
    "parser",
    { name = "router", min_ns = 500, max_ns = 9000 },
]
"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    if config.threshold_ns != Some(40_000) {
        return Err(AppError::validation("Unexpected threshold"));
    }
    let components = config
        .components
        .ok_or_else(|| AppError::validation("Expected components"))?;
    match components.as_slice() {
        [
            ComponentConfig::Name(first),
            ComponentConfig::Detailed {
                name,
                min_ns: Some(500),
                max_ns: Some(9_000),
            },
        ] if first == "parser" && name == "router" => {}
        other => {
            return Err(AppError::validation(format!(
                "Unexpected components {:?}",
                other
            )));
        }
    }
    if !matches!(config.duration, Some(DurationValue::Seconds(3))) {
        return Err(AppError::validation("Expected numeric duration"));
    }
    Ok(())
}

#[test]
fn parse_json_config_with_aliases() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("perfmon.json");
    let content = r#"{
        "components": ["ingress", "egress"],
        "satisfied_threshold_ns": 1000,
        "report_interval": "2s",
        "output_format": "json"
    }"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    if config.threshold_ns != Some(1_000) {
        return Err(AppError::validation("Alias threshold not applied"));
    }
    if !matches!(config.interval, Some(DurationValue::Text(ref text)) if text == "2s") {
        return Err(AppError::validation("Alias interval not applied"));
    }
    if config.output_format != Some(OutputFormat::Json) {
        return Err(AppError::validation("Unexpected output format"));
    }
    Ok(())
}

#[test]
fn load_config_rejects_unknown_fields_and_extensions() -> AppResult<()> {
    let dir = tempdir()?;
    let unknown = dir.path().join("perfmon.toml");
    std::fs::write(&unknown, "workers = 2\nurl = \"http://localhost\"\n")?;
    if !matches!(
        load_config_file(&unknown),
        Err(AppError::Config(ConfigError::ParseToml { .. }))
    ) {
        return Err(AppError::validation("Expected unknown field rejection"));
    }

    let yaml = dir.path().join("perfmon.yaml");
    std::fs::write(&yaml, "workers: 2\n")?;
    if !matches!(
        load_config_file(&yaml),
        Err(AppError::Config(ConfigError::UnsupportedExtension { .. }))
    ) {
        return Err(AppError::validation("Expected unsupported extension"));
    }

    let bare = dir.path().join("perfmon");
    std::fs::write(&bare, "workers = 2\n")?;
    if !matches!(
        load_config_file(&bare),
        Err(AppError::Config(ConfigError::MissingExtension))
    ) {
        return Err(AppError::validation("Expected missing extension"));
    }
    Ok(())
}

#[test]
fn apply_config_fills_unset_args() -> AppResult<()> {
    let config = ConfigFile {
        components: Some(vec![
            ComponentConfig::Name("parser".to_owned()),
            ComponentConfig::Detailed {
                name: "router".to_owned(),
                min_ns: Some(100),
                max_ns: None,
            },
        ]),
        threshold_ns: Some(10_000),
        interval: Some(DurationValue::Text("250ms".to_owned())),
        bucket_window: Some(DurationValue::Seconds(30)),
        workers: Some(8),
        history_max: Some(10),
        output_format: Some(OutputFormat::Json),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&["perfmon"])?;

    apply_config(&mut args, &matches, &config)?;

    let names: Vec<&str> = args
        .components
        .iter()
        .map(|component| component.name.as_str())
        .collect();
    if names != ["parser", "router"] {
        return Err(AppError::validation(format!("Unexpected components {:?}", names)));
    }
    let router = args
        .components
        .get(1)
        .ok_or_else(|| AppError::validation("Missing router"))?;
    if router.min_ns != 100 || router.max_ns != crate::args::defaults::DEFAULT_COMPONENT_MAX_NS {
        return Err(AppError::validation(format!("Unexpected router {:?}", router)));
    }
    if args.threshold_ns.get() != 10_000
        || args.report_interval != Duration::from_millis(250)
        || args.bucket_window != Some(Duration::from_secs(30))
        || args.workers.get() != 8
        || args.history_max.get() != 10
        || args.output_format != OutputFormat::Json
    {
        return Err(AppError::validation(format!("Unexpected args {:?}", args)));
    }
    Ok(())
}

#[test]
fn apply_config_keeps_cli_values() -> AppResult<()> {
    let config = ConfigFile {
        components: Some(vec![ComponentConfig::Name("from-config".to_owned())]),
        workers: Some(8),
        duration: Some(DurationValue::Seconds(60)),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&["perfmon", "-c", "from-cli", "-w", "3"])?;

    apply_config(&mut args, &matches, &config)?;

    let names: Vec<&str> = args
        .components
        .iter()
        .map(|component| component.name.as_str())
        .collect();
    if names != ["from-cli"] {
        return Err(AppError::validation(format!("CLI components replaced: {:?}", names)));
    }
    if args.workers.get() != 3 {
        return Err(AppError::validation("CLI workers replaced"));
    }
    if args.target_duration != Duration::from_secs(60) {
        return Err(AppError::validation("Config duration not applied"));
    }
    Ok(())
}

#[test]
fn apply_config_rejects_invalid_values() -> AppResult<()> {
    let cases = [
        ConfigFile {
            workers: Some(0),
            ..ConfigFile::default()
        },
        ConfigFile {
            interval: Some(DurationValue::Seconds(0)),
            ..ConfigFile::default()
        },
        ConfigFile {
            tick_interval: Some(DurationValue::Text("soon".to_owned())),
            ..ConfigFile::default()
        },
        ConfigFile {
            components: Some(vec![ComponentConfig::Detailed {
                name: "router".to_owned(),
                min_ns: Some(10),
                max_ns: Some(1),
            }]),
            ..ConfigFile::default()
        },
    ];
    for config in cases {
        let (mut args, matches) = args_from(&["perfmon"])?;
        if apply_config(&mut args, &matches, &config).is_ok() {
            return Err(AppError::validation(format!(
                "Expected {:?} to be rejected",
                config
            )));
        }
    }
    Ok(())
}

#[test]
fn duration_value_rejects_zero_seconds() -> AppResult<()> {
    match DurationValue::Seconds(0).to_duration() {
        Err(ValidationError::DurationZero) => Ok(()),
        other => Err(AppError::validation(format!("Unexpected {:?}", other))),
    }
}
