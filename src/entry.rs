use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::run_local;
use crate::args::PerfmonArgs;
use crate::args::defaults::DEFAULT_CONFIG_FILES;
use crate::error::{AppError, AppResult, ValidationError};
use crate::sinks::format_summary;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    apply_config(&mut args, &matches)?;
    crate::logger::init_logging(args.verbose, args.no_color);

    if args.components.is_empty() {
        tracing::error!("No components registered (set --component or provide in config).");
        return Err(AppError::validation(ValidationError::MissingComponents));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(run_local(&args))?;

    println!("{}", format_summary(&outcome.summary, args.output_format)?);

    if !outcome.runtime_errors.is_empty() {
        for error in &outcome.runtime_errors {
            tracing::error!("{}", error);
        }
        return Err(AppError::validation(ValidationError::RuntimeErrors));
    }
    Ok(())
}

fn parse_args() -> AppResult<Option<(PerfmonArgs, ArgMatches)>> {
    let mut cmd = PerfmonArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = PerfmonArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn apply_config(args: &mut PerfmonArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}
