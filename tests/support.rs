use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

/// Runs the `perfmon` binary in `workdir` so no stray default config is
/// picked up from the repository root.
///
/// # Errors
///
/// Returns an error if the binary path is unknown or the process fails to
/// start.
pub fn run_perfmon<I, S>(workdir: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = perfmon_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(workdir)
        .env("PERFMON_LOG", "error")
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR")
        .output()
        .map_err(|err| format!("run perfmon failed: {}", err))
}

fn perfmon_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_perfmon").map_or_else(
        || Err("CARGO_BIN_EXE_perfmon missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

/// Fails with both output streams when the process did not exit cleanly.
///
/// # Errors
///
/// Returns an error describing stdout/stderr on a non-zero exit.
pub fn expect_success(output: &Output) -> Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    Err(format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    ))
}

/// Parses the JSON summary printed on stdout.
///
/// # Errors
///
/// Returns an error when stdout is not a JSON document.
pub fn parse_summary(output: &Output) -> Result<Value, String> {
    serde_json::from_slice(&output.stdout).map_err(|err| {
        format!(
            "summary is not JSON ({}): {}",
            err,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

pub fn u64_at(value: &Value, path: &[&str]) -> Option<u64> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_u64)
}

pub fn f64_at(value: &Value, path: &[&str]) -> Option<f64> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_f64)
}
