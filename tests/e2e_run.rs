mod support;

use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use support::{expect_success, f64_at, parse_summary, run_perfmon, u64_at};

const TOLERANCE: f64 = 1e-9;

fn component_ids(summary: &Value) -> Vec<String> {
    summary
        .get("bucket")
        .and_then(|bucket| bucket.get("components"))
        .and_then(Value::as_array)
        .map(|components| {
            components
                .iter()
                .filter_map(|component| component.get("id").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn e2e_json_summary_and_report_file() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_path = dir.path().join("report.jsonl");
    let report_arg = report_path.to_string_lossy().into_owned();

    let output = run_perfmon(
        dir.path(),
        [
            "-c",
            "parser=1000-2000",
            "-c",
            "router=3000-4000",
            "-t",
            "500ms",
            "-i",
            "100ms",
            "-w",
            "2",
            "--packets-per-tick",
            "10",
            "--tick-interval",
            "10ms",
            "--output-format",
            "json",
            "-o",
            report_arg.as_str(),
        ],
    )?;
    expect_success(&output)?;
    let summary = parse_summary(&output)?;

    if component_ids(&summary) != ["parser", "router"] {
        return Err(format!("Unexpected components: {}", summary));
    }
    let classified = u64_at(&summary, &["classified_packets"]).unwrap_or(0);
    if classified == 0 {
        return Err(format!("Expected classified packets: {}", summary));
    }
    let aggregate = u64_at(&summary, &["bucket", "aggregate", "count"]).unwrap_or(0);
    if aggregate != classified.saturating_mul(2) {
        return Err(format!(
            "Aggregate count {} does not match {} packets over two stages",
            aggregate, classified
        ));
    }
    let lp = f64_at(&summary, &["overall_lp_index"]).unwrap_or(0.0);
    if (lp - 1.0).abs() > TOLERANCE {
        return Err(format!("Expected every packet satisfied, LPIndex {}", lp));
    }

    let report = fs::read_to_string(&report_path)
        .map_err(|err| format!("read report failed: {}", err))?;
    let intervals = report
        .lines()
        .filter(|line| line.contains("\"kind\":\"interval\""))
        .count();
    if intervals == 0 {
        return Err(format!("Expected interval lines in report: {}", report));
    }
    Ok(())
}

#[test]
fn e2e_unsatisfied_packets_score_zero() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_perfmon(
        dir.path(),
        [
            "-c",
            "slow=1000-1000",
            "--threshold-ns",
            "100",
            "-t",
            "300ms",
            "-i",
            "50ms",
            "-w",
            "1",
            "--output-format",
            "json",
        ],
    )?;
    expect_success(&output)?;
    let summary = parse_summary(&output)?;

    let lp = f64_at(&summary, &["overall_lp_index"]).unwrap_or(1.0);
    if lp.abs() > TOLERANCE {
        return Err(format!("Expected LPIndex 0, got {}", lp));
    }
    if u64_at(&summary, &["tolerated_threshold_ns"]) != Some(400) {
        return Err(format!("Unexpected thresholds: {}", summary));
    }
    if u64_at(&summary, &["bucket", "aggregate", "min_ns"]) != Some(1_000) {
        return Err(format!("Unexpected aggregate: {}", summary));
    }
    Ok(())
}

#[test]
fn e2e_default_config_file_is_used() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = r#"
duration = "300ms"
interval = "100ms"
workers = 1
output_format = "json"
bucket_window = "100ms"

components = [
    "ingress",
    { name = "egress", min_ns = 10, max_ns = 20 },
]
"#;
    fs::write(dir.path().join("perfmon.toml"), config)
        .map_err(|err| format!("write config failed: {}", err))?;

    let no_args: [&str; 0] = [];
    let output = run_perfmon(dir.path(), no_args)?;
    expect_success(&output)?;
    let summary = parse_summary(&output)?;

    if component_ids(&summary) != ["ingress", "egress"] {
        return Err(format!("Config components not applied: {}", summary));
    }
    if u64_at(&summary, &["windows_closed"]).unwrap_or(0) == 0 {
        return Err(format!("Expected bucket windows to roll over: {}", summary));
    }
    Ok(())
}

#[test]
fn e2e_text_summary() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_perfmon(
        dir.path(),
        ["-c", "parser", "-t", "200ms", "-i", "50ms", "-w", "1"],
    )?;
    expect_success(&output)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    for needle in ["Run summary", "Overall LPIndex", "aggregate", "parser"] {
        if !stdout.contains(needle) {
            return Err(format!("Missing '{}' in summary:\n{}", needle, stdout));
        }
    }
    Ok(())
}

#[test]
fn e2e_requires_components() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_perfmon(dir.path(), ["-t", "100ms"])?;
    if output.status.success() {
        return Err("Expected failure without components".to_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("component") {
        return Err(format!("Unexpected stderr: {}", stderr));
    }
    Ok(())
}

#[test]
fn e2e_rejects_inverted_cost_range() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_perfmon(dir.path(), ["-c", "router=9000-10"])?;
    if output.status.success() {
        return Err("Expected inverted cost range to be rejected".to_owned());
    }
    Ok(())
}
