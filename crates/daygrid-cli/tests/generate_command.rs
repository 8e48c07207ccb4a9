//! Tests for `daygrid generate`
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Workbook written (warnings allowed) |
//! | 1 | Invalid config, errors after policy, or a write failure |
//! | 2 | Output file locked |

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn daygrid() -> Command {
    Command::new(env!("CARGO_BIN_EXE_daygrid"))
}

fn run_generate(args: &[&str], output: &Path) -> Output {
    daygrid()
        .arg("generate")
        .args(args)
        .arg("-o")
        .arg(output)
        .output()
        .expect("failed to execute daygrid")
}

const CLEAN_CONFIG: &str = r#"
start_year = 2025
start_month = 11
num_months = 4

[[tasks]]
name = "Winter build"
row_offset = 1
start = "2025-12-01"
end = "2026-01-15"
color = "90EE90"

[[tasks]]
name = "Launch"
row_offset = 2
start = "2026-02-27"
end = "2026-02-28"
label = "GO"
"#;

// =============================================================================
// Default schedule
// =============================================================================

#[test]
fn generate_default_schedule_writes_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.xlsx");

    let output = run_generate(&[], &path);

    assert!(output.status.success(), "{output:?}");
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], b"PK");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote"));

    // Three sample tasks start before May 2025
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("warning[W002]").count(), 3);
    assert!(stderr.contains("info[I001]: placed 4 of 7 task bars over 730 days"));
}

#[test]
fn generate_strict_refuses_to_write_with_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.xlsx");

    let output = run_generate(&["--strict"], &path);

    assert_eq!(output.status.code(), Some(1));
    assert!(!path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[W002]"));
    assert!(stderr.contains("not writing"));
}

#[test]
fn generate_quiet_hides_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.xlsx");

    let output = run_generate(&["--quiet"], &path);

    assert!(output.status.success());
    assert!(path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("W002"));
}

#[test]
fn generate_json_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.xlsx");

    let output = run_generate(&["--format", "json"], &path);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["written"], true);
    assert_eq!(report["tasks"], 7);
    assert_eq!(report["placed"], 4);
    assert_eq!(report["days"], 730);
    let codes: Vec<&str> = report["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["W002", "W002", "W002", "I001"]);
}

// =============================================================================
// Config files
// =============================================================================

#[test]
fn generate_from_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("plan.toml");
    fs::write(&config, CLEAN_CONFIG).unwrap();
    let path = dir.path().join("plan.xlsx");

    let output = run_generate(&[config.to_str().unwrap(), "--strict"], &path);

    assert!(output.status.success(), "{output:?}");
    assert!(path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("warning"));
    assert!(stderr.contains("placed 2 of 2 task bars over 120 days"));
}

#[test]
fn generate_uses_config_output_path() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("plan.toml");
    fs::write(
        &config,
        format!("output = \"from-config.xlsx\"\n{CLEAN_CONFIG}"),
    )
    .unwrap();

    let output = daygrid()
        .current_dir(dir.path())
        .args(["generate", "plan.toml"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    assert!(dir.path().join("from-config.xlsx").exists());
}

#[test]
fn generate_invalid_month_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "start_month = 13\n").unwrap();
    let path = dir.path().join("bad.xlsx");

    let output = run_generate(&[config.to_str().unwrap()], &path);

    assert_eq!(output.status.code(), Some(1));
    assert!(!path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("start_month must be 1-12, got 13"));
}

#[test]
fn generate_missing_config_fails() {
    let dir = tempdir().unwrap();
    let output = run_generate(
        &[dir.path().join("nope.toml").to_str().unwrap()],
        &dir.path().join("x.xlsx"),
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read config"));
}

#[test]
fn generate_into_directory_is_write_failure() {
    let dir = tempdir().unwrap();

    let output = run_generate(&["--quiet"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to write"));
}
