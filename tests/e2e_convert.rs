// eps2svg - tests/e2e_convert.rs
//
// End-to-end tests for the discovery -> mapping -> conversion pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, and a
// real child process: a small shell script stands in for Inkscape, copying
// its input to the `--export-filename=` target and logging every call.
// The binary tests run the built `eps2svg` executable to check exit codes
// and stdout.

#![cfg(unix)]

use eps2svg::app::convert::{plan_run, run_conversion, RunOptions};
use eps2svg::core::discovery::DiscoveryConfig;
use eps2svg::platform::converter::InkscapeConverter;
use eps2svg::util::error::{ConverterError, Eps2SvgError};
use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Stub converter. Appends each input path to `calls.log` next to itself,
/// exits 7 for any input whose name contains "corrupt".
fn stub_converter(dir: &Path) -> PathBuf {
    let path = dir.join("inkscape");
    let log = dir.join("calls.log");
    let script = format!(
        r#"#!/bin/sh
echo "$1" >> "{log}"
case "$1" in *corrupt*) echo "stub: cannot read $1" >&2; exit 7;; esac
out=""
for a in "$@"; do
  case "$a" in --export-filename=*) out="${{a#--export-filename=}}";; esac
done
[ -n "$out" ] || exit 2
printf '<svg xmlns="http://www.w3.org/2000/svg"><!-- %s --></svg>\n' "$1" > "$out"
"#,
        log = log.display()
    );
    fs::write(&path, script).expect("write stub");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub");
    path
}

fn calls(tool_dir: &Path) -> Vec<String> {
    fs::read_to_string(tool_dir.join("calls.log"))
        .map(|s| s.lines().map(String::from).collect())
        .unwrap_or_default()
}

/// Source tree:
///   cover.eps
///   notes.txt
///   figures/chart.EPS
///   figures/maps/region.eps
///   figures/maps/region.pdf
fn source_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    let maps = root.join("figures").join("maps");
    fs::create_dir_all(&maps).unwrap();
    fs::write(root.join("cover.eps"), "%!PS-Adobe-3.0 EPSF-3.0\n").unwrap();
    fs::write(root.join("notes.txt"), "not a figure\n").unwrap();
    fs::write(root.join("figures").join("chart.EPS"), "%!PS-Adobe-3.0 EPSF-3.0\n").unwrap();
    fs::write(maps.join("region.eps"), "%!PS-Adobe-3.0 EPSF-3.0\n").unwrap();
    fs::write(maps.join("region.pdf"), "%PDF-1.4\n").unwrap();
    dir
}

/// Run the built binary with an isolated config and PATH.
fn run_bin(args: &[&OsStr], path_var: &Path, config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eps2svg"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("PATH", path_var)
        .env_remove("EPS2SVG_CONVERTER")
        .env_remove("RUST_LOG")
        .output()
        .expect("run eps2svg")
}

fn empty_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, "").unwrap();
    path
}

// =============================================================================
// Library pipeline
// =============================================================================

/// Every EPS file yields an SVG at the mirrored path with the same base name.
#[test]
fn e2e_mirrors_tree_with_same_base_names() {
    let src = source_tree();
    let tools = tempfile::tempdir().unwrap();
    let converter = InkscapeConverter::new(stub_converter(tools.path()), false);
    let out = tempfile::tempdir().unwrap();

    let plan = plan_run(src.path(), out.path(), &DiscoveryConfig::default()).unwrap();
    let summary = run_conversion(&plan, &converter, RunOptions::default(), |_| {}).unwrap();

    assert_eq!(summary.converted, 3);
    assert!(out.path().join("cover.svg").is_file());
    assert!(out.path().join("figures").join("chart.svg").is_file());
    assert!(out.path().join("figures").join("maps").join("region.svg").is_file());

    // Nothing else was produced.
    assert!(!out.path().join("notes.svg").exists());
    assert!(!out.path().join("figures").join("maps").join("region.pdf").exists());

    // Source tree untouched.
    assert!(src.path().join("cover.eps").is_file());
    assert!(!src.path().join("SVG").exists());
}

/// Calls happen in sorted discovery order, one per file.
#[test]
fn e2e_converter_called_once_per_file_in_order() {
    let src = source_tree();
    let tools = tempfile::tempdir().unwrap();
    let converter = InkscapeConverter::new(stub_converter(tools.path()), false);
    let out = src.path().join("SVG");

    let plan = plan_run(src.path(), &out, &DiscoveryConfig::default()).unwrap();
    run_conversion(&plan, &converter, RunOptions::default(), |_| {}).unwrap();

    let seen = calls(tools.path());
    let expected: Vec<String> = [
        src.path().join("cover.eps"),
        src.path().join("figures").join("chart.EPS"),
        src.path().join("figures").join("maps").join("region.eps"),
    ]
    .iter()
    .map(|p| p.display().to_string())
    .collect();
    assert_eq!(seen, expected);
}

/// A failing conversion ends the run; later files are not attempted and the
/// converter's exit status is preserved.
#[test]
fn e2e_fail_fast_on_converter_error() {
    let src = source_tree();
    fs::write(src.path().join("figures").join("corrupt.eps"), "garbage").unwrap();
    let tools = tempfile::tempdir().unwrap();
    let converter = InkscapeConverter::new(stub_converter(tools.path()), false);
    let out = tempfile::tempdir().unwrap();

    let plan = plan_run(src.path(), out.path(), &DiscoveryConfig::default()).unwrap();
    let result = run_conversion(&plan, &converter, RunOptions::default(), |_| {});

    match result {
        Err(Eps2SvgError::Converter(ConverterError::Failed { status, input })) => {
            assert_eq!(status.code(), Some(7));
            assert!(input.ends_with("figures/corrupt.eps"));
        }
        other => panic!("expected converter failure, got {other:?}"),
    }
    // cover.eps, figures/chart.EPS, figures/corrupt.eps; maps/region.eps never runs.
    assert_eq!(calls(tools.path()).len(), 3);
    assert!(!out.path().join("figures").join("maps").exists());
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn e2e_binary_default_output_is_source_svg() {
    let src = source_tree();
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = empty_config(tools.path());

    let output = run_bin(&[src.path().as_os_str()], tools.path(), &config);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let svg = src.path().join("SVG");
    assert!(svg.join("cover.svg").is_file());
    assert!(svg.join("figures").join("maps").join("region.svg").is_file());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[3/3]"), "stdout: {stdout}");
    assert!(stdout.contains("Done: 3 converted, 0 skipped"), "stdout: {stdout}");
}

#[test]
fn e2e_binary_explicit_output_dir() {
    let src = source_tree();
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("vectors");
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = empty_config(tools.path());

    let output = run_bin(
        &[src.path().as_os_str(), target.as_os_str()],
        tools.path(),
        &config,
    );

    assert!(output.status.success());
    assert!(target.join("figures").join("chart.svg").is_file());
    assert!(!src.path().join("SVG").exists());
}

/// Zero matching files: zero conversions, exit 0.
#[test]
fn e2e_binary_no_matches_succeeds() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("readme.md"), "nothing to convert").unwrap();
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = empty_config(tools.path());

    let output = run_bin(&[src.path().as_os_str()], tools.path(), &config);

    assert!(output.status.success());
    assert!(calls(tools.path()).is_empty());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Done: 0 converted"), "stdout: {stdout}");
}

/// Converter absent: abort, nothing written, exit 127.
#[test]
fn e2e_binary_missing_converter_aborts_without_output() {
    let src = source_tree();
    let tools = tempfile::tempdir().unwrap();
    let config = empty_config(tools.path());
    let missing = tools.path().join("inkscape");

    let output = run_bin(
        &[src.path().as_os_str(), OsStr::new("--converter"), missing.as_os_str()],
        tools.path(),
        &config,
    );

    assert_eq!(output.status.code(), Some(127));
    assert!(output.stdout.is_empty(), "stdout should be empty");
    assert!(!src.path().join("SVG").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not executable"), "stderr: {stderr}");
}

/// Same abort when the converter named by the environment is missing.
#[test]
fn e2e_binary_missing_env_converter_aborts() {
    let src = source_tree();
    let tools = tempfile::tempdir().unwrap();
    let config = empty_config(tools.path());

    let output = Command::new(env!("CARGO_BIN_EXE_eps2svg"))
        .arg("--config")
        .arg(&config)
        .arg(src.path())
        .env("PATH", tools.path())
        .env("EPS2SVG_CONVERTER", tools.path().join("gone"))
        .output()
        .expect("run eps2svg");

    assert_eq!(output.status.code(), Some(127));
    assert!(!src.path().join("SVG").exists());
}

/// A conversion failure surfaces the converter's own exit code.
#[test]
fn e2e_binary_propagates_converter_exit_code() {
    let src = source_tree();
    fs::write(src.path().join("a_corrupt.eps"), "garbage").unwrap();
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = empty_config(tools.path());

    let output = run_bin(&[src.path().as_os_str()], tools.path(), &config);

    assert_eq!(output.status.code(), Some(7));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stub: cannot read"), "converter stderr passes through: {stderr}");
    assert_eq!(calls(tools.path()).len(), 1);
}

#[test]
fn e2e_binary_dry_run_and_report() {
    let src = source_tree();
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = empty_config(tools.path());
    let report = tools.path().join("report.json");

    let output = run_bin(
        &[
            src.path().as_os_str(),
            OsStr::new("--dry-run"),
            OsStr::new("--report"),
            report.as_os_str(),
        ],
        tools.path(),
        &config,
    );

    assert!(output.status.success());
    assert!(calls(tools.path()).is_empty());
    assert!(!src.path().join("SVG").exists());

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["dry_run"], true);
    assert_eq!(value["planned"], 3);
    assert_eq!(value["converted"], 0);
}

#[test]
fn e2e_binary_skip_existing() {
    let src = source_tree();
    let svg = src.path().join("SVG");
    fs::create_dir_all(&svg).unwrap();
    fs::write(svg.join("cover.svg"), "keep me").unwrap();
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = empty_config(tools.path());

    let output = run_bin(
        &[src.path().as_os_str(), OsStr::new("--skip-existing")],
        tools.path(),
        &config,
    );

    assert!(output.status.success());
    assert_eq!(fs::read_to_string(svg.join("cover.svg")).unwrap(), "keep me");
    assert_eq!(calls(tools.path()).len(), 2);
}

#[test]
fn e2e_binary_config_sets_output_dir_name() {
    let src = source_tree();
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = tools.path().join("custom.toml");
    fs::write(&config, "[output]\ndir_name = \"vectors\"\n").unwrap();

    let output = run_bin(&[src.path().as_os_str()], tools.path(), &config);

    assert!(output.status.success());
    assert!(src.path().join("vectors").join("cover.svg").is_file());
}

#[test]
fn e2e_binary_missing_source_fails() {
    let tools = tempfile::tempdir().unwrap();
    stub_converter(tools.path());
    let config = empty_config(tools.path());
    let missing = tools.path().join("no-such-dir");

    let output = run_bin(&[missing.as_os_str()], tools.path(), &config);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}
