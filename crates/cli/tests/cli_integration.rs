//! CLI integration tests for the `variants` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout
//! content, and stderr content. Generation tests pass `--formatter true` so
//! they do not depend on a Go toolchain being installed.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn variants() -> Command {
    cargo_bin_cmd!("variants")
}

const SAMPLE: &str = "\
job\tvariant\textended
job-b\tv2\tupgrade-minor
job-a\tv1\tparallel,csi
";

/// Temp dir holding `variants.tsv` with the given content.
fn fixture(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("variants.tsv");
    fs::write(&input, content).expect("write fixture");
    (dir, input)
}

fn out_path(dir: &TempDir) -> PathBuf {
    dir.path().join("zz_generated.variants.go")
}

fn path_arg(p: &Path) -> &str {
    p.to_str().expect("utf-8 temp path")
}

// ──────────────────────────────────────────────
// 1. Help, version and usage errors
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    variants()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate the test-grid Go variant map",
        ))
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--message-format <MESSAGE_FORMAT>"));
}

#[test]
fn bare_format_flag_is_rejected() {
    variants()
        .args(["--input", "in.tsv", "--output", "o.go", "--format", "json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unexpected argument '--format'"));
}

#[test]
fn version_exits_0() {
    variants()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("variants"));
}

#[test]
fn missing_input_flag_exits_1_with_usage() {
    variants()
        .args(["--output", "out.go"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input file is required"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn missing_output_flag_exits_1_with_usage() {
    variants()
        .args(["--input", "in.tsv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Output file is required"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn no_flags_reports_input_first() {
    variants()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input file is required"));
}

#[test]
fn unknown_flag_exits_1() {
    variants()
        .args(["--input", "a", "--output", "b", "--bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}

// ──────────────────────────────────────────────
// 2. Generation
// ──────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn generate_writes_sorted_go_map() {
    let (dir, input) = fixture(SAMPLE);
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--formatter", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Go file generated: {}",
            output.display()
        )));

    let src = fs::read_to_string(&output).expect("output written");
    assert!(src.contains("package generated"));
    assert!(src.contains("import\t\"github.com/bertinatto/testgrid/internal\""));
    assert!(src.contains("var Variants = map[string]internal.Variant{"));
    let a = src.find("\"job-a\"").expect("job-a present");
    let b = src.find("\"job-b\"").expect("job-b present");
    assert!(a < b, "entries must be sorted by job name");
    assert!(src.contains(
        "\"job-a\": {\n\tName: \"v1\",\n\tParallel: true,\n\tCSI: true,\n\tUpgradeFromPrevious: false,\n\tUpgradeFromCurrent: false,\n\tSerial: false,\n},"
    ));
    assert!(src.contains(
        "\"job-b\": {\n\tName: \"v2\",\n\tParallel: false,\n\tCSI: false,\n\tUpgradeFromPrevious: true,\n\tUpgradeFromCurrent: false,\n\tSerial: false,\n},"
    ));
}

#[cfg(unix)]
#[test]
fn generate_twice_is_byte_identical() {
    let (dir, input) = fixture(SAMPLE);
    let first = dir.path().join("first.go");
    let second = dir.path().join("second.go");

    for output in [&first, &second] {
        variants()
            .args(["--input", path_arg(&input), "--output", path_arg(output)])
            .args(["--formatter", "true", "--quiet"])
            .assert()
            .success();
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[cfg(unix)]
#[test]
fn generate_custom_package_and_import() {
    let (dir, input) = fixture(SAMPLE);
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--formatter", "true"])
        .args(["--package", "variants", "--import", "example.com/grid/api"])
        .assert()
        .success();

    let src = fs::read_to_string(&output).unwrap();
    assert!(src.contains("package variants"));
    assert!(src.contains("map[string]api.Variant{"));
}

#[cfg(unix)]
#[test]
fn quiet_suppresses_success_message() {
    let (dir, input) = fixture(SAMPLE);
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--formatter", "true", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(output.exists());
}

#[cfg(unix)]
#[test]
fn json_message_format_reports_job_count() {
    let (dir, input) = fixture(SAMPLE);
    let output = out_path(&dir);

    let assert = variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--formatter", "true", "--message-format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid JSON");
    assert_eq!(summary["jobs"], 2);
    assert_eq!(summary["output"], path_arg(&output));
    assert_eq!(summary["flags"]["parallel"], 1);
    assert_eq!(summary["flags"]["csi"], 1);
    assert_eq!(summary["flags"]["upgrade"], 0);
    assert_eq!(summary["flags"]["upgrade-minor"], 1);
    assert_eq!(summary["flags"]["serial"], 0);
}

// ──────────────────────────────────────────────
// 3. Failures
// ──────────────────────────────────────────────

#[test]
fn missing_input_file_exits_1_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.tsv");
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read TSV file"))
        .stderr(predicate::str::contains("missing.tsv"));

    assert!(!output.exists(), "output must not be created on load failure");
}

#[test]
fn header_only_input_exits_1() {
    let (dir, input) = fixture("job\tvariant\textended\n");
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not enough records"));

    assert!(!output.exists());
}

#[test]
fn ragged_input_exits_1() {
    let (dir, input) = fixture("job\tvariant\textended\njob-a\tv1\n");
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed TSV"));
}

#[test]
fn json_error_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.tsv");
    let output = out_path(&dir);

    let assert = variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--message-format", "json"])
        .assert()
        .code(1);

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    let line = stderr
        .lines()
        .find(|l| l.starts_with('{'))
        .expect("JSON error line");
    let err: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
    assert!(err["error"]
        .as_str()
        .unwrap()
        .contains("Failed to read TSV file"));
}

#[cfg(unix)]
#[test]
fn unwritable_output_exits_1() {
    let (dir, input) = fixture(SAMPLE);
    let output = dir.path().join("no-such-dir").join("out.go");

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--formatter", "true"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to generate Go file"));
}

#[cfg(unix)]
#[test]
fn failing_formatter_exits_1() {
    let (dir, input) = fixture(SAMPLE);
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--formatter", "false"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Go file generated").not())
        .stderr(predicate::str::starts_with("error: formatter 'false'"))
        .stderr(predicate::str::contains("Failed to generate").not());

    assert!(output.exists(), "unformatted file stays on disk");
}

#[test]
fn missing_formatter_exits_1() {
    let (dir, input) = fixture(SAMPLE);
    let output = out_path(&dir);

    variants()
        .args(["--input", path_arg(&input), "--output", path_arg(&output)])
        .args(["--formatter", "variants-no-such-formatter"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to run formatter"));
}
