//! File-based tests for xml-check.
//!
//! These exercise `check_file` and the `xml-check` binary against documents
//! written to a temporary directory, including the exit code contract.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;
use xml_check::{CheckOptions, check_file};
use xml_error_log::{Category, ErrorLog, Severity};

const VALID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml level="2" version="4">
  <model id="decay">
    <listOfSpecies>
      <species id="A" compartment="cell"/>
    </listOfSpecies>
  </model>
</sbml>
"#;

const BROKEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml>
  <model id="decay">
    <listOfSpecies>
  </model>
</sbml>
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn run_cli(args: &[&str], files: &[&PathBuf]) -> (i32, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_xml-check"))
        .args(args)
        .args(files)
        .output()
        .expect("Failed to run xml-check");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

#[test]
fn valid_file_has_no_records() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "valid.xml", VALID);

    let mut log = ErrorLog::new();
    check_file(&path, &CheckOptions::default(), &mut log).unwrap();
    assert!(log.is_empty(), "unexpected records:\n{}", log);
}

#[test]
fn broken_file_reports_in_document_order() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.xml", BROKEN);

    let mut log = ErrorLog::new();
    check_file(&path, &CheckOptions::default(), &mut log).unwrap();

    insta::assert_snapshot!(log.report(), @r"
    Error (1009) at line 5, column 3: XML tag mismatch: expected </listOfSpecies>, found </model>
    Error (1009) at line 6, column 1: XML tag mismatch: expected </model>, found </sbml>
    Error (1024) at line 2, column 1: Unexpected end of XML input: expected closing tag </sbml>
    ");
    assert_eq!(log.error_count(Severity::Error), 3);
}

#[test]
fn missing_file_is_a_system_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.xml");

    let mut log = ErrorLog::new();
    let outcome = check_file(&path, &CheckOptions::default(), &mut log).unwrap();

    assert!(outcome.stopped);
    assert_eq!(log.size(), 1);
    let record = log.get(0).unwrap();
    assert_eq!(record.id(), 2);
    assert_eq!(record.severity(), Severity::Fatal);
    assert_eq!(record.category(), &Category::System);
    assert!(record.message().starts_with("File unreadable: "));
}

#[test]
fn invalid_utf8_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.xml");
    fs::write(&path, b"<a>caf\xe9</a>").unwrap();

    let mut log = ErrorLog::new();
    check_file(&path, &CheckOptions::default(), &mut log).unwrap();
    assert!(log.contains(1017));
}

#[test]
fn cli_exit_code_zero_for_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "valid.xml", VALID);

    let (code, stdout) = run_cli(&[], &[&path]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn cli_warnings_do_not_fail() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "nodecl.xml", "<model/>");

    let (code, stdout) = run_cli(&[], &[&path]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Warning (1001) at line 1, column 1: Missing XML declaration"));

    let (code, stdout) = run_cli(&["--min-severity", "error"], &[&path]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn cli_exit_code_nonzero_when_any_file_invalid() {
    let dir = TempDir::new().unwrap();
    let valid = write(&dir, "valid.xml", VALID);
    let broken = write(&dir, "broken.xml", BROKEN);

    let (code, stdout) = run_cli(&[], &[&valid, &broken]);
    assert_eq!(code, 1);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.lines().all(|l| l.contains("broken.xml")));
}

#[test]
fn cli_json_output() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "roots.xml", "<a/><b/>");

    let (code, stdout) = run_cli(&["--format", "json", "--no-declaration-check"], &[&path]);
    assert_eq!(code, 1);

    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let report = &reports[0];
    assert!(report["file"].as_str().unwrap().ends_with("roots.xml"));
    assert_eq!(report["valid"], false);
    assert_eq!(report["records"][0]["id"], 1028);
    assert_eq!(report["summary"]["error"], 1);
}

#[test]
fn cli_json_min_severity_filters_records_only() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "nodecl.xml", "<model/>");

    let (code, stdout) = run_cli(&["--format", "json", "--min-severity", "error"], &[&path]);
    assert_eq!(code, 0);

    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let report = &reports[0];
    assert_eq!(report["records"].as_array().unwrap().len(), 0);
    assert_eq!(report["summary"]["warning"], 1);
    assert_eq!(report["valid"], true);
}
