use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const CLINICAL: &str = "\
Patient ID,CT Date,Date of Last Known Alive,Days between CT and surgery,Survival Status
LUNG1-001,01/01/2020,06/15/2020,10,Death
LUNG1-002,02/01/2019,02/01/2020,,Alive
LUNG1-003,02/01/2019,,3,Death
LUNG1-004,05/01/2020,04/01/2020,0,Alive
";

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("clinical.csv");
    fs::write(&path, CLINICAL).unwrap();
    path
}

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("survival-records").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn build_writes_table_and_diagnostics() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path());
    let output = tmp.path().join("survival.csv");
    let diagnostics = tmp.path().join("diagnostics.json");

    Command::cargo_bin("survival-records")
        .unwrap()
        .arg("build")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--diagnostics")
        .arg(&diagnostics)
        .args(["--unknown-status", "censor"])
        .assert()
        .success();

    let table = fs::read_to_string(&output).unwrap();
    assert_eq!(
        table,
        "subject_id,time,event,status,flagged\n\
         LUNG1-001,156,true,deceased,false\n\
         LUNG1-002,365,false,alive,false\n\
         LUNG1-004,-30,false,alive,true\n"
    );

    let v: Value = serde_json::from_slice(&fs::read(diagnostics).unwrap()).unwrap();
    assert_eq!(v["n_input"], 4);
    assert_eq!(v["diagnostics"][0]["kind"], "date_parse");
    assert_eq!(v["diagnostics"][0]["subject_id"], "LUNG1-003");
    assert_eq!(v["diagnostics"][1]["kind"], "negative_duration");
}

#[test]
fn build_can_drop_flagged_rows() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path());
    let output = tmp.path().join("survival.csv");

    Command::cargo_bin("survival-records")
        .unwrap()
        .arg("build")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--unknown-status", "exclude", "--drop-flagged"])
        .assert()
        .success();

    let table = fs::read_to_string(&output).unwrap();
    assert_eq!(table.lines().count(), 3);
    assert!(!table.contains("LUNG1-004"));
}

#[test]
fn build_requires_unknown_status_policy() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path());

    Command::cargo_bin("survival-records")
        .unwrap()
        .arg("build")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(tmp.path().join("out.csv"))
        .assert()
        .failure();
}

#[test]
fn policy_can_come_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path());
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{"unknown_status": "censor"}"#).unwrap();
    let output = tmp.path().join("survival.csv");

    Command::cargo_bin("survival-records")
        .unwrap()
        .arg("build")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn check_fails_when_rows_skipped() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path());

    Command::cargo_bin("survival-records")
        .unwrap()
        .arg("check")
        .arg("--input")
        .arg(&input)
        .args(["--unknown-status", "censor"])
        .assert()
        .failure();
}

#[test]
fn check_passes_on_clean_input() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("clean.csv");
    fs::write(
        &path,
        "Patient ID,CT Date,Date of Last Known Alive,Survival Status\nP1,01/01/2020,01/31/2020,Death\n",
    )
    .unwrap();

    Command::cargo_bin("survival-records")
        .unwrap()
        .arg("check")
        .arg("--input")
        .arg(&path)
        .args(["--unknown-status", "censor"])
        .assert()
        .success();
}

#[test]
fn missing_column_aborts() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.csv");
    fs::write(&path, "Patient ID,CT Date\nP1,01/01/2020\n").unwrap();

    Command::cargo_bin("survival-records")
        .unwrap()
        .arg("check")
        .arg("--input")
        .arg(&path)
        .args(["--unknown-status", "censor"])
        .assert()
        .failure();
}
