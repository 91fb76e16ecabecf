use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const JAN: &str = r#"{"Name":"Jan","Date of Death":"1900-01-01","Baten (Net Assets)":100,"Schulden en Lasten (Net Liabilities)":40,"Saldo (Net Wealth)":60,"Overview":{"Assets":[{"name":"House","value":100}],"Liabilities":[{"name":"Debt","value":40}]}}"#;

fn memorie(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("memorie").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn normalize_writes_csv_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("response.txt"), format!("```json\n{JAN}\n```\n")).unwrap();

    memorie(dir.path())
        .args(["normalize", "response.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Combined data exported to 'response.csv'"));

    let csv = fs::read_to_string(dir.path().join("response.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "description,value,Type,Name,Date of Death,Baten (Net Assets),Schulden en Lasten (Net Liabilities),Saldo (Net Wealth)"
    );
    assert_eq!(lines[1], "House,100,Asset,Jan,1900-01-01,100,40,60");
    assert_eq!(lines[2], "Debt,40,Liability,Jan,1900-01-01,100,40,60");
}

#[test]
fn normalize_honours_output_flag() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.json"), JAN).unwrap();

    memorie(dir.path())
        .args(["normalize", "in.json", "--output_file", "table.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 row(s)"));
    assert!(dir.path().join("table.csv").exists());
    assert!(!dir.path().join("in.csv").exists());
}

#[test]
fn normalize_missing_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    memorie(dir.path())
        .args(["normalize", "absent.txt", "-o", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn normalize_malformed_json_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.txt"), "{\"Name\": ").unwrap();
    memorie(dir.path())
        .args(["normalize", "bad.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot parse"));
    assert!(!dir.path().join("bad.csv").exists());
}

#[test]
fn normalize_uses_aliases_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("memorie.toml"), "[fields]\nname = \"Naam\"\n").unwrap();
    fs::write(
        dir.path().join("in.json"),
        r#"{"Naam":"Piet","Overview":{"Assets":[],"Liabilities":[]}}"#,
    )
    .unwrap();

    memorie(dir.path())
        .args(["normalize", "in.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 row(s)"));

    let csv = fs::read_to_string(dir.path().join("in.csv")).unwrap();
    assert!(csv.starts_with("Naam,Date of Death,"));
    assert!(csv.contains("Piet,N/A,0,0,0"));
}

#[test]
fn extract_without_api_key_stops_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("scans")).unwrap();
    fs::write(dir.path().join("scans").join("p1.png"), b"not really a png").unwrap();

    memorie(dir.path())
        .env_remove("GOOGLE_API_KEY")
        .args(["extract", "scans"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_API_KEY is not set"));
    assert!(!dir.path().join("response.txt").exists());
}

#[test]
fn extract_rejects_unknown_mode() {
    let dir = tempfile::tempdir().unwrap();
    memorie(dir.path())
        .args(["extract", "scans", "--mode", "loose"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown extraction mode"));
}
