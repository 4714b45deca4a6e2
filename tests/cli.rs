use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

mod common;
use common::*;

#[test]
fn cli_version() {
    Command::cargo_bin("fanout").unwrap().args(&["-V"]).assert().success();
    Command::cargo_bin("fanout-server").unwrap().args(&["-V"]).assert().success();
    Command::cargo_bin("addrbook").unwrap().args(&["-V"]).assert().success();
}

#[test]
fn cli_fanout_prints_results_and_summary() {
    let url = spawn_body_server("ok");
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--target", &url, "--count", "10"])
        .assert()
        .success()
        .stdout(contains("ok\n"))
        .stdout(contains("made 10 requests"));
}

#[test]
fn cli_fanout_verbose_logs_worker_threads() {
    let url = spawn_body_server("ok");
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--target", &url, "--count", "3", "--verbose"])
        .assert()
        .success()
        .stderr(contains("Thread worker-"))
        .stderr(contains("started"));

    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--target", &url, "--count", "3"])
        .assert()
        .success()
        .stderr(contains("started").not());
}

#[test]
fn cli_fanout_with_limit() {
    let url = spawn_body_server("ok");
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--target", &url, "-n", "6", "--limit", "2", "--pool", "rayon"])
        .assert()
        .success()
        .stdout(contains("made 6 requests"));
}

#[test]
fn cli_fanout_reports_failures() {
    let url = closed_port_url();
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--target", &url, "--count", "2"])
        .assert()
        .success()
        .stdout(contains("error: "))
        .stdout(contains("made 2 requests"));
}

#[test]
fn cli_fanout_times_out() {
    let url = spawn_silent_server();
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--target", &url, "--count", "3", "--wait-secs", "0.2"])
        .assert()
        .failure()
        .stderr(contains("timed out"));
}

#[test]
fn cli_fanout_reads_config_file() {
    let url = spawn_body_server("hello");
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("batch.json");
    fs::write(&path, format!(r#"{{"target": "{}", "count": 4}}"#, url)).unwrap();

    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--config", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("hello"))
        .stdout(contains("made 4 requests"));
}

#[test]
fn cli_fanout_invalid_args() {
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--count", "many"])
        .assert()
        .failure();
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--pool", "threads"])
        .assert()
        .failure();
    Command::cargo_bin("fanout")
        .unwrap()
        .args(&["--limit", "0"])
        .assert()
        .failure();
}

#[test]
fn cli_addrbook_save_and_load() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    for format in &["json", "literal", "shelf"] {
        let path = temp_dir.path().join(format!("book_data.{}", format));
        let path = path.to_str().unwrap();
        Command::cargo_bin("addrbook")
            .unwrap()
            .args(&["save", "--format", format, "--path", path])
            .assert()
            .success()
            .stdout(contains("Chris Barker"))
            .stdout(contains("Fred Jones"));
        Command::cargo_bin("addrbook")
            .unwrap()
            .args(&["load", "--format", format, "--path", path])
            .assert()
            .success()
            .stdout(contains("email: FredJones@some_company.com"));
    }
}

#[test]
fn cli_addrbook_save_from_input() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let input = temp_dir.path().join("input.json");
    fs::write(&input, r#"[{"first_name": "Ada", "last_name": "Lovelace"}]"#).unwrap();
    let path = temp_dir.path().join("book.txt");

    Command::cargo_bin("addrbook")
        .unwrap()
        .args(&[
            "save",
            "--format",
            "literal",
            "--path",
            path.to_str().unwrap(),
            "--input",
            input.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Ada Lovelace"));
}

#[test]
fn cli_addrbook_missing_name_fails() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("book.json");
    fs::write(&path, r#"[{"first_name": "Ada"}]"#).unwrap();

    Command::cargo_bin("addrbook")
        .unwrap()
        .args(&["load", "--format", "json", "--path", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("last_name"));
}
