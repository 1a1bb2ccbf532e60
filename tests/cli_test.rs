mod common;

use common::{write, FOO_JOB};
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tree-scanner"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("tree-scanner"));
    assert!(stdout.contains("jars"));
    assert!(stdout.contains("jobs"));
    assert!(stdout.contains("sensitive"));
    assert!(stdout.contains("annotate"));
    assert!(stdout.contains("--config"));
}

#[test]
fn test_cli_missing_subcommand() {
    let output = run(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_invalid_root() {
    let output = run(&["jars", "/nonexistent/path/to/tree"]);

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("/nonexistent/path/to/tree"));
}

#[test]
fn test_cli_jars_json() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a/b/target/app-1.0.jar", "PK");
    write(root, "a/b/target/lib/helper-1.0.jar", "PK");

    let output = run(&["jars", root.to_str().unwrap(), "--format", "json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["total"], 1);
    assert_eq!(value["findings"][0]["name"], "app-1.0.jar");
    assert_eq!(value["findings"][0]["index"], 0);
}

#[test]
fn test_cli_jobs_empty_tree_fails() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "README.md", "# nothing");

    let output = run(&["jobs", temp_dir.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no .java files found"));
}

#[test]
fn test_cli_jobs_annotate_all() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("src");
    let foo = write(&root, "Foo.java", FOO_JOB);
    let log = temp_dir.path().join("log.json");

    let output = run(&[
        "jobs",
        root.to_str().unwrap(),
        "--annotate-all",
        "--log",
        log.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("MISSING"));
    assert!(out.contains("succeeded: 1, failed: 0"));
    assert!(fs::read_to_string(&foo)
        .unwrap()
        .contains("@DisallowConcurrentExecution\npublic class Foo"));

    let entries: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&log).unwrap()).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["fileName"], "Foo.java");

    let rescan = run(&["jobs", root.to_str().unwrap(), "-f", "json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&rescan)).unwrap();
    assert_eq!(value["findings"][0]["hasAnnotation"], true);
    assert_eq!(value["pendingRemediation"], 0);
}

#[test]
fn test_cli_sensitive_csv() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("src");
    write(&root, "app.js", "console.log('password', password);\n");
    let csv = temp_dir.path().join("out.csv");

    let output = run(&[
        "sensitive",
        root.to_str().unwrap(),
        "-w",
        "password",
        "--csv",
        csv.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("[password]"));
    let content = fs::read_to_string(&csv).unwrap();
    assert!(content.starts_with("\u{feff}Index,Sensitive Word"));
    assert!(content.contains("1,password,js,"));
}

#[test]
fn test_cli_annotate_reports_counts() {
    let temp_dir = TempDir::new().unwrap();
    let foo = write(temp_dir.path(), "Foo.java", FOO_JOB);
    let info = write(temp_dir.path(), "package-info.java", "package com.acme;\n");
    let log = temp_dir.path().join("log.json");

    let output = run(&[
        "annotate",
        foo.to_str().unwrap(),
        info.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("succeeded: 1, failed: 1"));
    assert!(stderr(&output).contains("package-info.java"));
}

#[test]
fn test_cli_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();

    let output = run(&[
        "jars",
        temp_dir.path().to_str().unwrap(),
        "--config",
        "/definitely/missing.yaml",
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Settings file does not exist"));
}
