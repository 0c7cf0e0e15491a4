#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn specflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("specflow").unwrap();
    cmd.current_dir(dir.path())
        .env("SPECFLOW_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

const PRD: &str = "\
# Task Manager

## Overview

Track work across teams.

## Features

### User Login

Users log in via email/password. API responds in under 200ms and supports 1000 concurrent users.

**Requirements:**
- Validate email format
- Lock the account after 5 failed attempts

**Acceptance Criteria:**
- Given valid creds, when submit, then authenticated
- Given invalid creds, when submit, then error shown
- Given locked account, when submit, then lockout notice

### Dashboard

The dashboard should be fast and user-friendly.
";

fn write_prd(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("prd.md");
    std::fs::write(&path, PRD).unwrap();
    path
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// specflow parse
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_summary() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    specflow(&dir)
        .arg("parse")
        .arg(&prd)
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:        Task Manager"))
        .stdout(predicate::str::contains("Features:     2"))
        .stdout(predicate::str::contains("User Login"));
}

#[test]
fn parse_json_and_output_file() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);
    let out = dir.path().join("out/prd.json");

    let value = json_output(
        specflow(&dir)
            .args(["parse", "--json", "--output"])
            .arg(&out)
            .arg(&prd),
    );
    assert_eq!(value["title"], "Task Manager");
    assert_eq!(value["features"].as_array().unwrap().len(), 2);
    assert_eq!(value["features"][0]["requirements"].as_array().unwrap().len(), 2);

    // The written file loads back through the JSON path.
    specflow(&dir)
        .arg("parse")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Features:     2"));
}

#[test]
fn parse_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    specflow(&dir)
        .args(["parse", "nope.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load PRD"));
}

#[test]
fn parse_rejects_json_feature_without_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prd.json");
    std::fs::write(
        &path,
        r#"{"title":"Doc","features":[{"name":"","description":""}]}"#,
    )
    .unwrap();
    specflow(&dir)
        .arg("parse")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty name"));
}

#[test]
fn parse_rejects_untitled_markdown() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.md");
    std::fs::write(&path, "## No title\n").unwrap();
    specflow(&dir)
        .arg("parse")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("title"));
}

// ---------------------------------------------------------------------------
// specflow analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_reports_issues_and_scores() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    specflow(&dir)
        .arg("analyze")
        .arg(&prd)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ambiguities (pattern-matching): 2 found"))
        .stdout(predicate::str::contains("user-friendly"))
        .stdout(predicate::str::contains("Ready for tickets: no"));
}

#[test]
fn analyze_lists_most_severe_issues_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prd.md");
    std::fs::write(
        &path,
        "# Doc\n\n### Theme\nA nice palette\n\n### Import\nHandles many rows\n",
    )
    .unwrap();

    let output = specflow(&dir).arg("analyze").arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let many = stdout.find("many").unwrap();
    let nice = stdout.find("nice").unwrap();
    assert!(many < nice, "{stdout}");
}

#[test]
fn analyze_json_has_verdict() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    let value = json_output(specflow(&dir).args(["analyze", "-j"]).arg(&prd));
    assert_eq!(value["feature_count"], 2);
    assert_eq!(value["ambiguity_report"]["ai_model_used"], "pattern-matching");
    let issues = value["ambiguity_report"]["issues"].as_array().unwrap();
    let texts: Vec<&str> = issues
        .iter()
        .map(|i| i["original_text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["fast", "user-friendly"]);
    assert_eq!(issues[0]["severity"], "high");
    assert_eq!(value["quality_scores"].as_array().unwrap().len(), 2);
    // Login scores 86.9 without stubs or estimate; the dashboard drags the mean down.
    assert_eq!(value["quality_scores"][0]["overall_score"], 86.9);
    assert_eq!(value["quality_scores"][0]["is_ready"], true);
    assert_eq!(value["quality_scores"][1]["is_ready"], false);
    assert_eq!(value["ready_for_tickets"], false);
}

#[test]
fn analyze_can_skip_quality() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    let value = json_output(
        specflow(&dir)
            .args(["analyze", "--json", "--no-quality"])
            .arg(&prd),
    );
    assert!(value.get("ambiguity_report").is_some());
    assert!(value.get("quality_scores").is_none());
    assert!(value.get("ready_for_tickets").is_none());
}

#[test]
fn analyze_needs_at_least_one_engine() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    specflow(&dir)
        .args(["analyze", "--no-quality", "--no-ambiguities"])
        .arg(&prd)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to analyze"));
}

#[test]
fn analyze_without_api_key_falls_back_to_patterns() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);
    std::fs::create_dir_all(dir.path().join(".specflow")).unwrap();
    std::fs::write(
        dir.path().join(".specflow/config.yaml"),
        "version: 1\nai:\n  enabled: true\n  api_key_env: SPECFLOW_TEST_MISSING_KEY\n",
    )
    .unwrap();

    let value = json_output(
        specflow(&dir)
            .env_remove("SPECFLOW_TEST_MISSING_KEY")
            .args(["analyze", "--json"])
            .arg(&prd),
    );
    assert_eq!(value["ambiguity_report"]["ai_model_used"], "pattern-matching");
}

// ---------------------------------------------------------------------------
// specflow score
// ---------------------------------------------------------------------------

#[test]
fn score_single_feature_breakdown() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    specflow(&dir)
        .args(["score", "--feature", "dashboard"])
        .arg(&prd)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard:"))
        .stdout(predicate::str::contains("has_acceptance_criteria"))
        .stdout(predicate::str::contains("Feature missing acceptance criteria"));
}

#[test]
fn score_json_lists_checks() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    let value = json_output(specflow(&dir).args(["score", "--json"]).arg(&prd));
    let scores = value.as_array().unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0]["checks"].as_array().unwrap().len(), 9);
}

#[test]
fn score_unknown_feature_fails() {
    let dir = TempDir::new().unwrap();
    let prd = write_prd(&dir);

    specflow(&dir)
        .args(["score", "--feature", "Billing"])
        .arg(&prd)
        .assert()
        .failure()
        .stderr(predicate::str::contains("feature 'Billing' not found"));
}

// ---------------------------------------------------------------------------
// specflow detect
// ---------------------------------------------------------------------------

#[test]
fn detect_lists_vague_terms() {
    let dir = TempDir::new().unwrap();
    specflow(&dir)
        .args(["detect", "The system must be fast and easy to use"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fast"))
        .stdout(predicate::str::contains("missing_metric"))
        .stdout(predicate::str::contains("easy"));
}

#[test]
fn detect_clean_text() {
    let dir = TempDir::new().unwrap();
    specflow(&dir)
        .args(["detect", "Steadfast breakfast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No vague terms found."));
}

#[test]
fn detect_json() {
    let dir = TempDir::new().unwrap();
    let value = json_output(specflow(&dir).args(["detect", "--json", "Handles many rows"]));
    let issues = value.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["original_text"], "many");
    assert_eq!(issues[0]["ambiguity_type"], "missing_metric");
    assert!(issues[0].get("feature_id").is_none());
}

// ---------------------------------------------------------------------------
// specflow config
// ---------------------------------------------------------------------------

#[test]
fn config_init_show_validate() {
    let dir = TempDir::new().unwrap();

    specflow(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    assert!(dir.path().join(".specflow/config.yaml").exists());

    specflow(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    specflow(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AI enabled:    false"));

    specflow(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".specflow")).unwrap();
    std::fs::write(
        dir.path().join(".specflow/config.yaml"),
        "ai:\n  model: \"\"\n  base_url: ftp://example.com\n",
    )
    .unwrap();

    specflow(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] ai.model is empty"))
        .stderr(predicate::str::contains("config validation found errors"));
}
