use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn report(results: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<analysisProject analysisProjectName="demo" analysisProjectVersion="1.0">
  <analysisFile fileName="bash.sh" language="shell"/>
  {results}
</analysisProject>"#
    )
}

fn project_with(report_xml: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bash.sh"), "#!/bin/sh\necho hello\n").unwrap();
    fs::write(dir.path().join("icode.xml"), report_xml).unwrap();
    dir
}

fn measures(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("icode-measures").unwrap();
    cmd.arg("measures")
        .arg(dir.join("icode.xml"))
        .arg("--project")
        .arg(dir);
    cmd
}

const FUNCTION_RESULTS: &str = r#"
  <analysisRule analysisRuleId="SH.MET.LineOfCode">
    <result fileName="bash.sh" resultLine="1" resultTypePlace="function" resultNamePlace="main" resultValue="12"/>
  </analysisRule>
  <analysisRule analysisRuleId="SH.MET.Nesting">
    <result fileName="bash.sh" resultLine="1" resultTypePlace="function" resultNamePlace="main" resultValue="3"/>
    <result fileName="./bash.sh" resultLine="4" resultTypePlace="function" resultNamePlace="helper" resultValue="50"/>
  </analysisRule>
  <analysisRule analysisRuleId="SH.ERR.Help">
    <result fileName="bash.sh" resultLine="1" resultValue="">
      <resultMessage>Missing help</resultMessage>
    </result>
  </analysisRule>
  <analysisRule analysisRuleId="SH.MET.LineOfCode">
    <result fileName="missing.sh" resultLine="1" resultTypePlace="class" resultValue="7"/>
  </analysisRule>"#;

#[test]
fn test_measures_human_output() {
    let dir = project_with(&report(FUNCTION_RESULTS));

    measures(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bash.sh\n"))
        .stdout(predicate::str::is_match(r"(?m)^  icode-lineofcode\s+12$").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^  functions\s+1$").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^  icode-nesting-max\s+50$").unwrap())
        .stdout(predicate::str::contains("icode-nesting\n").not())
        .stdout(predicate::str::contains("1 files, 3 measures, 1 results skipped"));
}

#[test]
fn test_measures_json_output() {
    let dir = project_with(&report(FUNCTION_RESULTS));

    let assert = measures(dir.path()).args(["--output", "json"]).assert().success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    let metrics: Vec<&str> = value["measures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["metric"].as_str().unwrap())
        .collect();
    assert_eq!(metrics, ["icode-lineofcode", "functions", "icode-nesting-max"]);
    assert_eq!(value["measures"][2]["value"], 50.0);
    assert_eq!(value["summary"]["skipped_results"], 1);
}

#[test]
fn test_custom_prefix() {
    let dir = project_with(&report(FUNCTION_RESULTS));

    measures(dir.path())
        .args(["--prefix", "ic-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ic-nesting-max"))
        .stdout(predicate::str::contains("ic-lineofcode"));
}

const LOCATED_COMMENT_RESULTS: &str = r#"
  <analysisRule analysisRuleId="SH.MET.LineOfComment">
    <result fileName="bash.sh" resultLine="1" resultTypePlace="function" resultNamePlace="main" resultValue="4"/>
    <result fileName="bash.sh" resultLine="5" resultTypePlace="function" resultNamePlace="helper" resultValue="3"/>
  </analysisRule>"#;

#[test]
fn test_direct_and_summed_values_are_both_published() {
    let dir = project_with(&report(LOCATED_COMMENT_RESULTS));

    measures(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?m)^  icode-lineofcomment\s+3$").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^  icode-lineofcomment-sum\s+7$").unwrap())
        .stdout(predicate::str::contains("1 files, 2 measures"));
}

#[test]
fn test_duplicate_policy_flag_is_accepted() {
    let dir = project_with(&report(LOCATED_COMMENT_RESULTS));

    for policy in ["reject", "overwrite", "keep-first"] {
        measures(dir.path())
            .args(["--duplicates", policy])
            .assert()
            .success();
    }
    measures(dir.path())
        .args(["--duplicates", "ignore"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_project_config_fails() {
    let dir = project_with(&report(LOCATED_COMMENT_RESULTS));
    fs::write(dir.path().join("icode.toml"), "duplicate_policy = \"ignore\"\n").unwrap();

    measures(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load project configuration"));
}

#[test]
fn test_malformed_value_fails() {
    let dir = project_with(&report(
        r#"<analysisRule analysisRuleId="SH.MET.LineOfCode">
    <result fileName="bash.sh" resultLine="1" resultTypePlace="class" resultValue="twelve"/>
  </analysisRule>"#,
    ));

    measures(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed value 'twelve'"));
}

#[test]
fn test_missing_report_fails() {
    let dir = tempdir().unwrap();

    measures(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read report"));
}

#[test]
fn test_classify() {
    Command::cargo_bin("icode-measures")
        .unwrap()
        .args(["classify", "SH.MET.LineOfCode", "SH.ERR.Help", "COMETA.Check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SH.MET.LineOfCode: metric icode-lineofcode"))
        .stdout(predicate::str::contains("SH.ERR.Help: not a metric"))
        .stdout(predicate::str::contains("COMETA.Check: not a metric"));
}

#[test]
fn test_classify_requires_rule_ids() {
    Command::cargo_bin("icode-measures")
        .unwrap()
        .arg("classify")
        .assert()
        .failure();
}

#[test]
fn test_metrics_listing() {
    Command::cargo_bin("icode-measures")
        .unwrap()
        .arg("metrics")
        .assert()
        .success()
        .stdout(predicate::str::contains("functions"))
        .stdout(predicate::str::contains("icode-nesting-max"));
}
