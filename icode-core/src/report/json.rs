//! i-Code JSON Check Result Reader
//!
//! Reads the analyser library's check results, either as a bare array or
//! wrapped in an object under `results`:
//!
//! ```json
//! [{"name": "F77.MET.Nesting", "id": "F77.MET.Nesting", "langId": "f77",
//!   "file": "clanhb.f", "line": 12, "location": "method", "message": "", "value": 4.0}]
//! ```
//!
//! Each entry becomes its own [`AnalysisRule`] so report order is kept.

use super::{AnalysisFile, AnalysisProject, AnalysisRule};
use crate::models::RawResult;
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckResultEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    lang_id: String,
    #[serde(default)]
    file: Value,
    #[serde(default)]
    line: Value,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CheckResultDocument {
    List(Vec<CheckResultEntry>),
    Wrapped { results: Vec<CheckResultEntry> },
}

pub fn parse_json(content: &str) -> Result<AnalysisProject> {
    let document: CheckResultDocument = serde_json::from_str(content)
        .map_err(|e| Error::Report(format!("Invalid i-Code JSON report: {e}")))?;
    let entries = match document {
        CheckResultDocument::List(entries) | CheckResultDocument::Wrapped { results: entries } => {
            entries
        }
    };

    let mut project = AnalysisProject::default();
    let mut seen_files = HashSet::new();
    for (position, entry) in entries.into_iter().enumerate() {
        let rule_id = if entry.id.is_empty() {
            entry.name
        } else {
            entry.id
        };
        if rule_id.is_empty() {
            return Err(Error::Report(format!(
                "Check result #{position} has neither id nor name"
            )));
        }
        let file_name = text(&entry.file);

        if !file_name.is_empty() && seen_files.insert(file_name.clone()) {
            project.files.push(AnalysisFile {
                file_name: file_name.clone(),
                language: entry.lang_id,
            });
        }

        project.rules.push(AnalysisRule {
            rule_id: rule_id.clone(),
            results: vec![RawResult {
                rule_id,
                file_name,
                value: text(&entry.value),
                line: text(&entry.line),
                location_kind: entry.location,
                location_name: None,
                message: entry.message.unwrap_or_default(),
            }],
        });
    }

    Ok(project)
}

/// Text of a scalar JSON value as the analyser would have written it
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleResult;

    #[test]
    fn test_parse_list() {
        let project = parse_json(
            r#"[
                {"name": "F77.MET.ComplexitySimplified", "id": "F77.MET.ComplexitySimplified",
                 "langId": "f77", "file": "clanhb.f", "line": 1, "location": null,
                 "message": "empty message", "value": 1.0},
                {"id": "F77.MET.Nesting", "langId": "f77", "file": "clanhb.f",
                 "line": "12", "location": "method", "value": "4"}
            ]"#,
        )
        .unwrap();

        assert_eq!(project.rules.len(), 2);
        assert_eq!(project.files.len(), 1);
        assert_eq!(project.files[0].language, "f77");

        let results = project.results().unwrap();
        assert_eq!(results[0].location_kind, None);
        assert!((results[0].value - 1.0).abs() < f64::EPSILON);
        assert_eq!(results[1].line, 12);
        assert_eq!(results[1].location_kind.as_deref(), Some("method"));
    }

    #[test]
    fn test_parse_wrapped() {
        let project =
            parse_json(r#"{"results": [{"name": "SH.MET.LineOfCode", "file": "bash.sh", "value": 3}]}"#)
                .unwrap();
        let results: Vec<RuleResult> = project.results().unwrap();
        assert_eq!(results[0].rule_id.as_str(), "SH.MET.LineOfCode");
    }

    #[test]
    fn test_files_listed_once_in_first_seen_order() {
        let project = parse_json(
            r#"[
                {"id": "SH.MET.LineOfCode", "langId": "shell", "file": "b.sh", "value": 1},
                {"id": "SH.MET.LineOfCode", "langId": "shell", "file": "a.sh", "value": 2},
                {"id": "SH.MET.Nesting", "langId": "shell", "file": "b.sh", "value": 3},
                {"id": "SH.ERR.Help", "file": "", "value": ""}
            ]"#,
        )
        .unwrap();

        let names: Vec<&str> = project.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["b.sh", "a.sh"]);
        assert_eq!(project.rules.len(), 4);
    }

    #[test]
    fn test_entry_without_rule() {
        assert!(matches!(
            parse_json(r#"[{"file": "bash.sh", "value": 3}]"#),
            Err(Error::Report(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_json("{"), Err(Error::Report(_))));
    }

    #[test]
    fn test_non_numeric_value_fails_validation() {
        let project =
            parse_json(r#"[{"id": "SH.MET.LineOfCode", "file": "bash.sh", "value": true}]"#).unwrap();
        assert!(matches!(project.results(), Err(Error::MalformedValue { .. })));
    }
}
