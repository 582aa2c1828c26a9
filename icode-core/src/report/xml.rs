//! i-Code XML Analysis Project Reader
//!
//! ```xml
//! <analysisProject analysisProjectName="demo" analysisProjectVersion="1.0">
//!   <analysisInformations analysisConfigurationId="" analysisDate="" author=""/>
//!   <analysisFile fileName="bash.sh" language="shell"/>
//!   <analysisRule analysisRuleId="SH.MET.LineOfCode">
//!     <result fileName="bash.sh" resultLine="3" resultTypePlace="class"
//!             resultNamePlace="" resultValue="20">
//!       <resultMessage>Small file</resultMessage>
//!     </result>
//!   </analysisRule>
//! </analysisProject>
//! ```

use super::{AnalysisFile, AnalysisInformation, AnalysisProject, AnalysisRule};
use crate::models::RawResult;
use crate::{Error, Result};
use roxmltree::{Document, Node};

const ROOT: &str = "analysisProject";

pub fn parse_xml(content: &str) -> Result<AnalysisProject> {
    let doc = Document::parse(content)
        .map_err(|e| Error::Report(format!("Invalid i-Code XML report: {e}")))?;

    let root = doc.root_element();
    if !root.has_tag_name(ROOT) {
        return Err(Error::Report(format!(
            "Expected <{ROOT}> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut project = AnalysisProject {
        name: attribute(root, "analysisProjectName"),
        version: attribute(root, "analysisProjectVersion"),
        ..AnalysisProject::default()
    };

    for node in root.children().filter(Node::is_element) {
        match node.tag_name().name() {
            "analysisInformations" => {
                project.information = Some(AnalysisInformation {
                    configuration_id: attribute(node, "analysisConfigurationId"),
                    analysis_date: attribute(node, "analysisDate"),
                    author: attribute(node, "author"),
                });
            }
            "analysisFile" => project.files.push(AnalysisFile {
                file_name: attribute(node, "fileName"),
                language: attribute(node, "language"),
            }),
            "analysisRule" => project.rules.push(parse_rule(node)?),
            _ => {}
        }
    }

    Ok(project)
}

fn parse_rule(node: Node<'_, '_>) -> Result<AnalysisRule> {
    let rule_id = node
        .attribute("analysisRuleId")
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Report(format!(
                "<analysisRule> without analysisRuleId at byte {}",
                node.range().start
            ))
        })?;

    let results = node
        .children()
        .filter(|child| child.has_tag_name("result"))
        .map(|result| parse_result(result, &rule_id))
        .collect();

    Ok(AnalysisRule { rule_id, results })
}

fn parse_result(node: Node<'_, '_>, rule_id: &str) -> RawResult {
    let message = node
        .children()
        .find(|child| child.has_tag_name("resultMessage"))
        .and_then(|child| child.text())
        .map(|text| text.trim().to_string())
        .or_else(|| node.attribute("resultMessage").map(str::to_string))
        .unwrap_or_default();

    RawResult {
        rule_id: rule_id.to_string(),
        file_name: attribute(node, "fileName"),
        value: attribute(node, "resultValue"),
        line: attribute(node, "resultLine"),
        location_kind: node.attribute("resultTypePlace").map(str::to_string),
        location_name: node.attribute("resultNamePlace").map(str::to_string),
        message,
    }
}

fn attribute(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<analysisProject analysisProjectName="demo" analysisProjectVersion="1.0">
  <analysisInformations analysisConfigurationId="cfg" analysisDate="2024-01-01" author="cnes"/>
  <analysisFile fileName="bash.sh" language="shell"/>
  <analysisFile fileName="clanhb.f" language="f77"/>
  <analysisRule analysisRuleId="SH.MET.LineOfCode">
    <result fileName="bash.sh" resultLine="3" resultTypePlace="class" resultNamePlace="" resultValue="20">
      <resultMessage> Small file </resultMessage>
    </result>
  </analysisRule>
  <analysisRule analysisRuleId="F77.MET.Nesting">
    <result fileName="clanhb.f" resultLine="12" resultTypePlace="method" resultNamePlace="CLANHB" resultValue="4"/>
  </analysisRule>
  <analysisRule analysisRuleId="SH.ERR.Help"/>
</analysisProject>"#;

    #[test]
    fn test_parse_report() {
        let project = parse_xml(REPORT).unwrap();

        assert_eq!(project.name, "demo");
        assert_eq!(project.version, "1.0");
        assert_eq!(project.information.as_ref().map(|i| i.author.as_str()), Some("cnes"));
        assert_eq!(project.files.len(), 2);
        assert_eq!(project.rules.len(), 3);
        assert_eq!(project.result_count(), 2);

        let first = &project.rules[0].results[0];
        assert_eq!(first.rule_id, "SH.MET.LineOfCode");
        assert_eq!(first.value, "20");
        assert_eq!(first.location_kind.as_deref(), Some("class"));
        assert_eq!(first.message, "Small file");

        let nesting = &project.rules[1].results[0];
        assert_eq!(nesting.location_name.as_deref(), Some("CLANHB"));
        assert!(nesting.message.is_empty());
        assert!(project.rules[2].results.is_empty());
    }

    #[test]
    fn test_parsed_results_validate() {
        let results = parse_xml(REPORT).unwrap().results().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].line, 12);
        assert!((results[1].value - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_xml() {
        assert!(matches!(parse_xml("<analysisProject>"), Err(Error::Report(_))));
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(parse_xml("<project/>"), Err(Error::Report(_))));
    }

    #[test]
    fn test_rule_without_id() {
        let xml = "<analysisProject><analysisRule><result fileName=\"a\"/></analysisRule></analysisProject>";
        assert!(matches!(parse_xml(xml), Err(Error::Report(_))));
    }
}
