//! i-Code Report Readers
//!
//! i-Code writes its results either as an XML analysis project (the
//! format consumed by code-quality platform plugins) or as a JSON list of
//! check results (the analyser library's own export). Both are read into
//! an [`AnalysisProject`]; numeric fields stay text until
//! [`AnalysisProject::results`] validates them.

pub mod json;
pub mod xml;

use crate::models::{RawResult, RuleResult};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Report formats understood by [`read_report`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportFormat {
    Xml,
    Json,
}

impl ReportFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedReport(path.display().to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml => write!(f, "xml"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Run metadata written by the analyser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisInformation {
    pub configuration_id: String,
    pub analysis_date: String,
    pub author: String,
}

/// A file the analyser looked at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisFile {
    pub file_name: String,
    pub language: String,
}

/// One rule and the results it produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisRule {
    pub rule_id: String,
    pub results: Vec<RawResult>,
}

/// Everything read from one report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisProject {
    pub name: String,
    pub version: String,
    pub information: Option<AnalysisInformation>,
    pub files: Vec<AnalysisFile>,
    pub rules: Vec<AnalysisRule>,
}

impl AnalysisProject {
    /// Parse report text in the given format
    pub fn parse(content: &str, format: ReportFormat) -> Result<Self> {
        match format {
            ReportFormat::Xml => xml::parse_xml(content),
            ReportFormat::Json => json::parse_json(content),
        }
    }

    /// Raw results in report order
    pub fn raw_results(&self) -> impl Iterator<Item = &RawResult> {
        self.rules.iter().flat_map(|rule| rule.results.iter())
    }

    /// Validated results in report order; the first malformed value aborts
    pub fn results(&self) -> Result<Vec<RuleResult>> {
        self.raw_results().cloned().map(RuleResult::parse).collect()
    }

    /// Number of raw results
    pub fn result_count(&self) -> usize {
        self.rules.iter().map(|rule| rule.results.len()).sum()
    }
}

/// Read a report file, choosing the reader from its extension
pub fn read_report(path: &Path) -> Result<AnalysisProject> {
    let format = ReportFormat::from_path(path)?;
    debug!("Reading {} report {}", format, path.display());

    let content = std::fs::read_to_string(path)?;
    let project = AnalysisProject::parse(&content, format)?;

    info!(
        rules = project.rules.len(),
        results = project.result_count(),
        "Read i-Code report {}",
        path.display()
    );
    Ok(project)
}
