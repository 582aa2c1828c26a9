//! Rendering of command results

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use icode_core::{InputFile, MeasureStore, MetricDefinition};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text grouped by file
    Human,
    /// A single JSON document on stdout
    Json,
}

#[derive(Debug, Serialize)]
pub struct MeasureRow<'a> {
    pub file: &'a str,
    pub metric: &'a str,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub files: usize,
    pub measures: usize,
    pub skipped_results: usize,
}

/// Outcome of one `measures` run
#[derive(Debug, Serialize)]
pub struct MeasuresReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub report: String,
    pub measures: Vec<MeasureRow<'a>>,
    pub summary: Summary,
}

impl<'a> MeasuresReport<'a> {
    pub fn new(report: &Path, store: &'a MeasureStore<InputFile>, skipped_results: usize) -> Self {
        let measures = store
            .iter()
            .map(|(file, metric, value)| MeasureRow {
                file: file.key.as_str(),
                metric,
                value,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            report: report.display().to_string(),
            measures,
            summary: Summary {
                files: store.files().len(),
                measures: store.len(),
                skipped_results,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Measures grouped under their file, in the order files were first seen
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        let mut current: Option<&str> = None;

        for row in &self.measures {
            if current != Some(row.file) {
                let _ = writeln!(out, "{}", row.file);
                current = Some(row.file);
            }
            let _ = writeln!(out, "  {:<28} {}", row.metric, format_value(row.value));
        }

        let _ = writeln!(
            out,
            "{} files, {} measures, {} results skipped",
            self.summary.files, self.summary.measures, self.summary.skipped_results
        );
        out
    }
}

/// Whole numbers without a fractional part, everything else as is
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

pub fn metrics_table(catalog: &[MetricDefinition]) -> String {
    let mut out = String::new();
    for definition in catalog {
        let _ = writeln!(
            out,
            "{:<28} {:<14} {:<7} {}",
            definition.key, definition.domain, definition.direction, definition.name
        );
    }
    out
}
