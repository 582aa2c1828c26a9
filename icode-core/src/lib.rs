//! i-Code Core - Metrics Mapping for i-Code Analysis Results
//!
//! This crate turns the per-file results of the i-Code static analyser
//! into code metrics attached to project files:
//! - Data models for analysis results, measures and metric records
//! - The metrics mapper (classification, direct and derived measures)
//! - File resolution and measure sink seams towards the host platform
//! - Readers for i-Code XML reports and JSON check-result lists

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::multiple_crate_versions,  // Common in large dependency trees
    clippy::module_name_repetitions,  // Often necessary for clarity
)]

pub mod constants;
pub mod files;
pub mod measures;
pub mod models;
pub mod report;
pub mod store;

pub use constants::metrics::{MetricDefinition, MetricDirection};
pub use files::{FileIndex, InputFile, ProjectFiles};
pub use measures::{is_metric, save_extra_measures, save_measure, MeasureMapper};
pub use models::{Measure, MetricRecord, RawResult, RuleDefinition, RuleId, RuleResult};
pub use report::{read_report, AnalysisProject, ReportFormat};
pub use store::{MeasureSink, MeasureStore};

use icode_utils::LogLevel;

/// Result type used throughout i-Code core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for i-Code core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A result value is not a finite number
    #[error("Malformed value '{text}' for rule {rule_id} on {file}")]
    MalformedValue {
        rule_id: String,
        file: String,
        text: String,
    },

    /// A result line is not a non-negative integer
    #[error("Malformed line '{text}' for rule {rule_id} on {file}")]
    MalformedLine {
        rule_id: String,
        file: String,
        text: String,
    },

    /// A measure was written twice for the same file and metric
    #[error("Measure '{metric}' is already saved for {file}")]
    DuplicateMeasure { file: String, metric: String },

    /// The analysis report could not be read
    #[error("Report error: {0}")]
    Report(String),

    /// The analysis report format is not known
    #[error("Unsupported report format: {0}")]
    UnsupportedReport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] icode_utils::UtilError),
}

/// What a measure store does when a metric is saved twice for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DuplicatePolicy {
    /// Fail with [`Error::DuplicateMeasure`]
    #[default]
    Reject,
    /// Replace the stored value
    Overwrite,
    /// Keep the stored value and drop the new one
    KeepFirst,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::KeepFirst => write!(f, "keep-first"),
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "overwrite" => Ok(Self::Overwrite),
            "keep-first" | "keep_first" => Ok(Self::KeepFirst),
            _ => Err(Error::Config(format!(
                "Invalid duplicate policy: '{s}'. Valid options: reject, overwrite, keep-first"
            ))),
        }
    }
}

/// Configuration for mapping i-Code results onto measures
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Prefix of the metric keys derived from rule identifiers
    pub metric_prefix: String,
    /// Behaviour of the measure store on repeated writes
    pub duplicate_policy: DuplicatePolicy,
    /// Glob patterns of project paths that are never indexed
    pub exclude: Vec<String>,
    /// Default log level of the command-line tools
    pub log_level: LogLevel,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            metric_prefix: constants::metrics::DEFAULT_METRIC_PREFIX.to_string(),
            duplicate_policy: DuplicatePolicy::Reject,
            exclude: icode_utils::default_exclusion_patterns(),
            log_level: LogLevel::Info,
        }
    }
}

impl MapperConfig {
    /// Load configuration layered over the defaults
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let config = icode_utils::ConfigBuilder::<Self>::new()
            .load_file(path)?
            .build();
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.metric_prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "metric_prefix must not contain whitespace: '{}'",
                self.metric_prefix
            )));
        }
        for pattern in &self.exclude {
            globset::Glob::new(pattern).map_err(|e| {
                Error::Config(format!("Invalid exclude pattern '{pattern}': {e}"))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_duplicate_policy_round_trip_through_text() {
        for policy in [
            DuplicatePolicy::Reject,
            DuplicatePolicy::Overwrite,
            DuplicatePolicy::KeepFirst,
        ] {
            assert_eq!(policy.to_string().parse::<DuplicatePolicy>().unwrap(), policy);
        }
        assert!("ignore".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_config_file_overrides_only_given_keys() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("icode.toml");
        std::fs::write(&path, "duplicate_policy = \"keep-first\"\nlog_level = \"debug\"\n")?;

        let config = MapperConfig::load(&path)?;

        assert_eq!(config.duplicate_policy, DuplicatePolicy::KeepFirst);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.metric_prefix, "icode-");
        assert_eq!(config.exclude, icode_utils::default_exclusion_patterns());
        Ok(())
    }

    #[test]
    fn test_config_rejects_bad_glob() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("icode.json");
        std::fs::write(&path, r#"{"exclude": ["src/[a-"]}"#)?;

        assert!(matches!(MapperConfig::load(&path), Err(Error::Config(_))));
        Ok(())
    }
}
