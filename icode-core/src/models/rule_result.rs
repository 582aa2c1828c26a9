//! Rule Result Model
//!
//! One finding of the i-Code analyser for one rule on one file. Readers
//! produce [`RawResult`] values holding the report's text verbatim;
//! [`RuleResult::parse`] validates the numeric fields.

use crate::constants::metrics::{METRIC_SEGMENT, SEGMENT_SEPARATOR};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Dot-delimited rule identifier, e.g. `SH.MET.LineOfCode`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segments between the dots, empty segments included
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEGMENT_SEPARATOR)
    }

    /// True iff one segment is exactly `MET`
    pub fn is_metric(&self) -> bool {
        self.segments().any(|segment| segment == METRIC_SEGMENT)
    }

    /// Language scope, the first segment of a multi-segment identifier
    pub fn language(&self) -> Option<&str> {
        let mut segments = self.segments();
        let first = segments.next()?;
        segments.next().map(|_| first)
    }

    /// Trailing segment of a metric identifier
    pub fn metric_name(&self) -> Option<&str> {
        if !self.is_metric() {
            return None;
        }
        self.segments()
            .last()
            .filter(|name| !name.is_empty() && *name != METRIC_SEGMENT)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A result as written in the analyser's report, every field still text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    pub rule_id: String,
    pub file_name: String,
    pub value: String,
    pub line: String,
    pub location_kind: Option<String>,
    pub location_name: Option<String>,
    pub message: String,
}

/// A validated analysis result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    pub rule_id: RuleId,
    /// File name as reported by the analyser
    pub file_name: String,
    pub value: f64,
    pub line: u32,
    /// Granularity of the result (`class`, `method`, ...)
    pub location_kind: Option<String>,
    /// Name of the function or module the result applies to
    pub location_name: Option<String>,
    pub message: String,
}

impl RuleResult {
    pub fn new(rule_id: impl Into<RuleId>, file_name: impl Into<String>, value: f64) -> Self {
        Self {
            rule_id: rule_id.into(),
            file_name: file_name.into(),
            value,
            line: 0,
            location_kind: None,
            location_name: None,
            message: String::new(),
        }
    }

    #[must_use]
    pub const fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_location(mut self, kind: impl Into<String>) -> Self {
        self.location_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Validate a raw result.
    ///
    /// Value text must be a finite number. Blank value text is accepted
    /// (as `0`) for non-metric rules only, since i-Code leaves the value of
    /// plain violations empty. Blank line text means line `0`.
    pub fn parse(raw: RawResult) -> Result<Self> {
        let rule_id = RuleId::new(raw.rule_id);
        let value = parse_value(&raw.value, &rule_id, &raw.file_name)?;
        let line = parse_line(&raw.line, &rule_id, &raw.file_name)?;

        Ok(Self {
            rule_id,
            file_name: raw.file_name,
            value,
            line,
            location_kind: raw.location_kind,
            location_name: raw.location_name.filter(|name| !name.is_empty()),
            message: raw.message,
        })
    }

    /// Whether the result carries a non-blank location kind
    pub fn has_location(&self) -> bool {
        self.location_kind
            .as_deref()
            .is_some_and(|kind| !kind.trim().is_empty())
    }
}

fn parse_value(text: &str, rule_id: &RuleId, file: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() && !rule_id.is_metric() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::MalformedValue {
            rule_id: rule_id.to_string(),
            file: file.to_string(),
            text: text.to_string(),
        })
}

fn parse_line(text: &str, rule_id: &RuleId, file: &str) -> Result<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u32>().map_err(|_| Error::MalformedLine {
        rule_id: rule_id.to_string(),
        file: file.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rule_id: &str, value: &str, line: &str) -> RawResult {
        RawResult {
            rule_id: rule_id.to_string(),
            file_name: "bash.sh".to_string(),
            value: value.to_string(),
            line: line.to_string(),
            location_kind: Some("class".to_string()),
            location_name: Some(String::new()),
            message: "Small file".to_string(),
        }
    }

    #[test]
    fn test_rule_id_parts() {
        let id = RuleId::new("SH.MET.LineOfCode");
        assert!(id.is_metric());
        assert_eq!(id.language(), Some("SH"));
        assert_eq!(id.metric_name(), Some("LineOfCode"));

        let plain = RuleId::new("COCO");
        assert!(!plain.is_metric());
        assert_eq!(plain.language(), None);
        assert_eq!(plain.metric_name(), None);

        assert_eq!(RuleId::new("SH.MET").metric_name(), None);
        assert_eq!(RuleId::new("SH.MET.").metric_name(), None);
    }

    #[test]
    fn test_parse_valid_result() {
        let result = RuleResult::parse(raw("SH.MET.LineOfCode", " 20 ", "3")).unwrap();
        assert!((result.value - 20.0).abs() < f64::EPSILON);
        assert_eq!(result.line, 3);
        assert_eq!(result.location_name, None);
        assert!(result.has_location());
    }

    #[test]
    fn test_parse_decimal_value() {
        let result = RuleResult::parse(raw("F90.MET.RatioComment", "12.5", "")).unwrap();
        assert!((result.value - 12.5).abs() < f64::EPSILON);
        assert_eq!(result.line, 0);
    }

    #[test]
    fn test_malformed_value_is_fatal() {
        let err = RuleResult::parse(raw("SH.MET.LineOfCode", "twenty", "3")).unwrap_err();
        assert!(matches!(err, Error::MalformedValue { ref text, .. } if text == "twenty"));

        assert!(RuleResult::parse(raw("SH.MET.LineOfCode", "", "3")).is_err());
        assert!(RuleResult::parse(raw("SH.MET.LineOfCode", "NaN", "3")).is_err());
        assert!(RuleResult::parse(raw("SH.MET.LineOfCode", "inf", "3")).is_err());
    }

    #[test]
    fn test_blank_value_allowed_for_violations() {
        let result = RuleResult::parse(raw("SH.ERR.Help", "", "7")).unwrap();
        assert_eq!(result.value, 0.0);
        assert!(RuleResult::parse(raw("SH.ERR.Help", "oops", "7")).is_err());
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        assert!(matches!(
            RuleResult::parse(raw("SH.MET.LineOfCode", "1", "-3")),
            Err(Error::MalformedLine { .. })
        ));
        assert!(RuleResult::parse(raw("SH.MET.LineOfCode", "1", "3.5")).is_err());
    }

    #[test]
    fn test_has_location() {
        let base = RuleResult::new("F77.MET.ComplexitySimplified", "clanhb.f", 1.0);
        assert!(!base.has_location());
        assert!(!base.clone().with_location("").has_location());
        assert!(!base.clone().with_location("  ").has_location());
        assert!(base.with_location("method").has_location());
    }
}
