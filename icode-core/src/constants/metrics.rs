//! i-Code Metric Conventions
//!
//! i-Code rule identifiers follow `<LANGUAGE>.<CATEGORY>.<NAME>`; the
//! `MET` category marks a metric whose value is published as a measure.
//! Two metric names get extra treatment: `Nesting` is never published
//! directly and only feeds the per-file maximum, and located
//! `LineOfCode` results are also tallied into the function count. Other
//! located metrics are summed per file under a `-sum` key, apart from the
//! key their direct value is published under.

use serde::{Deserialize, Serialize};

/// Category segment marking a metric rule
pub const METRIC_SEGMENT: &str = "MET";

/// Separator between rule identifier segments
pub const SEGMENT_SEPARATOR: char = '.';

/// Prefix of metric keys derived from rule identifiers
pub const DEFAULT_METRIC_PREFIX: &str = "icode-";

/// Metric name counted once per function-like unit
pub const LINE_OF_CODE: &str = "LineOfCode";

/// Metric name reduced to a per-file maximum
pub const NESTING: &str = "Nesting";

/// Key of the function count measure (a platform core metric, never prefixed)
pub const FUNCTIONS_KEY: &str = "functions";

/// Suffix of the maximum nesting measure, appended to the metric prefix
pub const NESTING_MAX_SUFFIX: &str = "nesting-max";

/// Suffix of the per-file sum of a located metric, appended to its key
pub const SUM_SUFFIX: &str = "-sum";

/// Whether a larger value of a metric is an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricDirection {
    Better,
    Worse,
    None,
}

impl std::fmt::Display for MetricDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Better => write!(f, "better"),
            Self::Worse => write!(f, "worse"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Description of a published metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub domain: &'static str,
    pub direction: MetricDirection,
    pub qualitative: bool,
}

/// Metrics published with the default prefix
pub const CATALOG: &[MetricDefinition] = &[
    MetricDefinition {
        key: FUNCTIONS_KEY,
        name: "Functions",
        description: "Number of functions reported by i-Code",
        domain: "Size",
        direction: MetricDirection::Worse,
        qualitative: false,
    },
    MetricDefinition {
        key: "icode-nesting-max",
        name: "Maximum nesting",
        description: "Deepest nesting level among the file's functions",
        domain: "Complexity",
        direction: MetricDirection::Worse,
        qualitative: true,
    },
    MetricDefinition {
        key: "icode-lineofcode",
        name: "Lines of code (i-Code)",
        description: "Lines of code counted by i-Code",
        domain: "Size",
        direction: MetricDirection::Worse,
        qualitative: false,
    },
    MetricDefinition {
        key: "icode-lineofcomment",
        name: "Comment lines (i-Code)",
        description: "Comment lines counted by i-Code",
        domain: "Documentation",
        direction: MetricDirection::Better,
        qualitative: false,
    },
    MetricDefinition {
        key: "icode-ratiocomment",
        name: "Comment ratio (i-Code)",
        description: "Share of comment lines computed by i-Code",
        domain: "Documentation",
        direction: MetricDirection::Better,
        qualitative: true,
    },
    MetricDefinition {
        key: "icode-complexitysimplified",
        name: "Simplified complexity",
        description: "Simplified cyclomatic complexity reported by i-Code",
        domain: "Complexity",
        direction: MetricDirection::Worse,
        qualitative: true,
    },
    MetricDefinition {
        key: "icode-complexitysimplified-sum",
        name: "Simplified complexity of functions",
        description: "Sum of the simplified cyclomatic complexity of the file's functions",
        domain: "Complexity",
        direction: MetricDirection::Worse,
        qualitative: true,
    },
];

/// Find a metric definition by key
pub fn lookup(key: &str) -> Option<&'static MetricDefinition> {
    CATALOG.iter().find(|definition| definition.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keys_are_unique() {
        for (i, definition) in CATALOG.iter().enumerate() {
            assert!(
                CATALOG[i + 1..].iter().all(|other| other.key != definition.key),
                "duplicate key {}",
                definition.key
            );
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("functions").map(|d| d.domain), Some("Size"));
        assert_eq!(
            lookup(&format!("{DEFAULT_METRIC_PREFIX}{NESTING_MAX_SUFFIX}")).map(|d| d.key),
            Some("icode-nesting-max")
        );
        assert!(lookup("icode-unknown").is_none());
    }
}
