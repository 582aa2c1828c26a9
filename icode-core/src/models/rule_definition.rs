//! Rule Definition Model
//!
//! Rule definitions are handed unchanged to the host platform's rule
//! registry; the mapper never reads them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleDefinition {
    pub key: String,
    pub name: String,
    pub internal_key: String,
    pub description: String,
    pub severity: String,
    pub cardinality: String,
    pub status: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub tag: String,
    pub remediation_function: String,
    pub remediation_function_base_effort: String,
}

impl RuleDefinition {
    /// Whether the definition describes a metric rather than a check
    pub fn is_metric(&self) -> bool {
        crate::measures::is_metric(&self.key)
    }
}
