//! Data models module for i-Code core
//!
//! This module contains the data structures exchanged between the
//! report readers, the metrics mapper and the measure store.

pub mod measure;
pub mod rule_definition;
pub mod rule_result;

pub use measure::{Measure, MetricRecord};
pub use rule_definition::RuleDefinition;
pub use rule_result::{RawResult, RuleId, RuleResult};
