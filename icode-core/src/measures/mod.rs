//! Metrics Mapper
//!
//! Turns i-Code rule results into measures:
//! - [`save_measure`] copies each metric result onto its file, one
//!   measure per metric key, last value wins.
//! - [`save_extra_measures`] computes the derived measures: the function
//!   count, the maximum nesting and the located metrics summed per file.
//!
//! The two never write the same key, so both records can be committed
//! into one store under any duplicate policy.
//!
//! Both are pure functions of their input; accumulation across calls is
//! the job of the [`MeasureStore`](crate::store::MeasureStore) the
//! records are committed into.

use crate::constants::metrics::{
    DEFAULT_METRIC_PREFIX, FUNCTIONS_KEY, LINE_OF_CODE, METRIC_SEGMENT, NESTING, NESTING_MAX_SUFFIX,
    SEGMENT_SEPARATOR, SUM_SUFFIX,
};
use crate::files::FileIndex;
use crate::models::{MetricRecord, RuleId, RuleResult};
use crate::MapperConfig;
use tracing::{debug, info};

/// Whether a rule identifier denotes a metric.
///
/// True iff one of the dot-separated segments is exactly `MET`; a
/// segment merely containing those letters (`COMETA`) does not count.
pub fn is_metric(rule_id: &str) -> bool {
    rule_id
        .split(SEGMENT_SEPARATOR)
        .any(|segment| segment == METRIC_SEGMENT)
}

/// Copy metric results onto their files with the default configuration
pub fn save_measure<I: FileIndex>(results: &[RuleResult], files: &I) -> MetricRecord<I::Handle> {
    MeasureMapper::default().save_measure(results, files)
}

/// Compute derived measures with the default configuration
pub fn save_extra_measures<I: FileIndex>(
    results: &[RuleResult],
    files: &I,
) -> MetricRecord<I::Handle> {
    MeasureMapper::default().save_extra_measures(results, files)
}

/// Maps rule results onto metric keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureMapper {
    prefix: String,
}

impl Default for MeasureMapper {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_METRIC_PREFIX.to_string(),
        }
    }
}

impl MeasureMapper {
    pub fn new(config: &MapperConfig) -> Self {
        Self {
            prefix: config.metric_prefix.clone(),
        }
    }

    /// Metric key of a rule: prefix followed by the lower-cased metric name
    pub fn metric_key(&self, rule_id: &RuleId) -> Option<String> {
        rule_id
            .metric_name()
            .map(|name| format!("{}{}", self.prefix, name.to_lowercase()))
    }

    pub fn nesting_max_key(&self) -> String {
        format!("{}{}", self.prefix, NESTING_MAX_SUFFIX)
    }

    /// Key of the per-file sum of a located metric
    pub fn sum_key(&self, rule_id: &RuleId) -> Option<String> {
        self.metric_key(rule_id).map(|key| key + SUM_SUFFIX)
    }

    /// Resolve the file of a metric result; `None` for anything to skip
    fn target<I: FileIndex>(&self, result: &RuleResult, files: &I) -> Option<I::Handle> {
        if !result.rule_id.is_metric() {
            return None;
        }
        let handle = files.lookup(&result.file_name);
        if handle.is_none() {
            debug!(
                "Skipping {} on {}: file is not indexed",
                result.rule_id, result.file_name
            );
        }
        handle
    }

    /// One measure per metric result, keyed by the rule's metric name.
    ///
    /// Non-metric rules and unresolved files are skipped. `Nesting` is
    /// only ever published as its per-file maximum and is skipped here.
    pub fn save_measure<I: FileIndex>(
        &self,
        results: &[RuleResult],
        files: &I,
    ) -> MetricRecord<I::Handle> {
        let mut record = MetricRecord::new();

        for result in results {
            let Some(file) = self.target(result, files) else {
                continue;
            };
            if result.rule_id.metric_name() == Some(NESTING) {
                continue;
            }
            let Some(key) = self.metric_key(&result.rule_id) else {
                continue;
            };
            record.insert(&file, &key, result.value);
        }

        info!(
            results = results.len(),
            measures = record.len(),
            "Saved i-Code measures"
        );
        record
    }

    /// Derived measures, one per file and key:
    /// - `functions`: count of `LineOfCode` results with a location
    /// - `<prefix>nesting-max`: maximum of the `Nesting` values
    /// - `<metric key>-sum`: any other metric with a location, values
    ///   summed per file
    ///
    /// Results without a location never count towards functions or the
    /// summed metrics.
    pub fn save_extra_measures<I: FileIndex>(
        &self,
        results: &[RuleResult],
        files: &I,
    ) -> MetricRecord<I::Handle> {
        let mut record = MetricRecord::new();
        let nesting_key = self.nesting_max_key();

        for result in results {
            let Some(file) = self.target(result, files) else {
                continue;
            };
            match result.rule_id.metric_name() {
                Some(NESTING) => {
                    record.merge_with(&file, &nesting_key, result.value, f64::max);
                }
                Some(LINE_OF_CODE) => {
                    if result.has_location() {
                        record.merge_with(&file, FUNCTIONS_KEY, 1.0, |count, one| count + one);
                    }
                }
                Some(_) => {
                    if !result.has_location() {
                        continue;
                    }
                    if let Some(key) = self.sum_key(&result.rule_id) {
                        record.merge_with(&file, &key, result.value, |sum, value| sum + value);
                    }
                }
                None => {}
            }
        }

        info!(
            results = results.len(),
            measures = record.len(),
            "Saved i-Code extra measures"
        );
        record
    }
}
