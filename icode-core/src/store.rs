//! Measure Sink and Store
//!
//! The host platform persists measures through a [`MeasureSink`].
//! [`MeasureStore`] is an in-memory sink that accumulates across mapper
//! invocations and applies a [`DuplicatePolicy`] to repeated writes.

use crate::models::MetricRecord;
use crate::{DuplicatePolicy, Error, Result};
use std::fmt::Display;
use std::hash::Hash;
use tracing::debug;

/// Receiver of `(file, metric, value)` triples
pub trait MeasureSink<H> {
    /// Save one measure; `Ok(false)` when the sink kept an earlier value
    fn save(&mut self, file: &H, metric: &str, value: f64) -> Result<bool>;
}

/// Accumulating measure store
#[derive(Debug, Clone)]
pub struct MeasureStore<H> {
    policy: DuplicatePolicy,
    measures: MetricRecord<H>,
}

impl<H> Default for MeasureStore<H> {
    fn default() -> Self {
        Self {
            policy: DuplicatePolicy::default(),
            measures: MetricRecord::default(),
        }
    }
}

impl<H: Clone + Eq + Hash + Display> MeasureStore<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            measures: MetricRecord::default(),
        }
    }

    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Publish a whole record into the store, all or nothing.
    ///
    /// Under [`DuplicatePolicy::Reject`] every pair is checked before the
    /// first write, so a rejected record leaves the store untouched.
    /// Returns the number of measures stored.
    pub fn commit(&mut self, record: MetricRecord<H>) -> Result<usize> {
        if self.policy == DuplicatePolicy::Reject {
            if let Some((file, metric, _)) = record
                .iter()
                .find(|(file, metric, _)| self.measures.contains(file, metric))
            {
                return Err(Error::DuplicateMeasure {
                    file: file.to_string(),
                    metric: metric.to_string(),
                });
            }
        }
        record.publish(self)
    }

    /// `(metric, value)` pairs saved for a file, in the order they were first saved
    pub fn measures(&self, file: &H) -> Vec<(&str, f64)> {
        self.measures.measures_for(file).collect()
    }

    pub fn get(&self, file: &H, metric: &str) -> Option<f64> {
        self.measures.get(file, metric)
    }

    pub fn files(&self) -> Vec<&H> {
        self.measures.files()
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&H, &str, f64)> {
        self.measures.iter()
    }

    /// Everything stored, as an ordered record
    pub fn into_record(self) -> MetricRecord<H> {
        self.measures
    }
}

impl<H: Clone + Eq + Hash + Display> MeasureSink<H> for MeasureStore<H> {
    fn save(&mut self, file: &H, metric: &str, value: f64) -> Result<bool> {
        if self.measures.contains(file, metric) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(Error::DuplicateMeasure {
                        file: file.to_string(),
                        metric: metric.to_string(),
                    });
                }
                DuplicatePolicy::KeepFirst => {
                    debug!("Keeping first value of {} for {}", metric, file);
                    return Ok(false);
                }
                DuplicatePolicy::Overwrite => {
                    debug!("Overwriting {} for {}", metric, file);
                }
            }
        }
        self.measures.insert(file, metric, value);
        Ok(true)
    }
}
