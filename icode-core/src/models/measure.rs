//! Measure Model
//!
//! A [`MetricRecord`] is the output of one mapper invocation: at most one
//! value per `(file, metric)` pair. Files keep the order of their first
//! measure, and metrics within a file the order of their first write.

use crate::store::MeasureSink;
use indexmap::IndexMap;
use serde::Serialize;
use std::hash::Hash;

/// One numeric value of one metric for one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure<H> {
    pub file: H,
    pub metric: String,
    pub value: f64,
}

/// Ordered set of measures with unique `(file, metric)` pairs
#[derive(Debug, Clone)]
pub struct MetricRecord<H> {
    files: IndexMap<H, IndexMap<String, f64>>,
}

impl<H> Default for MetricRecord<H> {
    fn default() -> Self {
        Self {
            files: IndexMap::new(),
        }
    }
}

impl<H: PartialEq> PartialEq for MetricRecord<H> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<H: Clone + Eq + Hash> MetricRecord<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing in place any value already held for the pair.
    /// Returns the replaced value.
    pub fn insert(&mut self, file: &H, metric: &str, value: f64) -> Option<f64> {
        if let Some(metrics) = self.files.get_mut(file) {
            return metrics.insert(metric.to_string(), value);
        }
        self.files
            .insert(file.clone(), IndexMap::from([(metric.to_string(), value)]));
        None
    }

    /// Combine `value` with the stored value of the pair, or store it as is
    pub fn merge_with(
        &mut self,
        file: &H,
        metric: &str,
        value: f64,
        combine: impl FnOnce(f64, f64) -> f64,
    ) {
        let merged = match self.get(file, metric) {
            Some(current) => combine(current, value),
            None => value,
        };
        self.insert(file, metric, merged);
    }

    pub fn get(&self, file: &H, metric: &str) -> Option<f64> {
        self.files.get(file)?.get(metric).copied()
    }

    pub fn contains(&self, file: &H, metric: &str) -> bool {
        self.get(file, metric).is_some()
    }

    /// `(metric, value)` pairs of one file, in insertion order
    pub fn measures_for(&self, file: &H) -> impl Iterator<Item = (&str, f64)> {
        self.files
            .get(file)
            .into_iter()
            .flat_map(|metrics| {
                metrics
                    .iter()
                    .map(|(metric, &value)| (metric.as_str(), value))
            })
    }

    /// Push every measure into a sink, in record order.
    ///
    /// Stops at the first sink error; returns the number of measures the
    /// sink actually stored.
    pub fn publish<S>(self, sink: &mut S) -> crate::Result<usize>
    where
        S: MeasureSink<H> + ?Sized,
    {
        let mut stored = 0;
        for (file, metrics) in self.files {
            for (metric, value) in metrics {
                if sink.save(&file, &metric, value)? {
                    stored += 1;
                }
            }
        }
        Ok(stored)
    }
}

impl<H> MetricRecord<H> {
    pub fn len(&self) -> usize {
        self.files.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in order of their first measure
    pub fn files(&self) -> Vec<&H> {
        self.files.keys().collect()
    }

    /// Every `(file, metric, value)`, grouped by file
    pub fn iter(&self) -> impl Iterator<Item = (&H, &str, f64)> {
        self.files.iter().flat_map(|(file, metrics)| {
            metrics
                .iter()
                .map(move |(metric, &value)| (file, metric.as_str(), value))
        })
    }

    pub fn into_measures(self) -> Vec<Measure<H>>
    where
        H: Clone,
    {
        self.files
            .into_iter()
            .flat_map(|(file, metrics)| {
                metrics.into_iter().map(move |(metric, value)| Measure {
                    file: file.clone(),
                    metric,
                    value,
                })
            })
            .collect()
    }
}
