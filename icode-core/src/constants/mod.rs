//! Constants module for i-Code core
//!
//! Rule identifier conventions, reserved metric names and the catalog
//! of metrics the mapper publishes.

pub mod metrics;

pub use metrics::{MetricDefinition, MetricDirection, CATALOG};
