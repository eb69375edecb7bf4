//! Per-execution timing samples.
//!
//! One [`ExecutionRecord`] holds the samples collected for one unit of work.
//! Values are kept in microseconds; sources that report other units are
//! converted through [`Elapsed::as_micros`] before they reach a record.

use crate::error::{StmtCacheError, StmtCacheResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timing category reported by the instrumentation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ServerTime,
    NetworkTime,
    CoreDriverTime,
    ApplicationTime,
}

impl MetricKind {
    /// Order in which samples are collected after each execution.
    pub const COLLECTION_ORDER: [MetricKind; 4] = [
        MetricKind::CoreDriverTime,
        MetricKind::NetworkTime,
        MetricKind::ServerTime,
        MetricKind::ApplicationTime,
    ];

    /// Short label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::ServerTime => "Server",
            MetricKind::NetworkTime => "Network IO",
            MetricKind::CoreDriverTime => "Core driver",
            MetricKind::ApplicationTime => "Application",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A raw value from an instrumentation source, tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elapsed {
    Micros(i64),
    Millis(i64),
}

impl Elapsed {
    /// Convert to microseconds, saturating. The sign is preserved.
    pub fn as_micros(self) -> i64 {
        match self {
            Elapsed::Micros(v) => v,
            Elapsed::Millis(v) => v.saturating_mul(1000),
        }
    }
}

/// One timed category and value for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSample {
    kind: MetricKind,
    value_micros: u64,
}

impl MetricSample {
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn value_micros(&self) -> u64 {
        self.value_micros
    }
}

/// Label and samples of one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    label: String,
    samples: Vec<MetricSample>,
}

impl ExecutionRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            samples: Vec::with_capacity(MetricKind::COLLECTION_ORDER.len()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Append a sample.
    ///
    /// Negative values are rejected with [`StmtCacheError::InvalidMetric`]
    /// and leave the record untouched. They are never clamped.
    pub fn add_metric(&mut self, kind: MetricKind, value_micros: i64) -> StmtCacheResult<()> {
        let value_micros = u64::try_from(value_micros)
            .map_err(|_| StmtCacheError::invalid_metric(&self.label, kind, value_micros))?;
        self.samples.push(MetricSample { kind, value_micros });
        Ok(())
    }

    /// Samples in insertion order.
    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_metric_keeps_insertion_order() {
        let mut record = ExecutionRecord::new("Fetch Person record nr 1");
        for (kind, value) in MetricKind::COLLECTION_ORDER.iter().zip([2000, 500, 1500, 3000]) {
            record.add_metric(*kind, value).unwrap();
        }

        let kinds: Vec<MetricKind> = record.samples().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, MetricKind::COLLECTION_ORDER.to_vec());
        assert_eq!(record.samples()[2].value_micros(), 1500);
    }

    #[test]
    fn test_negative_value_rejected() {
        let mut record = ExecutionRecord::new("nr 7");
        record.add_metric(MetricKind::CoreDriverTime, 10).unwrap();

        let err = record.add_metric(MetricKind::NetworkTime, -1).unwrap_err();
        match err {
            StmtCacheError::InvalidMetric { label, kind, value } => {
                assert_eq!(label, "nr 7");
                assert_eq!(kind, MetricKind::NetworkTime);
                assert_eq!(value, -1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(record.samples().len(), 1);
    }

    #[test]
    fn test_zero_and_duplicate_kinds_allowed() {
        let mut record = ExecutionRecord::new("dup");
        record.add_metric(MetricKind::ServerTime, 0).unwrap();
        record.add_metric(MetricKind::ServerTime, 5).unwrap();
        assert_eq!(record.samples().len(), 2);
    }

    #[test]
    fn test_elapsed_as_micros() {
        assert_eq!(Elapsed::Micros(1500).as_micros(), 1500);
        assert_eq!(Elapsed::Millis(3).as_micros(), 3000);
        assert_eq!(Elapsed::Millis(-2).as_micros(), -2000);
        assert_eq!(Elapsed::Millis(i64::MAX).as_micros(), i64::MAX);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(MetricKind::CoreDriverTime.to_string(), "Core driver");
        assert_eq!(MetricKind::NetworkTime.to_string(), "Network IO");
        assert_eq!(MetricKind::ServerTime.to_string(), "Server");
        assert_eq!(MetricKind::ApplicationTime.to_string(), "Application");
    }
}
