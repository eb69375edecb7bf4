//! Metrics aggregation and report formatting.
//!
//! Totals are summed in microseconds and only converted to milliseconds when
//! rendered. The conversion is exact (one microsecond is `0.001` ms), so no
//! rounding happens here.

use crate::config::CacheCapacity;
use crate::metric::{ExecutionRecord, MetricKind};
use crate::runner::{FailedExecution, RunOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// Width of the label column in every report line.
const LABEL_WIDTH: usize = 25;
const SEPARATOR_WIDTH: usize = 102;

/// Per-kind sums over a sequence of records, in microseconds.
///
/// `total` is the sum of the four kinds, not a separately measured wall
/// clock, so application time overlaps the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub core_driver_micros: u64,
    pub network_io_micros: u64,
    pub server_micros: u64,
    pub application_micros: u64,
    pub total_micros: u64,
}

impl Totals {
    pub fn from_records(records: &[ExecutionRecord]) -> Self {
        let mut totals = Totals::default();
        for record in records {
            for sample in record.samples() {
                let value = sample.value_micros();
                let slot = match sample.kind() {
                    MetricKind::ServerTime => &mut totals.server_micros,
                    MetricKind::NetworkTime => &mut totals.network_io_micros,
                    MetricKind::CoreDriverTime => &mut totals.core_driver_micros,
                    MetricKind::ApplicationTime => &mut totals.application_micros,
                };
                *slot = slot.saturating_add(value);
                totals.total_micros = totals.total_micros.saturating_add(value);
            }
        }
        totals
    }

    pub fn get(&self, kind: MetricKind) -> u64 {
        match kind {
            MetricKind::ServerTime => self.server_micros,
            MetricKind::NetworkTime => self.network_io_micros,
            MetricKind::CoreDriverTime => self.core_driver_micros,
            MetricKind::ApplicationTime => self.application_micros,
        }
    }

    pub fn total(&self) -> u64 {
        self.total_micros
    }
}

/// Render microseconds as milliseconds with three decimals.
pub fn format_millis(micros: u64) -> String {
    format!("{}.{:03}", micros / 1000, micros % 1000)
}

/// One line per record, in input order.
pub fn format_individual(records: &[ExecutionRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = write!(out, "{:<width$}", record.label(), width = LABEL_WIDTH);
        for sample in record.samples() {
            let _ = write!(
                out,
                " | {} {} ms",
                sample.kind(),
                format_millis(sample.value_micros())
            );
        }
        out.push('\n');
    }
    out
}

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// The totals block: summary line between two separator rules.
pub fn format_totals(totals: &Totals) -> String {
    let rule = separator();
    format!(
        "{rule}\n{:>w$} | Core driver {:>10} ms | Network IO {:>7} ms | Server {:>10} ms | Application {:>10} ms | >> TOTAL {} ms\n{rule}\n",
        "Total execution times",
        format_millis(totals.core_driver_micros),
        format_millis(totals.network_io_micros),
        format_millis(totals.server_micros),
        format_millis(totals.application_micros),
        format_millis(totals.total()),
        w = LABEL_WIDTH,
    )
}

pub fn format_header(cache: CacheCapacity) -> String {
    format!("# Statements cache {cache}")
}

/// Full text report for one configuration.
pub fn format_run(outcome: &RunOutcome, details: bool) -> String {
    let mut out = format_header(outcome.cache);
    out.push('\n');
    if details {
        out.push_str(&format_individual(&outcome.records));
    }
    if !outcome.failed.is_empty() {
        let _ = writeln!(
            out,
            "{} failed execution(s) excluded",
            outcome.failed.len()
        );
    }
    out.push_str(&format_totals(&Totals::from_records(&outcome.records)));
    out
}

/// Serializable view of one configuration's results.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub cache: CacheCapacity,
    pub started_at: DateTime<Utc>,
    pub executions: &'a [ExecutionRecord],
    pub failed: &'a [FailedExecution],
    pub totals: Totals,
}

impl<'a> From<&'a RunOutcome> for RunReport<'a> {
    fn from(outcome: &'a RunOutcome) -> Self {
        Self {
            cache: outcome.cache,
            started_at: outcome.started_at,
            executions: &outcome.records,
            failed: &outcome.failed,
            totals: Totals::from_records(&outcome.records),
        }
    }
}

impl RunReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
