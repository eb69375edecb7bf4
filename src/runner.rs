//! Run driver: warm-up and measured runs for one cache configuration.

use crate::config::{CacheCapacity, RunConfig};
use crate::error::StmtCacheResult;
use crate::metric::{ExecutionRecord, MetricKind};
use crate::monitor::Timings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// One unit of work against the database, plus its instrumentation.
#[async_trait]
pub trait Workload: Send + Sized {
    /// Execute once and return the timings of exactly this execution.
    async fn execute(&mut self) -> StmtCacheResult<Timings>;

    /// Release the underlying connection.
    async fn close(self) -> StmtCacheResult<()>;
}

/// An execution that failed and was left out of the record sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedExecution {
    pub label: String,
    pub error: String,
}

/// Everything one configuration produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub cache: CacheCapacity,
    pub started_at: DateTime<Utc>,
    pub records: Vec<ExecutionRecord>,
    pub failed: Vec<FailedExecution>,
}

pub struct RunDriver<'a> {
    config: &'a RunConfig,
}

impl<'a> RunDriver<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Execute the workload `executions` times and discard the timings.
    /// Returns how many executions succeeded.
    pub async fn warm_up<W: Workload>(&self, workload: &mut W) -> StmtCacheResult<usize> {
        let mut succeeded = 0;
        for i in 1..=self.config.executions {
            match workload.execute().await {
                Ok(_) => succeeded += 1,
                Err(e) => warn!(execution = i, error = %e, "warm-up execution failed"),
            }
            self.pause(i).await;
        }
        info!(succeeded, total = self.config.executions, "warm-up done");
        Ok(succeeded)
    }

    /// Measure one configuration.
    ///
    /// Failed executions are dropped from the record sequence and listed in
    /// [`RunOutcome::failed`]. A negative reading aborts the run.
    pub async fn run<W: Workload>(
        &self,
        cache: CacheCapacity,
        workload: &mut W,
    ) -> StmtCacheResult<RunOutcome> {
        let started_at = Utc::now();
        let mut records = Vec::with_capacity(self.config.executions);
        let mut failed = Vec::new();

        for i in 1..=self.config.executions {
            let label = format!("{} nr {}", self.config.subject, i);
            match workload.execute().await {
                Ok(timings) => {
                    let record = collect(label, &timings)?;
                    debug!(label = record.label(), "execution recorded");
                    records.push(record);
                }
                Err(e) => {
                    warn!(%label, error = %e, "execution failed, excluded from report");
                    failed.push(FailedExecution {
                        label,
                        error: e.to_string(),
                    });
                }
            }
            self.pause(i).await;
        }

        info!(%cache, recorded = records.len(), failed = failed.len(), "run finished");
        Ok(RunOutcome {
            cache,
            started_at,
            records,
            failed,
        })
    }

    async fn pause(&self, i: usize) {
        if i < self.config.executions && self.config.delay_ms > 0 {
            tokio::time::sleep(self.config.delay()).await;
        }
    }
}

/// Build a complete record from one set of timings, converting every value
/// to microseconds.
fn collect(label: String, timings: &Timings) -> StmtCacheResult<ExecutionRecord> {
    let mut record = ExecutionRecord::new(label);
    for kind in MetricKind::COLLECTION_ORDER {
        record.add_metric(kind, timings.get(kind).as_micros())?;
    }
    Ok(record)
}
