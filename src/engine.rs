//! PostgreSQL workload.
//!
//! Each [`PgWorkload`] owns one connection whose client-side statement cache
//! is sized by a [`CacheCapacity`]. With capacity zero sqlx re-prepares the
//! statement on every execution; otherwise the prepared statement is reused
//! from the cache after the first execution.

use crate::config::{CacheCapacity, RunConfig};
use crate::error::{StmtCacheError, StmtCacheResult};
use crate::monitor::{Phase, SystemMonitor, Timings};
use crate::runner::Workload;

use async_trait::async_trait;
use rand::Rng;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use std::time::Instant;

/// One connection executing one parameterized statement.
pub struct PgWorkload {
    conn: PgConnection,
    query: String,
    key_range: i64,
    monitor: SystemMonitor,
}

impl PgWorkload {
    /// Open a connection with the given statement cache capacity.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut workload =
    ///     PgWorkload::connect("postgres://localhost/test", CacheCapacity(25), &run).await?;
    /// let timings = workload.execute().await?;
    /// ```
    pub async fn connect(url: &str, cache: CacheCapacity, run: &RunConfig) -> StmtCacheResult<Self> {
        let options = PgConnectOptions::from_str(url)
            .map_err(|e| StmtCacheError::Connection(e.to_string()))?
            .statement_cache_capacity(cache.0);

        let conn = options
            .connect()
            .await
            .map_err(|e| StmtCacheError::Connection(e.to_string()))?;
        tracing::info!(%cache, "connected");

        Ok(Self {
            conn,
            query: run.query.clone(),
            key_range: run.key_range,
            monitor: SystemMonitor::new(),
        })
    }
}

#[async_trait]
impl Workload for PgWorkload {
    async fn execute(&mut self) -> StmtCacheResult<Timings> {
        let key: i64 = rand::rng().random_range(0..self.key_range);

        self.monitor.start();

        let mark = Instant::now();
        let query = sqlx::query(&self.query).bind(key);
        self.monitor.record(Phase::CoreDriver, mark.elapsed());

        let mark = Instant::now();
        let result = query.execute(&mut self.conn).await;
        self.monitor.record(Phase::RoundTrip, mark.elapsed());
        self.monitor.stop();

        let done = result.map_err(|e| StmtCacheError::Execution(e.to_string()))?;
        tracing::debug!(key, rows = done.rows_affected(), "statement executed");

        // Probe after stop so it stays out of application time.
        let mark = Instant::now();
        self.conn
            .ping()
            .await
            .map_err(|e| StmtCacheError::Connection(e.to_string()))?;
        self.monitor.record(Phase::Network, mark.elapsed());

        Ok(self.monitor.timings())
    }

    async fn close(self) -> StmtCacheResult<()> {
        self.conn
            .close()
            .await
            .map_err(|e| StmtCacheError::Connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_url_is_connection_error() {
        let result = PgWorkload::connect("not a url", CacheCapacity(25), &RunConfig::default()).await;
        assert!(matches!(result, Err(StmtCacheError::Connection(_))));
    }
}
