//! # stmtcache
//!
//! Measure prepared-statement latency with the client-side statement cache
//! disabled and enabled, and report where the time goes.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use stmtcache::prelude::*;
//!
//! let config = Config::load(None)?;
//! let driver = RunDriver::new(&config.run);
//!
//! let mut workload =
//!     PgWorkload::connect(config.database_url()?, CacheCapacity(25), &config.run).await?;
//! let outcome = driver.run(CacheCapacity(25), &mut workload).await?;
//! workload.close().await?;
//!
//! print!("{}", format_run(&outcome, false));
//! ```
//!
//! ## Timing categories
//!
//! | Category    | Meaning                                        |
//! |-------------|------------------------------------------------|
//! | Core driver | Client library work (build and bind)           |
//! | Network IO  | Transport cost of a round trip                 |
//! | Server      | Statement round trip beyond the network cost   |
//! | Application | Wall clock around the call                     |

pub mod config;
pub mod engine;
pub mod error;
pub mod metric;
pub mod monitor;
pub mod report;
pub mod runner;

pub mod prelude {
    pub use crate::config::{CacheCapacity, Config, Overrides, RunConfig};
    pub use crate::engine::PgWorkload;
    pub use crate::error::*;
    pub use crate::metric::{Elapsed, ExecutionRecord, MetricKind, MetricSample};
    pub use crate::monitor::{SystemMonitor, Timings};
    pub use crate::report::{
        format_individual, format_millis, format_run, format_totals, RunReport, Totals,
    };
    pub use crate::runner::{FailedExecution, RunDriver, RunOutcome, Workload};
}
