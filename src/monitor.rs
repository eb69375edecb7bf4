//! Instrumentation source for one unit of work.
//!
//! [`SystemMonitor`] mirrors the "system monitor" model found in database
//! drivers: `start` resets the clocks, the driver attributes elapsed time to
//! phases while it works, `stop` fixes the application wall clock, and
//! [`SystemMonitor::timings`] hands out the four readings.
//!
//! The readings are estimates: the network phase is derived from a
//! round-trip probe, and server time is whatever the statement round trip
//! spent beyond that estimate.

use crate::metric::{Elapsed, MetricKind};
use std::time::{Duration, Instant};

/// The four readings for one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub core_driver: Elapsed,
    pub network_io: Elapsed,
    pub server: Elapsed,
    pub application: Elapsed,
}

impl Timings {
    /// Reading for a metric kind.
    pub fn get(&self, kind: MetricKind) -> Elapsed {
        match kind {
            MetricKind::CoreDriverTime => self.core_driver,
            MetricKind::NetworkTime => self.network_io,
            MetricKind::ServerTime => self.server,
            MetricKind::ApplicationTime => self.application,
        }
    }
}

/// Phase a slice of time is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Client library work: building and binding the statement.
    CoreDriver,
    /// Full statement round trip, network included.
    RoundTrip,
    /// Transport cost estimate from a round-trip probe.
    Network,
}

#[derive(Debug, Default)]
pub struct SystemMonitor {
    started: Option<Instant>,
    application: Duration,
    core_driver: Duration,
    round_trip: Duration,
    network: Duration,
}

impl SystemMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all clocks and start the application wall clock.
    pub fn start(&mut self) {
        *self = Self {
            started: Some(Instant::now()),
            ..Self::default()
        };
    }

    /// Stop the application wall clock. A monitor that was never started
    /// reports zero application time.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.application = started.elapsed();
        }
    }

    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        let slot = match phase {
            Phase::CoreDriver => &mut self.core_driver,
            Phase::RoundTrip => &mut self.round_trip,
            Phase::Network => &mut self.network,
        };
        *slot += elapsed;
    }

    /// Readings in microseconds, sub-microsecond remainders truncated.
    pub fn timings(&self) -> Timings {
        let network = self.network.min(self.round_trip);
        Timings {
            core_driver: micros(self.core_driver),
            network_io: micros(network),
            server: micros(self.round_trip.saturating_sub(network)),
            application: micros(self.application),
        }
    }
}

fn micros(duration: Duration) -> Elapsed {
    Elapsed::Micros(i64::try_from(duration.as_micros()).unwrap_or(i64::MAX))
}
